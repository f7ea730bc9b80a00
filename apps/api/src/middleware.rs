use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use bidgate_core::AppError;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_internal_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !bearer_token_matches(request.headers(), &state.internal_api_token) {
        warn!(path = %request.uri().path(), "rejected internal request without valid token");
        return Err(AppError::Unauthorized("internal token required".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn bearer_token_matches(headers: &HeaderMap, expected: &str) -> bool {
    let Some(provided) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return false;
    };

    // Compare every byte so timing does not reveal the matching prefix length.
    provided.len() == expected.len()
        && provided
            .bytes()
            .zip(expected.bytes())
            .fold(0_u8, |difference, (left, right)| difference | (left ^ right))
            == 0
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::bearer_token_matches;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn accepts_matching_bearer_token() {
        assert!(bearer_token_matches(
            &headers("Bearer 0123456789abcdef0123456789abcdef"),
            TOKEN
        ));
    }

    #[test]
    fn rejects_missing_wrong_or_unprefixed_tokens() {
        assert!(!bearer_token_matches(&HeaderMap::new(), TOKEN));
        assert!(!bearer_token_matches(
            &headers("Bearer 0123456789abcdef0123456789abcdee"),
            TOKEN
        ));
        assert!(!bearer_token_matches(
            &headers("0123456789abcdef0123456789abcdef"),
            TOKEN
        ));
        assert!(!bearer_token_matches(&headers("Bearer short"), TOKEN));
    }
}
