use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use bidgate_application::AuthorizationConfig;
use bidgate_core::AppError;
use tracing_subscriber::EnvFilter;

const MIN_INTERNAL_TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub internal_api_token: String,
    pub authorization: AuthorizationConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let internal_api_token = internal_token(required_env("INTERNAL_API_TOKEN")?)?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3101);

        let authorization = authorization_config(env::var("DIRECTORY_LOOKUP_TIMEOUT_MS").ok())?;

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            internal_api_token,
            authorization,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn internal_token(value: String) -> Result<String, AppError> {
    if value.trim().len() < MIN_INTERNAL_TOKEN_LENGTH {
        return Err(AppError::Validation(format!(
            "INTERNAL_API_TOKEN must be at least {MIN_INTERNAL_TOKEN_LENGTH} characters"
        )));
    }

    Ok(value)
}

fn authorization_config(timeout_ms: Option<String>) -> Result<AuthorizationConfig, AppError> {
    let Some(value) = timeout_ms.filter(|value| !value.trim().is_empty()) else {
        return Ok(AuthorizationConfig::default());
    };

    let millis = value.trim().parse::<u64>().map_err(|error| {
        AppError::Validation(format!("invalid DIRECTORY_LOOKUP_TIMEOUT_MS '{value}': {error}"))
    })?;
    AuthorizationConfig::new(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bidgate_core::AppError;

    use super::{authorization_config, internal_token};

    #[test]
    fn short_internal_token_is_rejected() {
        assert!(matches!(
            internal_token("too-short".to_owned()),
            Err(AppError::Validation(_))
        ));
        assert!(internal_token("x".repeat(32)).is_ok());
    }

    #[test]
    fn lookup_timeout_defaults_when_unset() {
        let config = authorization_config(None);
        assert_eq!(
            config.map(|config| config.directory_lookup_timeout()).ok(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn lookup_timeout_is_parsed_in_milliseconds() {
        let config = authorization_config(Some("40".to_owned()));
        assert_eq!(
            config.map(|config| config.directory_lookup_timeout()).ok(),
            Some(Duration::from_millis(40))
        );
    }

    #[test]
    fn zero_or_malformed_lookup_timeout_is_rejected() {
        assert!(matches!(
            authorization_config(Some("0".to_owned())),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            authorization_config(Some("fast".to_owned())),
            Err(AppError::Validation(_))
        ));
    }
}
