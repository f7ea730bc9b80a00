use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let internal_routes = Router::new()
        .route(
            "/api/internal/authorization/check",
            post(handlers::authorization::check_permission_handler),
        )
        .route(
            "/api/internal/authorization/bid-check",
            post(handlers::authorization::check_bid_permission_handler),
        )
        .route(
            "/api/internal/authorization/can-perform",
            post(handlers::authorization::can_perform_handler),
        )
        .route(
            "/api/internal/authorization/subjects/{principal}/sections",
            get(handlers::authorization::visible_sections_handler),
        )
        .route(
            "/api/internal/authorization/subjects/{principal}/managed-bids",
            get(handlers::authorization::managed_bids_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_internal_token,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
