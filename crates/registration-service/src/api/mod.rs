//! HTTP API for the registration service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, ClientAddr};
pub use types::*;

use crate::service::RegistrationService;
use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the API router.
pub fn create_router(service: RegistrationService) -> Router {
    let registrations = Router::new()
        .route("/register", post(handlers::register))
        .route("/status/:ref_code", get(handlers::check_status))
        .route("/update/:ref_code", put(handlers::update_message))
        .route_layer(axum_middleware::from_fn_with_state(
            service.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(handlers::health))
        .merge(registrations)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
