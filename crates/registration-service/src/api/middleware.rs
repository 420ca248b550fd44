//! Rate limiting, client identification, and request logging.

use crate::error::ServiceError;
use crate::service::RegistrationService;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::{debug, warn};

/// Client identity used for rate limiting: the peer IP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl ClientAddr {
    /// Identity used when no connection info is attached to the request.
    pub const UNKNOWN: &'static str = "unknown";

    pub fn from_extensions(extensions: &axum::http::Extensions) -> Self {
        match extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => ClientAddr(addr.ip().to_string()),
            None => ClientAddr(Self::UNKNOWN.to_string()),
        }
    }
}

/// Rate limiting middleware.
///
/// Counts the request against the client's window and returns 429 Too Many
/// Requests once the window is used up. Runs before the body is read.
pub async fn rate_limit_middleware(
    State(service): State<RegistrationService>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let ClientAddr(client) = ClientAddr::from_extensions(request.extensions());
    service.admit(&client)?;

    Ok(next.run(request).await)
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}
