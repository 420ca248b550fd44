//! HTTP request handlers.

use super::types::{HealthResponse, RegisterRequest, RegistrationResponse, UpdateMessageRequest};
use crate::error::ServiceError;
use crate::service::RegistrationService;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

/// Health check endpoint.
pub async fn health(State(service): State<RegistrationService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        registration_count: service.registration_count().await,
    })
}

/// Create a registration.
pub async fn register(
    State(service): State<RegistrationService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ServiceError> {
    let Json(request) = payload?;
    let ref_code = request.ref_code.unwrap_or_default();

    let status = service
        .register(
            request.phone_number.as_deref().unwrap_or_default(),
            request.mobile_network.as_deref().unwrap_or_default(),
            request.message.as_deref().unwrap_or_default(),
            &ref_code,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse { ref_code, status }),
    ))
}

/// Get the status of a registration.
pub async fn check_status(
    State(service): State<RegistrationService>,
    Path(ref_code): Path<String>,
) -> Result<Json<RegistrationResponse>, ServiceError> {
    let status = service.check_status(&ref_code).await?;

    Ok(Json(RegistrationResponse { ref_code, status }))
}

/// Replace the message of a registration.
///
/// An unreadable body is treated as a missing message, which is only
/// reported once the registration is known to exist.
pub async fn update_message(
    State(service): State<RegistrationService>,
    Path(ref_code): Path<String>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, ServiceError> {
    let message = payload.ok().and_then(|Json(request)| request.message);
    let status = service
        .update_message(&ref_code, message.as_deref())
        .await?;

    Ok(Json(RegistrationResponse { ref_code, status }))
}
