//! API request and response types.

use crate::registry::RegistrationStatus;
use serde::{Deserialize, Serialize};

/// Request to create a registration.
///
/// Fields are optional so that a missing field fails the matching
/// validation instead of the body as a whole.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    /// 11-digit phone number
    pub phone_number: Option<String>,

    /// One of mtn, airtel, 9mobile, glo
    pub mobile_network: Option<String>,

    pub message: Option<String>,

    /// Client-chosen unique reference code
    pub ref_code: Option<String>,
}

/// Request to replace the message of a registration.
///
/// Unlike `RegisterRequest`, a body that fails to parse (malformed JSON or a
/// non-string `message`) is reported as "Message is required", not as an
/// invalid body.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMessageRequest {
    pub message: Option<String>,
}

/// Response carrying a ref_code and a status.
///
/// Shared by register, status, and update.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub ref_code: String,
    pub status: RegistrationStatus,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub registration_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_missing_fields() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"phone_number": "07012345678"}"#).unwrap();

        assert_eq!(request.phone_number.as_deref(), Some("07012345678"));
        assert!(request.mobile_network.is_none());
        assert!(request.ref_code.is_none());
    }

    #[test]
    fn test_registration_response_serialization() {
        let response = RegistrationResponse {
            ref_code: "ABCDEFGHIJ1234567".into(),
            status: RegistrationStatus::Updated,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ref_code"], "ABCDEFGHIJ1234567");
        assert_eq!(json["status"], "updated");
    }
}
