//! Registration service: validation, storage, and per-client admission.

use crate::error::ServiceError;
use crate::rate_limit::RateLimiter;
use crate::registry::{
    is_valid_ref_code_format, validate_phone_number, MobileNetwork, Registration,
    RegistrationStatus, Registry,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Shared registration service.
///
/// Owns the registry and the rate limiter for the lifetime of the process.
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct RegistrationService {
    registry: Arc<RwLock<Registry>>,
    limiter: Arc<RateLimiter>,
}

impl RegistrationService {
    /// Create a service over an existing registry and limiter.
    pub fn new(registry: Registry, limiter: RateLimiter) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            limiter: Arc::new(limiter),
        }
    }

    /// Count a request from `client` against its rate limit.
    pub fn admit(&self, client: &str) -> Result<(), ServiceError> {
        if self.limiter.check(client) {
            debug!(client, "Rate limit check passed");
            Ok(())
        } else {
            warn!(client, "Rate limit exceeded");
            Err(ServiceError::RateLimited)
        }
    }

    /// Register a phone number under `ref_code`.
    ///
    /// Checks run in order and the first failure is returned. Nothing is
    /// written unless every check passes.
    pub async fn register(
        &self,
        phone_number: &str,
        mobile_network: &str,
        message: &str,
        ref_code: &str,
    ) -> Result<RegistrationStatus, ServiceError> {
        validate_phone_number(phone_number).map_err(ServiceError::InvalidInput)?;
        let network: MobileNetwork = mobile_network.parse().map_err(ServiceError::InvalidInput)?;

        let invalid_ref_code = || ServiceError::InvalidInput("Invalid or duplicate ref_code".into());
        if !is_valid_ref_code_format(ref_code) {
            return Err(invalid_ref_code());
        }

        let registration = Registration::new(phone_number.to_owned(), network, message.to_owned());
        let status = registration.status;

        let mut registry = self.registry.write().await;
        if !registry.insert_new(ref_code.to_owned(), registration) {
            debug!(ref_code, "Duplicate ref_code rejected");
            return Err(invalid_ref_code());
        }

        info!(ref_code, mobile_network = %network, "Registered user");
        Ok(status)
    }

    /// Current stored status of a registration.
    pub async fn check_status(&self, ref_code: &str) -> Result<RegistrationStatus, ServiceError> {
        let registry = self.registry.read().await;
        let registration = registry.get(ref_code).ok_or_else(not_found)?;

        info!(ref_code, "Checked status");
        Ok(registration.status)
    }

    /// Replace the message attached to a registration.
    ///
    /// Reports `Updated` while the stored status is left as it was.
    pub async fn update_message(
        &self,
        ref_code: &str,
        message: Option<&str>,
    ) -> Result<RegistrationStatus, ServiceError> {
        let mut registry = self.registry.write().await;
        let registration = registry.get_mut(ref_code).ok_or_else(not_found)?;

        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => return Err(ServiceError::InvalidInput("Message is required".into())),
        };

        registration.update_message(message.to_owned());

        info!(ref_code, "Updated message");
        Ok(RegistrationStatus::Updated)
    }

    /// Stored message of a registration, if present.
    #[cfg(test)]
    pub(crate) async fn message(&self, ref_code: &str) -> Option<String> {
        let registry = self.registry.read().await;
        registry.get(ref_code).map(|r| r.message.clone())
    }

    /// Number of stored registrations.
    pub async fn registration_count(&self) -> usize {
        self.registry.read().await.count()
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Registration not found".into())
}
