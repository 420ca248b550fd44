//! Registration Service - phone number registrations keyed by reference code.
//!
//! Exposes three HTTP endpoints:
//! - Register a phone number on a mobile network under a client-chosen `ref_code`
//! - Look up the status of a registration
//! - Update the message attached to a registration
//!
//! All state is process-local. Every endpoint is rate limited per client address.

pub mod api;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod registry;
pub mod service;

pub use config::Config;
pub use error::ServiceError;
pub use rate_limit::RateLimiter;
pub use registry::{MobileNetwork, Registration, RegistrationStatus, Registry};
pub use service::RegistrationService;
