//! Registration records and their in-memory registry.

mod memory;

pub use memory::Registry;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Exactly 11 ASCII digits.
static PHONE_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{11}$").expect("Invalid phone number regex pattern"));

/// At least 16 ASCII alphanumerics.
static REF_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{16,}$").expect("Invalid ref_code regex pattern"));

/// Registration status.
///
/// Only `Successful` is ever stored. `Updated` is what the update endpoint
/// reports back; the stored status is left untouched by a message update.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Successful,
    Updated,
}

/// Supported mobile networks.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum MobileNetwork {
    #[serde(rename = "mtn")]
    Mtn,
    #[serde(rename = "airtel")]
    Airtel,
    #[serde(rename = "9mobile")]
    NineMobile,
    #[serde(rename = "glo")]
    Glo,
}

impl MobileNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            MobileNetwork::Mtn => "mtn",
            MobileNetwork::Airtel => "airtel",
            MobileNetwork::NineMobile => "9mobile",
            MobileNetwork::Glo => "glo",
        }
    }
}

impl fmt::Display for MobileNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MobileNetwork {
    type Err = String;

    /// Matching is exact: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mtn" => Ok(MobileNetwork::Mtn),
            "airtel" => Ok(MobileNetwork::Airtel),
            "9mobile" => Ok(MobileNetwork::NineMobile),
            "glo" => Ok(MobileNetwork::Glo),
            _ => Err("Invalid mobile network".into()),
        }
    }
}

/// A stored registration.
#[derive(Debug, Clone)]
pub struct Registration {
    /// 11-digit phone number
    pub phone_number: String,

    /// Carrier the number is on
    pub mobile_network: MobileNetwork,

    /// Free-form message attached to the registration
    pub message: String,

    pub status: RegistrationStatus,

    /// When the registration was created
    pub registered_at: DateTime<Utc>,

    /// When the message was last replaced
    pub updated_at: Option<DateTime<Utc>>,
}

impl Registration {
    /// Create a new successful registration.
    pub fn new(phone_number: String, mobile_network: MobileNetwork, message: String) -> Self {
        Self {
            phone_number,
            mobile_network,
            message,
            status: RegistrationStatus::Successful,
            registered_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Replace the attached message. The status is not changed.
    pub fn update_message(&mut self, message: String) {
        self.message = message;
        self.updated_at = Some(Utc::now());
    }
}

/// Validate a phone number: exactly 11 ASCII digits.
pub fn validate_phone_number(number: &str) -> Result<(), String> {
    if PHONE_NUMBER_PATTERN.is_match(number) {
        Ok(())
    } else {
        Err("Phone number must be 11 digits".into())
    }
}

/// Check the shape of a ref_code. Uniqueness is checked against the registry.
pub fn is_valid_ref_code_format(ref_code: &str) -> bool {
    REF_CODE_PATTERN.is_match(ref_code)
}
