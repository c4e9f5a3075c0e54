//! Error types for the fingerprint generator
//!
//! Every failure is fatal to the single run that produced it: there is no
//! retry and no partial result. Errors carry:
//! - A variant per failure mode (attribute access, digest, cookie write)
//! - A numeric code for programmatic handling from JavaScript
//! - A conversion into `JsValue` so exported promises reject with a message

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Environment errors (1xx)
    AttributeUnavailable = 100,
    NoWindow = 101,

    // Digest errors (2xx)
    DigestUnavailable = 200,
    DigestFailed = 201,
    InvalidDigestLength = 202,
    InvalidFingerprint = 203,

    // Cookie errors (3xx)
    CookieWriteFailed = 300,

    // Configuration errors (8xx)
    ConfigError = 800,
}

/// Main error type for the fingerprint generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    // ===== Environment Errors =====
    #[error("Attribute {attribute} unavailable: {reason}")]
    AttributeUnavailable { attribute: String, reason: String },

    #[error("No global window object")]
    NoWindow,

    // ===== Digest Errors =====
    #[error("Digest primitive unavailable: {0}")]
    DigestUnavailable(String),

    #[error("Digest failed: {0}")]
    Digest(String),

    #[error("Digest returned {0} bytes, expected 32")]
    InvalidDigestLength(usize),

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    // ===== Cookie Errors =====
    #[error("Cookie write failed: {0}")]
    CookieWrite(String),

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FingerprintError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            FingerprintError::AttributeUnavailable { .. } => ErrorCode::AttributeUnavailable,
            FingerprintError::NoWindow => ErrorCode::NoWindow,

            FingerprintError::DigestUnavailable(_) => ErrorCode::DigestUnavailable,
            FingerprintError::Digest(_) => ErrorCode::DigestFailed,
            FingerprintError::InvalidDigestLength(_) => ErrorCode::InvalidDigestLength,
            FingerprintError::InvalidFingerprint(_) => ErrorCode::InvalidFingerprint,

            FingerprintError::CookieWrite(_) => ErrorCode::CookieWriteFailed,

            FingerprintError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Whether the host environment cannot run the generator at all
    /// (missing window, or a non-secure context without `crypto.subtle`).
    pub fn is_environment_unsupported(&self) -> bool {
        matches!(
            self,
            FingerprintError::NoWindow | FingerprintError::DigestUnavailable(_)
        )
    }

    /// Build an `AttributeUnavailable` error from a failed JS accessor
    pub fn attribute(attribute: &str, reason: impl Into<String>) -> Self {
        FingerprintError::AttributeUnavailable {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }
}

/// Render a thrown JS value for inclusion in an error message.
pub(crate) fn describe_js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

impl From<FingerprintError> for JsValue {
    fn from(err: FingerprintError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Error information for JavaScript consumption
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
    pub environment_unsupported: bool,
}

impl From<&FingerprintError> for ErrorInfo {
    fn from(err: &FingerprintError) -> Self {
        ErrorInfo {
            code: err.code() as u32,
            message: err.to_string(),
            environment_unsupported: err.is_environment_unsupported(),
        }
    }
}
