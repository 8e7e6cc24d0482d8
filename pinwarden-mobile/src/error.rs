//! Mobile-friendly error types.

use pinwarden_core::{PinningError, ServiceError};

/// Mobile-friendly error type.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MobileError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid exclusion pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Pinning error: {0}")]
    Pinning(String),

    #[error("Network error: {0}")]
    Networking(String),

    #[error("Rejected: {message}")]
    Rejection {
        message: String,
        attestation_record: Option<String>,
        rejection_reasons: Option<String>,
    },

    #[error("Permanent error: {0}")]
    Permanent(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ServiceError> for MobileError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Initialization(msg) => MobileError::Initialization(msg),
            ServiceError::Configuration(msg) => MobileError::Configuration(msg),
            ServiceError::InvalidPattern { pattern, reason } => {
                MobileError::InvalidPattern { pattern, reason }
            }
            ServiceError::Pinning(e) => MobileError::Pinning(e.to_string()),
            ServiceError::Networking(msg) => MobileError::Networking(msg),
            ServiceError::Rejection {
                message,
                attestation_record,
                rejection_reasons,
            } => MobileError::Rejection {
                message,
                attestation_record,
                rejection_reasons,
            },
            ServiceError::Permanent(msg) => MobileError::Permanent(msg),
        }
    }
}

impl From<PinningError> for MobileError {
    fn from(err: PinningError) -> Self {
        MobileError::Pinning(err.to_string())
    }
}
