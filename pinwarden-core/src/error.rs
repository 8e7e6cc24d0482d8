// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error Types
//!
//! Errors are split by concern: key fingerprinting, TLS pin evaluation and
//! the service-level taxonomy surfaced to callers of the request pipeline.

use thiserror::Error;

/// Failure to derive a fingerprint from a public key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// No SPKI prefix is known for this algorithm/size pair.
    #[error("unsupported key: {algorithm} {bits} bits")]
    UnsupportedKey { algorithm: String, bits: u32 },

    /// The certificate carrying the key could not be parsed.
    #[error("certificate parse error: {0}")]
    CertificateParse(String),
}

/// TLS trust evaluation failure. Always fatal for the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PinningError {
    /// Standard chain validation rejected the presented chain.
    #[error("certificate chain invalid: {0}")]
    ChainInvalid(String),

    /// No key in the chain matched the active pin set for the host.
    #[error("public key for host {host} does not match any pins")]
    PinMismatch { host: String },

    /// Every key in the chain failed to fingerprint.
    #[error("no usable public key in chain for host {host}: {reason}")]
    NoUsableKey { host: String, reason: String },
}

/// Service-level error taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The attestation oracle could not be initialized.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// Conflicting or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An exclusion pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// TLS pinning failure.
    #[error("pinning error: {0}")]
    Pinning(#[from] PinningError),

    /// Oracle unreachable, degraded or a MitM was suspected. Retryable.
    #[error("networking error: {0}")]
    Networking(String),

    /// The oracle explicitly rejected the app or request.
    #[error("rejection error: {message}")]
    Rejection {
        message: String,
        attestation_record: Option<String>,
        rejection_reasons: Option<String>,
    },

    /// Any other oracle status.
    #[error("permanent error: {0}")]
    Permanent(String),
}

impl ServiceError {
    /// Returns true if the caller may offer the end user a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Networking(_))
    }

    /// Returns true for configuration-class errors.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ServiceError::Configuration(_) | ServiceError::InvalidPattern { .. }
        )
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_networking_is_retryable() {
        assert!(ServiceError::Networking("no network".into()).is_retryable());
        assert!(!ServiceError::Permanent("bad".into()).is_retryable());
        assert!(!ServiceError::Pinning(PinningError::PinMismatch {
            host: "a.example.com".into()
        })
        .is_retryable());
    }

    #[test]
    fn test_invalid_pattern_is_configuration_class() {
        let err = ServiceError::InvalidPattern {
            pattern: "(".into(),
            reason: "unclosed group".into(),
        };
        assert!(err.is_configuration());
        assert!(err.to_string().contains("\"(\""));
    }
}
