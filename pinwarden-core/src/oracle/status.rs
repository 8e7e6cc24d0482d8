// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Oracle fetch statuses.

use std::fmt;

/// Status reported by the oracle for a token or secret fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    Success,
    NoNetwork,
    PoorNetwork,
    MitmDetected,
    /// The URL's domain is not protected by the service.
    UnprotectedUrl,
    UnknownUrl,
    /// The attestation service is not configured for this app.
    NoService,
    Rejected,
    UnknownKey,
    BadKey,
    BadPayload,
    /// The feature is disabled for the account.
    Disabled,
    /// Any status not otherwise classified. Treated as permanent.
    Other(String),
}

impl FetchStatus {
    /// Oracle unreachable, degraded or intercepted.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            FetchStatus::NoNetwork | FetchStatus::PoorNetwork | FetchStatus::MitmDetected
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            FetchStatus::Success => "SUCCESS",
            FetchStatus::NoNetwork => "NO_NETWORK",
            FetchStatus::PoorNetwork => "POOR_NETWORK",
            FetchStatus::MitmDetected => "MITM_DETECTED",
            FetchStatus::UnprotectedUrl => "UNPROTECTED_URL",
            FetchStatus::UnknownUrl => "UNKNOWN_URL",
            FetchStatus::NoService => "NO_SERVICE",
            FetchStatus::Rejected => "REJECTED",
            FetchStatus::UnknownKey => "UNKNOWN_KEY",
            FetchStatus::BadKey => "BAD_KEY",
            FetchStatus::BadPayload => "BAD_PAYLOAD",
            FetchStatus::Disabled => "DISABLED",
            FetchStatus::Other(name) => name,
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_class() {
        assert!(FetchStatus::NoNetwork.is_network_failure());
        assert!(FetchStatus::PoorNetwork.is_network_failure());
        assert!(FetchStatus::MitmDetected.is_network_failure());
        assert!(!FetchStatus::Rejected.is_network_failure());
        assert!(!FetchStatus::Other("INTERNAL_ERROR".into()).is_network_failure());
    }

    #[test]
    fn test_display_uses_wire_names() {
        assert_eq!(FetchStatus::UnknownKey.to_string(), "UNKNOWN_KEY");
        assert_eq!(FetchStatus::Other("BAD_URL".into()).to_string(), "BAD_URL");
    }
}
