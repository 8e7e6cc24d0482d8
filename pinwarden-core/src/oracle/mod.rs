// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Attestation Oracle
//!
//! Platform-agnostic interface to the remote attestation service. The
//! oracle issues tokens bound to request URLs, resolves secret-lookup keys,
//! signs messages and publishes the current pin table. Blocking methods may
//! wait on network I/O and must not be called from latency-sensitive
//! threads.

mod mock;
mod status;

pub use mock::{MockOracle, OracleCall};
pub use status::FetchStatus;

use crate::pinning::PinTable;

/// Result of a token (or custom JWT) fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFetchResult {
    pub status: FetchStatus,
    /// Empty unless `status` is [`FetchStatus::Success`].
    pub token: String,
    /// Attestation record, present on rejection.
    pub attestation_record: Option<String>,
    /// Human-readable rejection reasons, present on rejection.
    pub rejection_reasons: Option<String>,
}

impl TokenFetchResult {
    pub fn success(token: impl Into<String>) -> Self {
        TokenFetchResult {
            status: FetchStatus::Success,
            token: token.into(),
            attestation_record: None,
            rejection_reasons: None,
        }
    }

    pub fn failed(status: FetchStatus) -> Self {
        TokenFetchResult {
            status,
            token: String::new(),
            attestation_record: None,
            rejection_reasons: None,
        }
    }

    pub fn rejected(attestation_record: Option<String>, rejection_reasons: Option<String>) -> Self {
        TokenFetchResult {
            status: FetchStatus::Rejected,
            token: String::new(),
            attestation_record,
            rejection_reasons,
        }
    }
}

/// Result of a secret lookup or definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretFetchResult {
    pub status: FetchStatus,
    pub secret: Option<String>,
    /// Attestation record, present on rejection.
    pub attestation_record: Option<String>,
    /// Human-readable rejection reasons, present on rejection.
    pub rejection_reasons: Option<String>,
}

impl SecretFetchResult {
    pub fn success(secret: impl Into<String>) -> Self {
        SecretFetchResult {
            status: FetchStatus::Success,
            secret: Some(secret.into()),
            attestation_record: None,
            rejection_reasons: None,
        }
    }

    pub fn failed(status: FetchStatus) -> Self {
        SecretFetchResult {
            status,
            secret: None,
            attestation_record: None,
            rejection_reasons: None,
        }
    }

    pub fn rejected(attestation_record: Option<String>, rejection_reasons: Option<String>) -> Self {
        SecretFetchResult {
            status: FetchStatus::Rejected,
            secret: None,
            attestation_record,
            rejection_reasons,
        }
    }
}

/// Interface to the attestation service.
pub trait AttestationOracle: Send + Sync {
    /// Initializes the oracle with a configuration string.
    fn initialize(&self, config: &str) -> Result<(), String>;

    /// Fetches a token for `url`. Blocking.
    fn fetch_token(&self, url: &str) -> TokenFetchResult;

    /// Looks up (`new_definition == None`) or defines a secret. Blocking.
    fn fetch_secret(&self, key: &str, new_definition: Option<&str>) -> SecretFetchResult;

    /// Fetches a custom JWT carrying the given JSON claims. Blocking.
    fn fetch_custom_jwt(&self, payload: &str) -> TokenFetchResult;

    /// Signs `message` with the session key of the last successful fetch.
    fn message_signature(&self, message: &str) -> Option<String>;

    /// Current pins of the given type, if an initial fetch has completed.
    fn current_pins(&self, pin_type: &str) -> Option<PinTable>;

    /// Records a binding hash for the next token fetch.
    fn set_data_hash(&self, hash: &[u8]);

    /// Device identifier assigned by the service.
    fn device_id(&self) -> Option<String>;
}
