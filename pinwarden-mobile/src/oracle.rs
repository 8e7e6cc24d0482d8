// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Platform Attestation Oracle
//!
//! Provides a callback interface for the native attestation SDK.
//! iOS and Android implement it on top of the vendor framework.

use std::collections::HashMap;
use std::sync::Arc;

use pinwarden_core::{AttestationOracle, PinTable, SecretFetchResult, TokenFetchResult};

use crate::types::{MobileSecretResult, MobileTokenResult};

/// Callback interface for the platform attestation SDK.
///
/// Implement this trait in Swift (iOS) or Kotlin (Android). Fetch methods
/// are called from a background thread and may block on network I/O.
#[uniffi::export(callback_interface)]
pub trait PlatformAttestationOracle: Send + Sync {
    /// Initialize the SDK with a configuration string.
    ///
    /// Returns empty string on success, error message on failure.
    fn initialize(&self, config: String) -> String;

    /// Fetch a token for the given URL.
    fn fetch_token(&self, url: String) -> MobileTokenResult;

    /// Look up a secret, or define it when `new_definition` is set.
    fn fetch_secret(&self, key: String, new_definition: Option<String>) -> MobileSecretResult;

    /// Fetch a JWT carrying the given JSON claims.
    fn fetch_custom_jwt(&self, payload: String) -> MobileTokenResult;

    /// Sign a message with the current session key.
    fn message_signature(&self, message: String) -> Option<String>;

    /// Current pins of the given type, keyed by host.
    ///
    /// Return None until the first fetch has completed.
    fn current_pins(&self, pin_type: String) -> Option<HashMap<String, Vec<String>>>;

    /// Bind the next token to this hash.
    fn set_data_hash(&self, hash: Vec<u8>);

    fn device_id(&self) -> Option<String>;
}

/// Oracle that delegates to the platform implementation.
pub struct PlatformOracle {
    handler: Arc<dyn PlatformAttestationOracle>,
}

impl PlatformOracle {
    pub fn new(handler: Arc<dyn PlatformAttestationOracle>) -> Self {
        PlatformOracle { handler }
    }
}

impl AttestationOracle for PlatformOracle {
    fn initialize(&self, config: &str) -> Result<(), String> {
        let error = self.handler.initialize(config.to_string());
        if error.is_empty() {
            Ok(())
        } else {
            Err(error)
        }
    }

    fn fetch_token(&self, url: &str) -> TokenFetchResult {
        self.handler.fetch_token(url.to_string()).into()
    }

    fn fetch_secret(&self, key: &str, new_definition: Option<&str>) -> SecretFetchResult {
        self.handler
            .fetch_secret(key.to_string(), new_definition.map(str::to_string))
            .into()
    }

    fn fetch_custom_jwt(&self, payload: &str) -> TokenFetchResult {
        self.handler.fetch_custom_jwt(payload.to_string()).into()
    }

    fn message_signature(&self, message: &str) -> Option<String> {
        self.handler.message_signature(message.to_string())
    }

    fn current_pins(&self, pin_type: &str) -> Option<PinTable> {
        let hosts = self.handler.current_pins(pin_type.to_string())?;
        let mut table = PinTable::new();
        for (host, pins) in hosts {
            table.insert(host, pins);
        }
        Some(table)
    }

    fn set_data_hash(&self, hash: &[u8]) {
        self.handler.set_data_hash(hash.to_vec());
    }

    fn device_id(&self) -> Option<String> {
        self.handler.device_id()
    }
}
