// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Oracle
//!
//! Scriptable implementation of [`AttestationOracle`] for testing.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::status::FetchStatus;
use super::{AttestationOracle, SecretFetchResult, TokenFetchResult};
use crate::pinning::PinTable;

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleCall {
    Initialize(String),
    FetchToken(String),
    FetchSecret {
        key: String,
        new_definition: Option<String>,
    },
    FetchCustomJwt(String),
    MessageSignature(String),
    CurrentPins(String),
    SetDataHash(Vec<u8>),
    DeviceId,
}

#[derive(Debug)]
struct MockState {
    init_result: Result<(), String>,
    token: TokenFetchResult,
    jwt: TokenFetchResult,
    secrets: HashMap<String, SecretFetchResult>,
    pins: Option<PinTable>,
    signature: Option<String>,
    device_id: Option<String>,
    calls: Vec<OracleCall>,
}

/// Mock oracle for testing.
///
/// Responses are scripted up front; every call is recorded.
///
/// # Example
///
/// ```ignore
/// use pinwarden_core::oracle::{MockOracle, SecretFetchResult};
///
/// let oracle = MockOracle::new();
/// oracle.set_secret("abc123", SecretFetchResult::success("XYZ"));
///
/// // Keys without a scripted answer report UNKNOWN_KEY
/// assert_eq!(oracle.fetch_secret_calls(), 0);
/// ```
#[derive(Debug)]
pub struct MockOracle {
    state: Mutex<MockState>,
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOracle {
    /// Creates a mock whose token fetches succeed with `mock-token`.
    pub fn new() -> Self {
        MockOracle {
            state: Mutex::new(MockState {
                init_result: Ok(()),
                token: TokenFetchResult::success("mock-token"),
                jwt: TokenFetchResult::success("mock-jwt"),
                secrets: HashMap::new(),
                pins: None,
                signature: None,
                device_id: Some("mock-device".to_string()),
                calls: Vec::new(),
            }),
        }
    }

    pub fn set_init_result(&self, result: Result<(), String>) {
        self.state.lock().init_result = result;
    }

    pub fn set_token_result(&self, result: TokenFetchResult) {
        self.state.lock().token = result;
    }

    pub fn set_jwt_result(&self, result: TokenFetchResult) {
        self.state.lock().jwt = result;
    }

    /// Scripts the answer for `key`. Unscripted keys answer `UNKNOWN_KEY`.
    pub fn set_secret(&self, key: impl Into<String>, result: SecretFetchResult) {
        self.state.lock().secrets.insert(key.into(), result);
    }

    pub fn set_pins(&self, pins: Option<PinTable>) {
        self.state.lock().pins = pins;
    }

    pub fn set_signature(&self, signature: Option<String>) {
        self.state.lock().signature = signature;
    }

    pub fn set_device_id(&self, device_id: Option<String>) {
        self.state.lock().device_id = device_id;
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<OracleCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn fetch_token_calls(&self) -> usize {
        self.count(|c| matches!(c, OracleCall::FetchToken(_)))
    }

    pub fn fetch_secret_calls(&self) -> usize {
        self.count(|c| matches!(c, OracleCall::FetchSecret { .. }))
    }

    /// Binding hashes recorded, in order.
    pub fn data_hashes(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                OracleCall::SetDataHash(hash) => Some(hash.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&OracleCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: OracleCall) {
        self.state.lock().calls.push(call);
    }
}

impl AttestationOracle for MockOracle {
    fn initialize(&self, config: &str) -> Result<(), String> {
        self.record(OracleCall::Initialize(config.to_string()));
        self.state.lock().init_result.clone()
    }

    fn fetch_token(&self, url: &str) -> TokenFetchResult {
        self.record(OracleCall::FetchToken(url.to_string()));
        self.state.lock().token.clone()
    }

    fn fetch_secret(&self, key: &str, new_definition: Option<&str>) -> SecretFetchResult {
        self.record(OracleCall::FetchSecret {
            key: key.to_string(),
            new_definition: new_definition.map(str::to_string),
        });
        let mut state = self.state.lock();
        match new_definition {
            Some(value) => {
                let defined = SecretFetchResult::success(value);
                state.secrets.insert(key.to_string(), defined.clone());
                defined
            }
            None => state
                .secrets
                .get(key)
                .cloned()
                .unwrap_or_else(|| SecretFetchResult::failed(FetchStatus::UnknownKey)),
        }
    }

    fn fetch_custom_jwt(&self, payload: &str) -> TokenFetchResult {
        self.record(OracleCall::FetchCustomJwt(payload.to_string()));
        self.state.lock().jwt.clone()
    }

    fn message_signature(&self, message: &str) -> Option<String> {
        self.record(OracleCall::MessageSignature(message.to_string()));
        self.state.lock().signature.clone()
    }

    fn current_pins(&self, pin_type: &str) -> Option<PinTable> {
        self.record(OracleCall::CurrentPins(pin_type.to_string()));
        self.state.lock().pins.clone()
    }

    fn set_data_hash(&self, hash: &[u8]) {
        self.record(OracleCall::SetDataHash(hash.to_vec()));
    }

    fn device_id(&self) -> Option<String> {
        self.record(OracleCall::DeviceId);
        self.state.lock().device_id.clone()
    }
}
