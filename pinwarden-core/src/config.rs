// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration
//!
//! [`ServiceConfig`] is the static description used to build a context.
//! [`RequestSettings`] holds the scalar values the pipeline reads on every
//! request; each is guarded independently and may change at runtime.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};

/// Default header carrying the attestation token.
pub const DEFAULT_TOKEN_HEADER: &str = "Attestation-Token";

/// Configuration for an attestation context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Oracle configuration string. Empty means configured externally.
    pub oracle_config: String,

    /// Header the token is placed on.
    pub token_header: String,

    /// Prefix prepended to the token (e.g. "Bearer ").
    pub token_prefix: String,

    /// Header whose value is hashed into the token.
    pub binding_header: Option<String>,

    /// Continue without protection when the oracle is unreachable.
    pub proceed_on_network_failure: bool,

    /// Header name to required value prefix.
    pub substitution_headers: BTreeMap<String, String>,

    pub substitution_query_params: Vec<String>,

    /// URL regular expressions that bypass the pipeline.
    pub exclusion_patterns: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            oracle_config: String::new(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            token_prefix: String::new(),
            binding_header: None,
            proceed_on_network_failure: false,
            substitution_headers: BTreeMap::new(),
            substitution_query_params: Vec::new(),
            exclusion_patterns: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Parses a JSON configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> ServiceResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ServiceError::Configuration(format!("invalid service config: {}", e)))
    }

    pub fn with_oracle_config(mut self, config: impl Into<String>) -> Self {
        self.oracle_config = config.into();
        self
    }

    pub fn with_token_header(mut self, header: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.token_header = header.into();
        self.token_prefix = prefix.into();
        self
    }

    pub fn with_binding_header(mut self, header: impl Into<String>) -> Self {
        self.binding_header = Some(header.into());
        self
    }

    pub fn with_proceed_on_network_failure(mut self, proceed: bool) -> Self {
        self.proceed_on_network_failure = proceed;
        self
    }

    pub fn with_substitution_header(mut self, header: impl Into<String>, prefix: Option<&str>) -> Self {
        self.substitution_headers
            .insert(header.into(), prefix.unwrap_or_default().to_string());
        self
    }

    pub fn with_substitution_query_param(mut self, name: impl Into<String>) -> Self {
        self.substitution_query_params.push(name.into());
        self
    }

    pub fn with_exclusion_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.exclusion_patterns.push(pattern.into());
        self
    }
}

/// Token header name and prefix, always read and written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    pub name: String,
    pub prefix: String,
}

/// Runtime scalar settings read by the pipeline.
#[derive(Debug)]
pub struct RequestSettings {
    proceed_on_network_failure: AtomicBool,
    binding_header: RwLock<Option<String>>,
    token_header: RwLock<TokenHeader>,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}

impl RequestSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        RequestSettings {
            proceed_on_network_failure: AtomicBool::new(config.proceed_on_network_failure),
            binding_header: RwLock::new(config.binding_header.clone().filter(|h| !h.is_empty())),
            token_header: RwLock::new(TokenHeader {
                name: config.token_header.clone(),
                prefix: config.token_prefix.clone(),
            }),
        }
    }

    pub fn proceed_on_network_failure(&self) -> bool {
        self.proceed_on_network_failure.load(Ordering::SeqCst)
    }

    pub fn set_proceed_on_network_failure(&self, proceed: bool) {
        tracing::info!(proceed, "proceed on network failure");
        self.proceed_on_network_failure
            .store(proceed, Ordering::SeqCst);
    }

    pub fn binding_header(&self) -> Option<String> {
        self.binding_header.read().clone()
    }

    /// Sets the binding header. An empty name disables binding.
    pub fn set_binding_header(&self, header: &str) {
        *self.binding_header.write() = if header.is_empty() {
            None
        } else {
            Some(header.to_string())
        };
    }

    pub fn token_header(&self) -> TokenHeader {
        self.token_header.read().clone()
    }

    pub fn set_token_header(&self, name: &str, prefix: &str) {
        *self.token_header.write() = TokenHeader {
            name: name.to_string(),
            prefix: prefix.to_string(),
        };
    }
}
