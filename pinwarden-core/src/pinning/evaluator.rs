// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Trust Evaluation
//!
//! A presented chain is trusted when it passes standard chain validation
//! AND, for pinned hosts, at least one key anywhere in the chain matches
//! the host's active pin set. Matching intermediates as well as the leaf
//! tolerates leaf rotation under a pinned issuing CA.

use std::sync::Arc;

use super::fingerprint::PublicKeyInfo;
use super::store::{ActivePins, PinStore, PinTable};
use crate::error::{FingerprintError, PinningError};

/// Standard certificate-chain validation, provided by the platform.
pub trait ChainValidator: Send + Sync {
    /// Validates `chain` (DER, leaf first) for `host`.
    fn validate(&self, host: &str, chain: &[&[u8]]) -> Result<(), PinningError>;
}

/// Validator for chains the platform has already validated.
///
/// Mobile TLS stacks run their default evaluation before handing the
/// chain over, so only the pin check remains.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformValidated;

impl ChainValidator for PlatformValidated {
    fn validate(&self, _host: &str, _chain: &[&[u8]]) -> Result<(), PinningError> {
        Ok(())
    }
}

/// Outcome of an accepted pin check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinVerdict {
    /// The host is not pinned.
    Unpinned,
    /// A key in the chain matched.
    Matched { pin: String, chain_index: usize },
}

/// Matches a chain's keys against the pins for `host`.
///
/// Keys are consumed lazily, leaf first, and the first match wins. A key
/// that fails to fingerprint is skipped; its error is only reported when
/// every key failed.
pub fn match_chain<I>(table: &PinTable, host: &str, keys: I) -> Result<PinVerdict, PinningError>
where
    I: IntoIterator<Item = Result<PublicKeyInfo, FingerprintError>>,
{
    let pins = match table.active_pins(host) {
        ActivePins::Unpinned => {
            tracing::debug!(host, "pin verification: host unpinned");
            return Ok(PinVerdict::Unpinned);
        }
        ActivePins::Pinned(pins) => pins,
    };

    let mut usable_keys = 0usize;
    let mut last_error = None;

    for (chain_index, key) in keys.into_iter().enumerate() {
        let fingerprint = match key.and_then(|k| k.fingerprint()) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                tracing::debug!(host, chain_index, error = %e, "skipping key");
                last_error = Some(e);
                continue;
            }
        };
        usable_keys += 1;

        if pins.contains(&fingerprint) {
            tracing::info!(
                host,
                pin = %fingerprint,
                chain_index,
                pin_count = pins.len(),
                "pin verification: matched"
            );
            return Ok(PinVerdict::Matched {
                pin: fingerprint,
                chain_index,
            });
        }
    }

    if usable_keys == 0 {
        if let Some(e) = last_error {
            tracing::warn!(host, error = %e, "pin verification: no usable key in chain");
            return Err(PinningError::NoUsableKey {
                host: host.to_string(),
                reason: e.to_string(),
            });
        }
    }

    tracing::warn!(
        host,
        pin_count = pins.len(),
        "pin verification: no match"
    );
    Err(PinningError::PinMismatch {
        host: host.to_string(),
    })
}

/// Decides accept/reject for a chain using the current pin table.
#[derive(Clone)]
pub struct TrustEvaluator {
    pins: Arc<PinStore>,
    validator: Arc<dyn ChainValidator>,
}

impl TrustEvaluator {
    pub fn new(pins: Arc<PinStore>, validator: Arc<dyn ChainValidator>) -> Self {
        TrustEvaluator { pins, validator }
    }

    /// Evaluator for chains already validated by the platform.
    pub fn platform_validated(pins: Arc<PinStore>) -> Self {
        Self::new(pins, Arc::new(PlatformValidated))
    }

    /// Runs chain validation, then the pin check.
    pub fn evaluate(&self, host: &str, chain: &[&[u8]]) -> Result<PinVerdict, PinningError> {
        self.validator.validate(host, chain)?;
        self.check_pins(host, chain)
    }

    /// Pin check only, against one snapshot of the pin table.
    pub fn check_pins(&self, host: &str, chain: &[&[u8]]) -> Result<PinVerdict, PinningError> {
        let table = self.pins.current();
        match_chain(
            &table,
            host,
            chain
                .iter()
                .map(|der| PublicKeyInfo::from_certificate_der(der)),
        )
    }
}

impl std::fmt::Debug for TrustEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustEvaluator")
            .field("pins", &self.pins)
            .finish_non_exhaustive()
    }
}
