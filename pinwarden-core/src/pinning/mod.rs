// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dynamic Public-Key Pinning
//!
//! Pins are base64 SHA-256 fingerprints of SubjectPublicKeyInfo structures,
//! delivered per host by the attestation oracle and refreshed after each
//! successful token fetch.
//!
//! - [`fingerprint`] - SPKI reconstruction and hashing
//! - [`store`] - pin table snapshots
//! - [`evaluator`] - chain validation plus pin matching
//! - `verifier` - rustls `ServerCertVerifier` (feature `rustls-verifier`)

pub mod evaluator;
pub mod fingerprint;
pub mod store;
#[cfg(feature = "rustls-verifier")]
pub mod verifier;

pub use evaluator::{match_chain, ChainValidator, PinVerdict, PlatformValidated, TrustEvaluator};
pub use fingerprint::{fingerprint, spki, spki_header, KeyAlgorithm, PublicKeyInfo};
pub use store::{ActivePins, PinStore, PinTable, PIN_TYPE_PUBLIC_KEY_SHA256, WILDCARD_HOST};
#[cfg(feature = "rustls-verifier")]
pub use verifier::PinningVerifier;
