// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! PinWarden Core Library
//!
//! App attestation and dynamic certificate pinning for HTTP clients.
//! Outgoing requests are decorated with attestation tokens, placeholder
//! secrets are swapped for real ones, and TLS connections are checked
//! against pins delivered by the attestation service.
//! All hashing uses the audited `ring` crate.

pub mod config;
pub mod context;
pub mod error;
pub mod exclusion;
pub mod oracle;
pub mod pinning;
pub mod pipeline;
pub mod request;
pub mod substitution;

pub use config::{RequestSettings, ServiceConfig, TokenHeader, DEFAULT_TOKEN_HEADER};
pub use context::{AttestationContext, PRECHECK_KEY, PREFETCH_URL};
pub use error::{FingerprintError, PinningError, ServiceError, ServiceResult};
pub use exclusion::ExclusionSet;
pub use oracle::{
    AttestationOracle, FetchStatus, MockOracle, OracleCall, SecretFetchResult, TokenFetchResult,
};
pub use pinning::{
    fingerprint, ChainValidator, KeyAlgorithm, PinStore, PinTable, PinVerdict, PlatformValidated,
    PublicKeyInfo, TrustEvaluator,
};
#[cfg(feature = "rustls-verifier")]
pub use pinning::PinningVerifier;
pub use pipeline::{Decision, RequestPipeline};
pub use request::OutgoingRequest;
pub use substitution::SubstitutionRegistry;
