// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Attestation Context
//!
//! Main entry point. Owns the oracle handle, the runtime settings, the
//! registries and the shared pin store, and exposes the request pipeline
//! plus the direct oracle operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::config::{RequestSettings, ServiceConfig};
use crate::error::{PinningError, ServiceError, ServiceResult};
use crate::exclusion::ExclusionSet;
use crate::oracle::{AttestationOracle, FetchStatus, SecretFetchResult};
use crate::pinning::{
    PinStore, PinVerdict, TrustEvaluator, PIN_TYPE_PUBLIC_KEY_SHA256,
};
use crate::pipeline::{binding_hash, Decision, RequestPipeline};
use crate::request::OutgoingRequest;
use crate::substitution::SubstitutionRegistry;

/// URL used to warm the oracle's token cache.
pub const PREFETCH_URL: &str = "https://prefetch.pinwarden.invalid/";

/// Secret key used by [`AttestationContext::precheck`]. Never defined.
pub const PRECHECK_KEY: &str = "precheck-dummy-key";

/// Attestation context shared by every request issued by the app.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use pinwarden_core::{AttestationContext, MockOracle, OutgoingRequest};
///
/// let ctx = AttestationContext::new(Arc::new(MockOracle::new()));
/// ctx.initialize("config")?;
/// ctx.add_substitution_header("Api-Key", None);
///
/// let request = OutgoingRequest::parse("https://api.example.com/v1")?;
/// let ready = ctx.update_request(&request).into_result()?;
/// ```
pub struct AttestationContext {
    oracle: Arc<dyn AttestationOracle>,
    /// Config string of the successful initialization.
    init: Mutex<Option<String>>,
    initialized: AtomicBool,
    settings: RequestSettings,
    pins: Arc<PinStore>,
    exclusions: ExclusionSet,
    substitutions: SubstitutionRegistry,
}

impl AttestationContext {
    /// Creates an uninitialized context with default settings.
    pub fn new(oracle: Arc<dyn AttestationOracle>) -> Self {
        AttestationContext {
            oracle,
            init: Mutex::new(None),
            initialized: AtomicBool::new(false),
            settings: RequestSettings::default(),
            pins: Arc::new(PinStore::new()),
            exclusions: ExclusionSet::new(),
            substitutions: SubstitutionRegistry::new(),
        }
    }

    /// Creates a context from `config` and initializes it.
    ///
    /// Fails if an exclusion pattern is invalid or initialization fails.
    pub fn with_config(oracle: Arc<dyn AttestationOracle>, config: &ServiceConfig) -> ServiceResult<Self> {
        let ctx = AttestationContext {
            settings: RequestSettings::from_config(config),
            ..Self::new(oracle)
        };

        for pattern in &config.exclusion_patterns {
            ctx.exclusions.add(pattern)?;
        }
        for (header, prefix) in &config.substitution_headers {
            ctx.substitutions.add_header(header, Some(prefix));
        }
        for param in &config.substitution_query_params {
            ctx.substitutions.add_query_param(param);
        }

        ctx.initialize(&config.oracle_config)?;
        Ok(ctx)
    }

    /// Initializes the oracle.
    ///
    /// Idempotent for the same config. A different config after a
    /// successful initialization is a configuration error. An empty config
    /// marks the context initialized without calling the oracle.
    pub fn initialize(&self, config: &str) -> ServiceResult<()> {
        let mut init = self.init.lock();
        if let Some(used) = init.as_deref() {
            if used == config {
                return Ok(());
            }
            return Err(ServiceError::Configuration(
                "already initialized with a different configuration".into(),
            ));
        }

        if !config.is_empty() {
            self.oracle.initialize(config).map_err(|e| {
                tracing::error!(error = %e, "oracle initialization failed");
                ServiceError::Initialization(e)
            })?;
        }

        *init = Some(config.to_string());
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!("attestation context initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    pub fn substitutions(&self) -> &SubstitutionRegistry {
        &self.substitutions
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub(crate) fn oracle(&self) -> &dyn AttestationOracle {
        self.oracle.as_ref()
    }

    // === Settings ===

    pub fn set_proceed_on_network_failure(&self, proceed: bool) {
        self.settings.set_proceed_on_network_failure(proceed);
    }

    pub fn set_binding_header(&self, header: &str) {
        self.settings.set_binding_header(header);
    }

    pub fn set_token_header(&self, header: &str, prefix: &str) {
        self.settings.set_token_header(header, prefix);
    }

    // === Registries ===

    pub fn add_substitution_header(&self, header: &str, prefix: Option<&str>) {
        self.substitutions.add_header(header, prefix);
    }

    pub fn remove_substitution_header(&self, header: &str) -> bool {
        self.substitutions.remove_header(header)
    }

    pub fn add_substitution_query_param(&self, name: &str) {
        self.substitutions.add_query_param(name);
    }

    pub fn remove_substitution_query_param(&self, name: &str) -> bool {
        self.substitutions.remove_query_param(name)
    }

    pub fn add_exclusion_pattern(&self, pattern: &str) -> ServiceResult<()> {
        self.exclusions.add(pattern)
    }

    pub fn remove_exclusion_pattern(&self, pattern: &str) -> bool {
        self.exclusions.remove(pattern)
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        self.exclusions.is_excluded(url)
    }

    // === Request pipeline ===

    /// Runs `request` through the pipeline. Blocks on oracle calls.
    pub fn update_request(&self, request: &OutgoingRequest) -> Decision {
        RequestPipeline::new(self).run(request)
    }

    // === Pinning ===

    pub fn pin_store(&self) -> Arc<PinStore> {
        Arc::clone(&self.pins)
    }

    /// Replaces the pin table with the oracle's current public-key pins.
    ///
    /// Returns false if the oracle has no pins yet; the old table stays.
    pub fn refresh_pins(&self) -> bool {
        match self.oracle.current_pins(PIN_TYPE_PUBLIC_KEY_SHA256) {
            Some(table) => {
                self.pins.refresh(table);
                true
            }
            None => false,
        }
    }

    pub fn is_host_pinned(&self, host: &str) -> bool {
        self.pins.current().contains_host(host)
    }

    /// Evaluator for chains already validated by the platform.
    pub fn trust_evaluator(&self) -> TrustEvaluator {
        TrustEvaluator::platform_validated(self.pin_store())
    }

    /// Pin check for a platform-validated DER chain, leaf first.
    pub fn evaluate_chain(&self, host: &str, chain: &[&[u8]]) -> Result<PinVerdict, PinningError> {
        self.trust_evaluator().evaluate(host, chain)
    }

    /// rustls verifier backed by this context's pin store.
    #[cfg(feature = "rustls-verifier")]
    pub fn pinning_verifier(&self) -> Result<crate::pinning::PinningVerifier, PinningError> {
        crate::pinning::PinningVerifier::new(self.pin_store())
    }

    // === Direct oracle operations ===

    /// Starts a background token fetch so the oracle's cache is warm.
    ///
    /// Returns `None` if the context is not initialized or the thread
    /// could not be spawned.
    pub fn prefetch(&self) -> Option<JoinHandle<()>> {
        if !self.is_initialized() {
            return None;
        }
        let oracle = Arc::clone(&self.oracle);
        let spawned = std::thread::Builder::new()
            .name("pinwarden-prefetch".into())
            .spawn(move || {
                let result = oracle.fetch_token(PREFETCH_URL);
                match result.status {
                    FetchStatus::Success | FetchStatus::UnknownUrl => {
                        tracing::info!(status = %result.status, "prefetch complete");
                    }
                    status => tracing::warn!(%status, "prefetch failed"),
                }
            });
        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "prefetch thread not started");
                None
            }
        }
    }

    /// Fetches a token for `url`.
    pub fn fetch_token(&self, url: &str) -> ServiceResult<String> {
        let result = self.oracle.fetch_token(url);
        tracing::info!(status = %result.status, "fetch token");
        match result.status {
            FetchStatus::Success => {
                self.refresh_pins();
                Ok(result.token)
            }
            status if status.is_network_failure() => Err(ServiceError::Networking(status.to_string())),
            status => Err(ServiceError::Permanent(status.to_string())),
        }
    }

    /// Looks up the secret for `key`, or defines it if `new_definition`
    /// is given. Unknown keys give `Ok(None)`.
    pub fn fetch_secure_string(&self, key: &str, new_definition: Option<&str>) -> ServiceResult<Option<String>> {
        let result = self.oracle.fetch_secret(key, new_definition);
        let kind = if new_definition.is_some() { "define" } else { "lookup" };
        tracing::info!(kind, status = %result.status, "fetch secure string");
        secret_result(result, kind)
    }

    /// Fetches a JWT with the given JSON claims, signed by the service.
    pub fn fetch_custom_jwt(&self, payload: &str) -> ServiceResult<String> {
        let result = self.oracle.fetch_custom_jwt(payload);
        tracing::info!(status = %result.status, "fetch custom JWT");
        match result.status {
            FetchStatus::Success => Ok(result.token),
            FetchStatus::BadPayload => Err(ServiceError::Permanent(
                "custom JWT: malformed JSON payload".into(),
            )),
            FetchStatus::Disabled => Err(ServiceError::Configuration(
                "custom JWT: feature disabled".into(),
            )),
            FetchStatus::Rejected => Err(ServiceError::Rejection {
                message: "custom JWT: rejected".into(),
                attestation_record: result.attestation_record,
                rejection_reasons: result.rejection_reasons,
            }),
            status if status.is_network_failure() => Err(ServiceError::Networking(format!(
                "custom JWT: {}",
                status
            ))),
            status => Err(ServiceError::Permanent(format!("custom JWT: {}", status))),
        }
    }

    /// Checks that the app passes attestation, without fetching a secret.
    pub fn precheck(&self) -> ServiceResult<()> {
        let result = self.oracle.fetch_secret(PRECHECK_KEY, None);
        tracing::info!(status = %result.status, "precheck");
        match result.status {
            FetchStatus::Success | FetchStatus::UnknownKey => Ok(()),
            FetchStatus::Rejected => Err(ServiceError::Rejection {
                message: "precheck: rejected".into(),
                attestation_record: result.attestation_record,
                rejection_reasons: result.rejection_reasons,
            }),
            status if status.is_network_failure() => Err(ServiceError::Networking(format!(
                "precheck: {}",
                status
            ))),
            status => Err(ServiceError::Permanent(format!("precheck: {}", status))),
        }
    }

    pub fn device_id(&self) -> Option<String> {
        self.oracle.device_id()
    }

    /// Binds the next token to the SHA-256 hash of `data`.
    pub fn set_data_hash_in_token(&self, data: &str) {
        self.oracle.set_data_hash(&binding_hash(data));
    }

    /// Signs `message` with the session key of the last token fetch.
    pub fn message_signature(&self, message: &str) -> Option<String> {
        self.oracle.message_signature(message)
    }
}

impl std::fmt::Debug for AttestationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttestationContext")
            .field("initialized", &self.is_initialized())
            .field("settings", &self.settings)
            .field("pins", &self.pins)
            .finish_non_exhaustive()
    }
}

fn secret_result(result: SecretFetchResult, kind: &str) -> ServiceResult<Option<String>> {
    match result.status {
        FetchStatus::Success => Ok(result.secret),
        FetchStatus::UnknownKey => Ok(None),
        FetchStatus::Disabled => Err(ServiceError::Configuration(format!(
            "{}: secure strings disabled",
            kind
        ))),
        FetchStatus::Rejected => Err(ServiceError::Rejection {
            message: format!("{}: rejected", kind),
            attestation_record: result.attestation_record,
            rejection_reasons: result.rejection_reasons,
        }),
        status if status.is_network_failure() => Err(ServiceError::Networking(format!(
            "{}: {}",
            kind, status
        ))),
        status => Err(ServiceError::Permanent(format!("{}: {}", kind, status))),
    }
}
