//! PinWarden Mobile Bindings
//!
//! UniFFI bindings for Android and iOS platforms.
//! Exposes a simplified, mobile-friendly API on top of pinwarden-core.
//!
//! The native HTTP stack calls `update_request` before sending and
//! `verify_certificate_chain` from its TLS trust callback.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use pinwarden_core::{AttestationContext, ServiceConfig};

// === Modules ===

mod cert_pinning;
mod error;
mod oracle;
mod types;

// Re-export public types
pub use cert_pinning::certificate_pin;
pub use error::MobileError;
pub use oracle::{PlatformAttestationOracle, PlatformOracle};
pub use types::{
    MobileDecision, MobileFailure, MobileFailureKind, MobileFetchStatus, MobileHeader,
    MobilePinCheck, MobileRequest, MobileSecretResult, MobileTokenResult,
};

uniffi::setup_scaffolding!();

// === Logging ===

static LOGGING: OnceCell<()> = OnceCell::new();

/// Route library logs to stderr (logcat / Xcode console).
///
/// `filter` uses `RUST_LOG` syntax, e.g. "pinwarden_core=debug".
/// Only the first successful call installs a subscriber.
#[uniffi::export]
pub fn enable_logging(filter: String) -> Result<(), MobileError> {
    LOGGING.get_or_try_init(|| {
        let filter = EnvFilter::try_new(&filter)
            .map_err(|e| MobileError::InvalidInput(format!("invalid log filter: {}", e)))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| MobileError::Configuration(e.to_string()))
    })?;
    Ok(())
}

// === Main Interface ===

/// Main PinWarden interface for mobile platforms.
#[derive(uniffi::Object)]
pub struct PinWardenMobile {
    ctx: AttestationContext,
}

impl PinWardenMobile {
    fn wrap(ctx: AttestationContext) -> Arc<Self> {
        Arc::new(PinWardenMobile { ctx })
    }
}

#[uniffi::export]
impl PinWardenMobile {
    /// Create an uninitialized instance around the platform SDK.
    #[uniffi::constructor]
    pub fn new(oracle: Box<dyn PlatformAttestationOracle>) -> Arc<Self> {
        let oracle = PlatformOracle::new(Arc::from(oracle));
        Self::wrap(AttestationContext::new(Arc::new(oracle)))
    }

    /// Create and initialize an instance from a JSON service config.
    #[uniffi::constructor]
    pub fn with_config(
        oracle: Box<dyn PlatformAttestationOracle>,
        config_json: String,
    ) -> Result<Arc<Self>, MobileError> {
        let config = ServiceConfig::from_json(&config_json)?;
        let oracle = PlatformOracle::new(Arc::from(oracle));
        let ctx = AttestationContext::with_config(Arc::new(oracle), &config)?;
        Ok(Self::wrap(ctx))
    }

    /// Initialize the SDK. Repeating the same config is a no-op.
    pub fn initialize(&self, config: String) -> Result<(), MobileError> {
        Ok(self.ctx.initialize(&config)?)
    }

    pub fn is_initialized(&self) -> bool {
        self.ctx.is_initialized()
    }

    // === Settings ===

    /// Send requests unprotected when the attestation service is unreachable.
    pub fn set_proceed_on_network_failure(&self, proceed: bool) {
        self.ctx.set_proceed_on_network_failure(proceed);
    }

    /// Bind tokens to the hash of this header's value. Empty disables.
    pub fn set_binding_header(&self, header: String) {
        self.ctx.set_binding_header(&header);
    }

    pub fn set_token_header(&self, header: String, prefix: String) {
        self.ctx.set_token_header(&header, &prefix);
    }

    // === Substitution and Exclusions ===

    pub fn add_substitution_header(&self, header: String, required_prefix: Option<String>) {
        self.ctx
            .add_substitution_header(&header, required_prefix.as_deref());
    }

    pub fn remove_substitution_header(&self, header: String) -> bool {
        self.ctx.remove_substitution_header(&header)
    }

    pub fn add_substitution_query_param(&self, name: String) {
        self.ctx.add_substitution_query_param(&name);
    }

    pub fn remove_substitution_query_param(&self, name: String) -> bool {
        self.ctx.remove_substitution_query_param(&name)
    }

    pub fn add_exclusion_url_regex(&self, pattern: String) -> Result<(), MobileError> {
        Ok(self.ctx.add_exclusion_pattern(&pattern)?)
    }

    pub fn remove_exclusion_url_regex(&self, pattern: String) -> bool {
        self.ctx.remove_exclusion_pattern(&pattern)
    }

    // === Requests ===

    /// Run a request through the pipeline. Blocking; call off the main thread.
    pub fn update_request(&self, request: MobileRequest) -> Result<MobileDecision, MobileError> {
        let request = request.to_request()?;
        Ok(self.ctx.update_request(&request).into())
    }

    // === Pinning ===

    /// Check a platform-validated certificate chain (DER, leaf first).
    pub fn verify_certificate_chain(&self, host: String, chain: Vec<Vec<u8>>) -> MobilePinCheck {
        cert_pinning::check_chain(&self.ctx, &host, &chain)
    }

    pub fn is_host_pinned(&self, host: String) -> bool {
        self.ctx.is_host_pinned(&host)
    }

    /// Reload pins from the SDK. Returns false if none are available yet.
    pub fn refresh_pins(&self) -> bool {
        self.ctx.refresh_pins()
    }

    /// Current pin table as JSON: `{"host": ["pin", ...]}`.
    pub fn pins_json(&self) -> Result<String, MobileError> {
        let table = self.ctx.pin_store().current();
        serde_json::to_string(table.as_ref()).map_err(|e| MobileError::Permanent(e.to_string()))
    }

    // === Direct Operations ===

    /// Warm the token cache in the background.
    pub fn prefetch(&self) {
        // Fire and forget
        let _ = self.ctx.prefetch();
    }

    pub fn fetch_token(&self, url: String) -> Result<String, MobileError> {
        Ok(self.ctx.fetch_token(&url)?)
    }

    pub fn fetch_secure_string(
        &self,
        key: String,
        new_definition: Option<String>,
    ) -> Result<Option<String>, MobileError> {
        Ok(self
            .ctx
            .fetch_secure_string(&key, new_definition.as_deref())?)
    }

    pub fn fetch_custom_jwt(&self, payload: String) -> Result<String, MobileError> {
        Ok(self.ctx.fetch_custom_jwt(&payload)?)
    }

    /// Check attestation passes without fetching a secret.
    pub fn precheck(&self) -> Result<(), MobileError> {
        Ok(self.ctx.precheck()?)
    }

    pub fn get_device_id(&self) -> Option<String> {
        self.ctx.device_id()
    }

    pub fn set_data_hash_in_token(&self, data: String) {
        self.ctx.set_data_hash_in_token(&data);
    }

    pub fn get_message_signature(&self, message: String) -> Option<String> {
        self.ctx.message_signature(&message)
    }
}
