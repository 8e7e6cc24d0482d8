//! Certificate pinning for platform TLS stacks.
//!
//! The platform runs its default chain evaluation first (URLSession trust
//! evaluation, Android's TrustManager) and then hands the DER chain here
//! for the pin check.

use pinwarden_core::{AttestationContext, PinVerdict, PublicKeyInfo};

use crate::error::MobileError;
use crate::types::MobilePinCheck;

/// Check a platform-validated chain (DER, leaf first) against the pins.
pub fn check_chain(ctx: &AttestationContext, host: &str, chain: &[Vec<u8>]) -> MobilePinCheck {
    let chain: Vec<&[u8]> = chain.iter().map(Vec::as_slice).collect();

    // Only pinned hosts reach the key scan, so a match or a rejection
    // both mean the host had an active pin set.
    match ctx.evaluate_chain(host, &chain) {
        Ok(PinVerdict::Unpinned) => MobilePinCheck {
            accepted: true,
            pinned: false,
            matched_pin: None,
            chain_index: None,
            error: String::new(),
        },
        Ok(PinVerdict::Matched { pin, chain_index }) => MobilePinCheck {
            accepted: true,
            pinned: true,
            matched_pin: Some(pin),
            chain_index: Some(chain_index as u32),
            error: String::new(),
        },
        Err(e) => {
            tracing::warn!(host, certificates = chain.len(), error = %e, "platform chain rejected");
            MobilePinCheck {
                accepted: false,
                pinned: true,
                matched_pin: None,
                chain_index: None,
                error: e.to_string(),
            }
        }
    }
}

/// Compute the pin (base64 SHA-256 of the SPKI) of a DER certificate.
///
/// Useful for building a pin configuration from a known server certificate.
#[uniffi::export]
pub fn certificate_pin(cert_der: Vec<u8>) -> Result<String, MobileError> {
    PublicKeyInfo::from_certificate_der(&cert_der)
        .and_then(|key| key.fingerprint())
        .map_err(|e| MobileError::Pinning(e.to_string()))
}
