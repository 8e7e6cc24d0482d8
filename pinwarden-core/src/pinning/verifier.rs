// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! rustls Integration
//!
//! [`PinningVerifier`] plugs the dynamic pin table into a rustls client:
//! WebPKI validation first, then the pin check over the leaf and every
//! intermediate.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme};

use super::evaluator::TrustEvaluator;
use super::store::PinStore;
use crate::error::PinningError;

/// Server certificate verifier enforcing the dynamic pins.
#[derive(Debug)]
pub struct PinningVerifier {
    inner: Arc<WebPkiServerVerifier>,
    evaluator: TrustEvaluator,
}

impl PinningVerifier {
    /// Verifier trusting the bundled Mozilla roots.
    pub fn new(pins: Arc<PinStore>) -> Result<Self, PinningError> {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        Self::with_roots(pins, roots)
    }

    /// Verifier trusting a custom root store.
    pub fn with_roots(pins: Arc<PinStore>, roots: RootCertStore) -> Result<Self, PinningError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let inner = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider)
            .build()
            .map_err(|e| PinningError::ChainInvalid(format!("failed to build verifier: {}", e)))?;

        Ok(PinningVerifier {
            inner,
            evaluator: TrustEvaluator::platform_validated(pins),
        })
    }

    /// Client config using this verifier and no client auth.
    pub fn into_client_config(self) -> Result<ClientConfig, PinningError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| PinningError::ChainInvalid(format!("failed to build TLS config: {}", e)))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(self))
            .with_no_client_auth();
        Ok(config)
    }
}

impl ServerCertVerifier for PinningVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        self.inner
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)?;

        let host = server_name.to_str();
        let chain: Vec<&[u8]> = std::iter::once(end_entity.as_ref())
            .chain(intermediates.iter().map(|c| c.as_ref()))
            .collect();

        self.evaluator
            .check_pins(&host, &chain)
            .map_err(|e| TlsError::General(e.to_string()))?;

        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}
