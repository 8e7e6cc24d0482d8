// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Public Key Fingerprints
//!
//! A pin is the base64 SHA-256 digest of a key's DER SubjectPublicKeyInfo.
//! The SPKI is rebuilt from the raw key bytes by prepending a fixed header
//! for each supported algorithm/size pair.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::digest;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

use crate::error::FingerprintError;

const RSA_2048_SPKI_HEADER: &[u8] = &[
    0x30, 0x82, 0x01, 0x22, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01,
    0x01, 0x05, 0x00, 0x03, 0x82, 0x01, 0x0f, 0x00,
];

const RSA_4096_SPKI_HEADER: &[u8] = &[
    0x30, 0x82, 0x02, 0x22, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01,
    0x01, 0x05, 0x00, 0x03, 0x82, 0x02, 0x0f, 0x00,
];

const EC_P256_SPKI_HEADER: &[u8] = &[
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08, 0x2a,
    0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00,
];

const EC_P384_SPKI_HEADER: &[u8] = &[
    0x30, 0x76, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05, 0x2b,
    0x81, 0x04, 0x00, 0x22, 0x03, 0x62, 0x00,
];

/// Public key algorithm family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Rsa,
    /// Elliptic curve over a prime field (secp256r1, secp384r1).
    Ec,
    /// Anything else, named by its algorithm OID.
    Other(String),
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Rsa => write!(f, "RSA"),
            KeyAlgorithm::Ec => write!(f, "EC"),
            KeyAlgorithm::Other(oid) => write!(f, "{}", oid),
        }
    }
}

/// Returns the DER SPKI header for an algorithm/size pair.
pub fn spki_header(algorithm: &KeyAlgorithm, bits: u32) -> Option<&'static [u8]> {
    match (algorithm, bits) {
        (KeyAlgorithm::Rsa, 2048) => Some(RSA_2048_SPKI_HEADER),
        (KeyAlgorithm::Rsa, 4096) => Some(RSA_4096_SPKI_HEADER),
        (KeyAlgorithm::Ec, 256) => Some(EC_P256_SPKI_HEADER),
        (KeyAlgorithm::Ec, 384) => Some(EC_P384_SPKI_HEADER),
        _ => None,
    }
}

/// Rebuilds the DER SubjectPublicKeyInfo for a raw public key.
///
/// `raw_key` is the key's external representation: the PKCS#1
/// RSAPublicKey for RSA, the uncompressed point for EC.
pub fn spki(algorithm: &KeyAlgorithm, bits: u32, raw_key: &[u8]) -> Result<Vec<u8>, FingerprintError> {
    let header = spki_header(algorithm, bits).ok_or_else(|| FingerprintError::UnsupportedKey {
        algorithm: algorithm.to_string(),
        bits,
    })?;
    let mut out = Vec::with_capacity(header.len() + raw_key.len());
    out.extend_from_slice(header);
    out.extend_from_slice(raw_key);
    Ok(out)
}

/// Base64 SHA-256 of DER SPKI bytes.
pub fn fingerprint(spki_der: &[u8]) -> String {
    let hash = digest::digest(&digest::SHA256, spki_der);
    BASE64.encode(hash.as_ref())
}

/// A public key as presented in a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    pub algorithm: KeyAlgorithm,
    pub bits: u32,
    pub raw: Vec<u8>,
}

impl PublicKeyInfo {
    pub fn new(algorithm: KeyAlgorithm, bits: u32, raw: Vec<u8>) -> Self {
        PublicKeyInfo {
            algorithm,
            bits,
            raw,
        }
    }

    /// Extracts the subject public key from a DER-encoded certificate.
    pub fn from_certificate_der(cert_der: &[u8]) -> Result<Self, FingerprintError> {
        let (_, cert) = X509Certificate::from_der(cert_der)
            .map_err(|e| FingerprintError::CertificateParse(e.to_string()))?;
        let spki = cert.public_key();
        let raw = spki.subject_public_key.data.to_vec();

        let (algorithm, bits) = match spki.parsed() {
            Ok(PublicKey::RSA(rsa)) => (KeyAlgorithm::Rsa, modulus_bits(rsa.modulus)),
            Ok(PublicKey::EC(point)) => (KeyAlgorithm::Ec, ec_point_bits(point.data())),
            _ => (KeyAlgorithm::Other(spki.algorithm.algorithm.to_id_string()), 0),
        };

        Ok(PublicKeyInfo::new(algorithm, bits, raw))
    }

    /// Rebuilt DER SPKI for this key.
    pub fn spki(&self) -> Result<Vec<u8>, FingerprintError> {
        spki(&self.algorithm, self.bits, &self.raw)
    }

    /// Base64 SHA-256 pin for this key.
    pub fn fingerprint(&self) -> Result<String, FingerprintError> {
        Ok(fingerprint(&self.spki()?))
    }
}

fn modulus_bits(modulus: &[u8]) -> u32 {
    let significant = modulus.iter().skip_while(|b| **b == 0).count();
    (significant * 8) as u32
}

// Uncompressed points are 0x04 || X || Y.
fn ec_point_bits(point: &[u8]) -> u32 {
    match point.len() {
        0 => 0,
        n => ((n - 1) / 2 * 8) as u32,
    }
}
