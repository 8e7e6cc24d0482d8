// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Certificate Fixtures
//!
//! Throwaway CA hierarchies generated with rcgen.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    ExtendedKeyUsagePurpose, IsCa, KeyPair, SignatureAlgorithm,
};
use ring::digest;

/// A generated certificate with its key.
pub struct Issued {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Issued {
    pub fn der(&self) -> &[u8] {
        self.cert.der().as_ref()
    }

    /// Expected pin: base64 SHA-256 of the key's DER SPKI.
    pub fn pin(&self) -> String {
        let hash = digest::digest(&digest::SHA256, &self.key.public_key_der());
        BASE64.encode(hash.as_ref())
    }
}

/// Root, intermediate and leaf for one host.
pub struct Chain {
    pub root: Issued,
    pub intermediate: Issued,
    pub leaf: Issued,
}

impl Chain {
    /// EC P-256 hierarchy with a leaf for `host`.
    pub fn new(host: &str) -> Self {
        Self::with_algorithm(host, &rcgen::PKCS_ECDSA_P256_SHA256)
    }

    pub fn with_algorithm(host: &str, alg: &'static SignatureAlgorithm) -> Self {
        let root_key = KeyPair::generate_for(alg).unwrap();
        let root_cert = ca_params("PinWarden Test Root")
            .self_signed(&root_key)
            .unwrap();
        let root = Issued {
            cert: root_cert,
            key: root_key,
        };

        let intermediate_key = KeyPair::generate_for(alg).unwrap();
        let intermediate_cert = ca_params("PinWarden Test Intermediate")
            .signed_by(&intermediate_key, &root.cert, &root.key)
            .unwrap();
        let intermediate = Issued {
            cert: intermediate_cert,
            key: intermediate_key,
        };

        let leaf_key = KeyPair::generate_for(alg).unwrap();
        let mut leaf_params = CertificateParams::new(vec![host.to_string()]).unwrap();
        leaf_params.distinguished_name = name(host);
        leaf_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
        let leaf_cert = leaf_params
            .signed_by(&leaf_key, &intermediate.cert, &intermediate.key)
            .unwrap();
        let leaf = Issued {
            cert: leaf_cert,
            key: leaf_key,
        };

        Chain {
            root,
            intermediate,
            leaf,
        }
    }

    /// Leaf and intermediate, as a server presents them.
    pub fn presented(&self) -> Vec<&[u8]> {
        vec![self.leaf.der(), self.intermediate.der()]
    }
}

fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.distinguished_name = name(common_name);
    params
}

fn name(common_name: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    dn
}
