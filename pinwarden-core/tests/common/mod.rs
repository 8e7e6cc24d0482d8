// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared helpers, fixtures, and utilities used across test modules.

#![allow(dead_code)]

pub mod fixtures;
pub mod strategies;

use std::sync::Arc;

use pinwarden_core::{AttestationContext, MockOracle, OutgoingRequest};

/// Initialized context over a fresh mock oracle.
pub fn initialized_context() -> (Arc<MockOracle>, AttestationContext) {
    let oracle = Arc::new(MockOracle::new());
    let ctx = AttestationContext::new(oracle.clone());
    ctx.initialize("test-config").unwrap();
    (oracle, ctx)
}

pub fn request(url: &str) -> OutgoingRequest {
    OutgoingRequest::parse(url).unwrap()
}
