// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use proptest::prelude::*;

/// DNS host names.
pub fn host_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{3,10}", "[a-z]{2,4}").prop_map(|(domain, tld)| format!("api.{}.{}", domain, tld))
}

/// Base64-looking pin strings.
pub fn pin_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+/]{43}=".prop_map(String::from)
}

/// Uncompressed P-256 points.
pub fn p256_point_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 64).prop_map(|mut xy| {
        xy.insert(0, 0x04);
        xy
    })
}

/// Placeholder values that survive URL serialization unchanged.
pub fn placeholder_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,32}"
}
