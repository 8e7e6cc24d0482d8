// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Secret Substitution Registry
//!
//! Header names and query-parameter names whose values are placeholders
//! for secrets held by the oracle. A header may require a value prefix
//! (such as `Bearer `); only the text after the prefix is the lookup key.
//!
//! Each table has its own lock. Readers take a snapshot copy so no lock is
//! held across oracle calls.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;

/// Registered headers and query parameters.
#[derive(Debug, Default)]
pub struct SubstitutionRegistry {
    headers: Mutex<BTreeMap<String, String>>,
    query_params: Mutex<BTreeSet<String>>,
}

impl SubstitutionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` for substitution. `None` means no prefix required.
    pub fn add_header(&self, name: &str, prefix: Option<&str>) {
        let prefix = prefix.unwrap_or_default().to_string();
        tracing::debug!(header = name, "substitution header added");
        self.headers.lock().insert(name.to_string(), prefix);
    }

    pub fn remove_header(&self, name: &str) -> bool {
        let removed = self.headers.lock().remove(name).is_some();
        if removed {
            tracing::debug!(header = name, "substitution header removed");
        }
        removed
    }

    pub fn add_query_param(&self, name: &str) {
        tracing::debug!(param = name, "substitution query parameter added");
        self.query_params.lock().insert(name.to_string());
    }

    pub fn remove_query_param(&self, name: &str) -> bool {
        let removed = self.query_params.lock().remove(name);
        if removed {
            tracing::debug!(param = name, "substitution query parameter removed");
        }
        removed
    }

    /// Snapshot of header name to required prefix.
    pub fn headers(&self) -> BTreeMap<String, String> {
        self.headers.lock().clone()
    }

    /// Snapshot of query parameter names.
    pub fn query_params(&self) -> BTreeSet<String> {
        self.query_params.lock().clone()
    }
}
