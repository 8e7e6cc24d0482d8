// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pin Table Storage
//!
//! The pin table is an immutable snapshot. Refreshing swaps the whole
//! snapshot under a write lock; readers clone the `Arc` and never observe a
//! partially installed table.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Host key whose pins apply to managed hosts with an empty pin set.
pub const WILDCARD_HOST: &str = "*";

/// Pin type requested from the oracle.
pub const PIN_TYPE_PUBLIC_KEY_SHA256: &str = "public-key-sha256";

/// Host to acceptable fingerprints (base64 SHA-256 of SPKI).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinTable {
    hosts: BTreeMap<String, BTreeSet<String>>,
}

/// Pins that apply to a host after wildcard resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePins<'a> {
    /// The host is not pinned; any chain that passes validation is trusted.
    Unpinned,
    /// At least one of these fingerprints must appear in the chain.
    Pinned(&'a BTreeSet<String>),
}

impl PinTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object of `host -> [fingerprint, ...]`.
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(json)
            .map_err(|e| ServiceError::Configuration(format!("invalid pin table: {}", e)))
    }

    /// Adds a host with the given pins, replacing any previous entry.
    pub fn insert<I, S>(&mut self, host: impl Into<String>, pins: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts
            .insert(host.into(), pins.into_iter().map(Into::into).collect());
    }

    /// Builder form of [`PinTable::insert`].
    pub fn with_host<I, S>(mut self, host: impl Into<String>, pins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(host, pins);
        self
    }

    /// Raw pins for a host, without wildcard resolution.
    pub fn get(&self, host: &str) -> Option<&BTreeSet<String>> {
        self.hosts.get(host)
    }

    /// Returns true if the host appears in the table.
    pub fn contains_host(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Resolves the pin set that applies to `host`.
    ///
    /// Absent hosts are unpinned. A host with an empty set inherits the
    /// wildcard set whenever the wildcard key is present, even if that set
    /// is itself empty; without a wildcard key it is unpinned too.
    pub fn active_pins(&self, host: &str) -> ActivePins<'_> {
        match self.hosts.get(host) {
            None => ActivePins::Unpinned,
            Some(pins) if !pins.is_empty() => ActivePins::Pinned(pins),
            Some(_) => match self.hosts.get(WILDCARD_HOST) {
                Some(wildcard) => ActivePins::Pinned(wildcard),
                None => ActivePins::Unpinned,
            },
        }
    }
}

/// Holds the latest pin table snapshot.
#[derive(Debug, Default)]
pub struct PinStore {
    current: RwLock<Arc<PinTable>>,
}

impl PinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: PinTable) -> Self {
        PinStore {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// Latest complete snapshot.
    pub fn current(&self) -> Arc<PinTable> {
        self.current.read().clone()
    }

    /// Installs a new table, replacing the previous one entirely.
    pub fn refresh(&self, table: PinTable) {
        let table = Arc::new(table);
        let hosts = table.len();
        *self.current.write() = table;
        tracing::debug!(hosts, "pin table refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_host_is_unpinned() {
        let table = PinTable::new().with_host("api.example.com", ["pinA"]);
        assert_eq!(table.active_pins("other.example.com"), ActivePins::Unpinned);
    }

    #[test]
    fn test_empty_set_without_wildcard_is_unpinned() {
        let table = PinTable::new().with_host("api.example.com", Vec::<String>::new());
        assert_eq!(table.active_pins("api.example.com"), ActivePins::Unpinned);
    }

    #[test]
    fn test_empty_set_inherits_wildcard() {
        let table = PinTable::new()
            .with_host("api.example.com", Vec::<String>::new())
            .with_host(WILDCARD_HOST, ["rootPin"]);
        match table.active_pins("api.example.com") {
            ActivePins::Pinned(pins) => assert!(pins.contains("rootPin")),
            ActivePins::Unpinned => panic!("expected wildcard pins"),
        }
        // Wildcard does not apply to hosts missing from the table
        assert_eq!(table.active_pins("unmanaged.example.com"), ActivePins::Unpinned);
    }

    #[test]
    fn test_empty_wildcard_still_pins_host() {
        let table = PinTable::new()
            .with_host("api.example.com", Vec::<String>::new())
            .with_host(WILDCARD_HOST, Vec::<String>::new());
        match table.active_pins("api.example.com") {
            ActivePins::Pinned(pins) => assert!(pins.is_empty()),
            ActivePins::Unpinned => panic!("empty wildcard must not unpin the host"),
        }
    }

    #[test]
    fn test_explicit_pins_win_over_wildcard() {
        let table = PinTable::new()
            .with_host("api.example.com", ["hostPin"])
            .with_host(WILDCARD_HOST, ["rootPin"]);
        match table.active_pins("api.example.com") {
            ActivePins::Pinned(pins) => {
                assert!(pins.contains("hostPin"));
                assert!(!pins.contains("rootPin"));
            }
            ActivePins::Unpinned => panic!("expected host pins"),
        }
    }

    #[test]
    fn test_from_json() {
        let table =
            PinTable::from_json(r#"{"api.example.com": ["a", "b"], "*": [], "cdn.example.com": []}"#)
                .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("api.example.com").unwrap().len(), 2);
        assert!(PinTable::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_refresh_replaces_without_merge() {
        let store = PinStore::with_table(PinTable::new().with_host("old.example.com", ["x"]));
        let before = store.current();

        store.refresh(PinTable::new().with_host("new.example.com", ["y"]));

        let after = store.current();
        assert!(!after.contains_host("old.example.com"));
        assert!(after.contains_host("new.example.com"));
        // Snapshots taken earlier are unaffected
        assert!(before.contains_host("old.example.com"));
    }
}
