// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! URL Exclusions
//!
//! Requests whose URL matches an exclusion pattern bypass the whole
//! pipeline. Exclusions on pinned domains leave those connections pinned
//! but without a path to refresh the pins, so they should be used sparingly.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;

use crate::error::{ServiceError, ServiceResult};

/// Compiled exclusion patterns keyed by their source text.
#[derive(Debug, Default)]
pub struct ExclusionSet {
    patterns: RwLock<Arc<HashMap<String, Regex>>>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles and registers `pattern`. A malformed pattern leaves the
    /// set unchanged.
    pub fn add(&self, pattern: &str) -> ServiceResult<()> {
        let regex = Regex::new(pattern).map_err(|e| ServiceError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut guard = self.patterns.write();
        let mut next: HashMap<String, Regex> = (**guard).clone();
        next.insert(pattern.to_string(), regex);
        *guard = Arc::new(next);
        tracing::debug!(pattern, "exclusion pattern added");
        Ok(())
    }

    /// Removes `pattern`, returning true if it was registered.
    pub fn remove(&self, pattern: &str) -> bool {
        let mut guard = self.patterns.write();
        if !guard.contains_key(pattern) {
            return false;
        }
        let mut next: HashMap<String, Regex> = (**guard).clone();
        next.remove(pattern);
        *guard = Arc::new(next);
        tracing::debug!(pattern, "exclusion pattern removed");
        true
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.read().contains_key(pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }

    /// Returns true if `url` matches any registered pattern.
    pub fn is_excluded(&self, url: &str) -> bool {
        let snapshot = self.patterns.read().clone();
        is_excluded(url, &snapshot)
    }
}

/// Returns true if `url` matches at least one pattern in `table`.
pub fn is_excluded(url: &str, table: &HashMap<String, Regex>) -> bool {
    table.values().any(|regex| regex.is_match(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_url_is_excluded() {
        let set = ExclusionSet::new();
        set.add(r"^https://cdn\.example\.com/").unwrap();

        assert!(set.is_excluded("https://cdn.example.com/logo.png"));
        assert!(!set.is_excluded("https://api.example.com/v1"));
    }

    #[test]
    fn test_empty_set_excludes_nothing() {
        assert!(!ExclusionSet::new().is_excluded("https://api.example.com/"));
    }

    #[test]
    fn test_invalid_pattern_rejected_and_set_unchanged() {
        let set = ExclusionSet::new();
        set.add("health$").unwrap();

        let err = set.add("(unclosed").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("health$"));
    }

    #[test]
    fn test_remove() {
        let set = ExclusionSet::new();
        set.add("/static/").unwrap();
        assert!(set.remove("/static/"));
        assert!(!set.remove("/static/"));
        assert!(!set.is_excluded("https://api.example.com/static/a.js"));
    }
}
