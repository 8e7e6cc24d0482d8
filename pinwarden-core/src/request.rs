// SPDX-FileCopyrightText: 2026 PinWarden Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Outgoing Request Model
//!
//! The subset of an HTTP request the pipeline reads and mutates: the
//! absolute URL and the header list. Header names compare
//! case-insensitively; insertion order is preserved. Header values may
//! carry tokens and secrets and are wiped when replaced or dropped.

use url::Url;
use zeroize::{Zeroize, Zeroizing};

use crate::error::ServiceError;

/// An outgoing HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    url: Url,
    headers: Vec<(String, String)>,
}

impl OutgoingRequest {
    pub fn new(url: Url) -> Self {
        OutgoingRequest {
            url,
            headers: Vec::new(),
        }
    }

    /// Parses `url` and creates a request without headers.
    pub fn parse(url: &str) -> Result<Self, ServiceError> {
        let url = Url::parse(url)
            .map_err(|e| ServiceError::Permanent(format!("invalid URL {}: {}", url, e)))?;
        Ok(Self::new(url))
    }

    /// Builder form of [`OutgoingRequest::set_header`].
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn set_url(&mut self, url: Url) {
        self.url = url;
    }

    /// Host component of the URL, or an empty string.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of header `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets header `name`, replacing every existing value.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(index) => {
                self.headers[index].1.zeroize();
                self.headers[index].1 = value;
                let mut i = index + 1;
                while i < self.headers.len() {
                    if self.headers[i].0.eq_ignore_ascii_case(&name) {
                        let (_, mut stale) = self.headers.remove(i);
                        stale.zeroize();
                    } else {
                        i += 1;
                    }
                }
            }
            None => self.headers.push((name, value)),
        }
    }

    /// Sets header `name` to a secret, taking the buffer without copying it.
    ///
    /// `value` is left empty.
    pub fn set_secret_header(&mut self, name: impl Into<String>, value: &mut Zeroizing<String>) {
        self.set_header(name, std::mem::take(&mut **value));
    }

    /// Adds a value for header `name`, keeping any existing values.
    pub fn append_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }
}

impl Drop for OutgoingRequest {
    fn drop(&mut self) {
        for (_, value) in &mut self.headers {
            value.zeroize();
        }
    }
}
