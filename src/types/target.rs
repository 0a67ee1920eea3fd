//! Scan target descriptors.
//!
//! A [`Target`] is created once by the loader and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One scan unit: a URL plus optional metadata.
///
/// The URL is kept exactly as written in the target source; scheme
/// normalisation happens at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mock_response: Option<String>,
}

impl Target {
    /// Create a target, returning `None` if the URL is blank.
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        let url = url.trim();
        if url.is_empty() {
            return None;
        }

        Some(Self {
            url: url.to_string(),
            label: None,
            kind: None,
            mock_response: None,
        })
    }

    /// Attach a human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = non_empty(label.into());
        self
    }

    /// Attach a free-form kind tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = non_empty(kind.into());
        self
    }

    /// Attach a canned response body. Fetching such a target performs no
    /// network I/O. An empty body clears the mock so the target is fetched
    /// live.
    pub fn with_mock_response(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.mock_response = if body.is_empty() { None } else { Some(body) };
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn mock_response(&self) -> Option<&str> {
        self.mock_response.as_deref()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", self.url, label),
            None => write!(f, "{}", self.url),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
