//! Fetcher trait abstraction.
//!
//! The orchestrator only knows this trait, which lets tests drive a scan
//! with scripted outcomes instead of a live proxy.

use crate::types::{FetchOutcome, Target};
use async_trait::async_trait;

/// Firefox ESR on Linux, the same string Tor Browser has shipped.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:91.0) Gecko/20100101 Firefox/91.0";

/// Largest response body kept per target (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Per-request settings for a [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
    /// Response bodies are cut at this many bytes.
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

impl FetchConfig {
    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the body cap.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Performs one bounded fetch per target.
///
/// Implementations never fail: every problem is reported through the
/// returned [`FetchOutcome`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a single target and classify the result.
    async fn fetch(&self, target: &Target) -> FetchOutcome;
}
