//! HTTP fetcher routed through the proxy client.
//!
//! One GET per target with a fixed browser user agent. Bodies are streamed
//! and cut at the configured cap so a hostile or oversized page cannot
//! exhaust memory.

use crate::proxy::ProxyClient;
use crate::scanner::traits::{FetchConfig, Fetcher};
use crate::types::{FetchOutcome, Target};
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Response};
use std::borrow::Cow;
use std::error::Error as StdError;
use tracing::debug;

/// Fetcher backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a fetcher around any client. Tests pass a direct client here.
    pub fn new(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Create a fetcher that uses the proxy-routed client.
    pub fn from_proxy(proxy: &ProxyClient, config: FetchConfig) -> Self {
        Self::new(proxy.client().clone(), config)
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> FetchOutcome {
        let captured_at = Utc::now();

        if let Some(body) = target.mock_response() {
            debug!("Using mock response for {}", target.url());
            return FetchOutcome::success(target, captured_at, 200, body);
        }

        let url = normalize_url(target.url());
        debug!("Requesting {}", url);

        let request = match self
            .client
            .get(url.as_ref())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .build()
        {
            Ok(request) => request,
            Err(e) => {
                return FetchOutcome::build_error(
                    target,
                    captured_at,
                    format!("Failed to create request: {}", error_chain(&e)),
                );
            }
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::request_failed(
                    target,
                    captured_at,
                    format!("Request failed: {}", error_chain(&e)),
                );
            }
        };

        let status = response.status().as_u16();
        let body = read_capped(response, self.config.max_body_bytes).await;
        if body.truncated {
            debug!(
                "Body of {} truncated at {} bytes",
                url, self.config.max_body_bytes
            );
        }

        match body.error {
            None => FetchOutcome::success(target, captured_at, status, body.bytes)
                .with_truncated(body.truncated),
            Some(e) => FetchOutcome::partial(
                target,
                captured_at,
                status,
                body.bytes,
                format!("Error reading response: {}", error_chain(&e)),
            ),
        }
    }
}

/// Prefix `http://` when the URL has no HTTP(S) scheme.
///
/// Bare onion hostnames are the common input. Note that this default means
/// a scheme-less target is always fetched in clear text (inside the Tor
/// circuit); write `https://` explicitly to require TLS.
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("http://{}", url))
    }
}

/// Body bytes read so far and how reading stopped.
struct CappedBody {
    bytes: Vec<u8>,
    truncated: bool,
    error: Option<reqwest::Error>,
}

async fn read_capped(response: Response, cap: usize) -> CappedBody {
    let mut body = CappedBody {
        bytes: Vec::new(),
        truncated: false,
        error: None,
    };

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                let room = cap - body.bytes.len();
                if chunk.len() > room {
                    body.bytes.extend_from_slice(&chunk[..room]);
                    body.truncated = true;
                    break;
                }
                body.bytes.extend_from_slice(&chunk);
            }
            Err(e) => {
                body.error = Some(e);
                break;
            }
        }
    }

    body
}

/// Render an error with its source chain, e.g.
/// `error sending request: connection refused`.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_http() {
        assert_eq!(normalize_url("example.onion"), "http://example.onion");
        assert_eq!(normalize_url("example.onion/a/b"), "http://example.onion/a/b");
    }

    #[test]
    fn test_normalize_keeps_existing_scheme() {
        assert!(matches!(normalize_url("http://x.onion"), Cow::Borrowed(_)));
        assert_eq!(normalize_url("https://x.onion"), "https://x.onion");
        assert_eq!(normalize_url("HTTPS://X.onion"), "HTTPS://X.onion");
    }

    #[test]
    fn test_normalize_does_not_treat_other_schemes_as_http() {
        assert_eq!(normalize_url("ftp://x.onion"), "http://ftp://x.onion");
    }

    #[tokio::test]
    async fn test_mock_response_short_circuits() {
        // No proxy is running; any network I/O would fail the outcome.
        let fetcher = HttpFetcher::new(Client::new(), FetchConfig::default());
        let target = Target::new("offline.onion")
            .unwrap()
            .with_mock_response("cached page");

        let outcome = fetcher.fetch(&target).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.body, b"cached page");
        assert_eq!(outcome.url, "offline.onion");
    }
}
