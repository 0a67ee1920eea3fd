//! Per-target fetch outcomes.

use super::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// How a single fetch attempt concluded.
///
/// Serialized with the short uppercase tags used by every report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// A response was received and its body read (possibly truncated at the cap).
    #[serde(rename = "SUCCESS")]
    Success,
    /// A response was received but reading the body failed partway.
    #[serde(rename = "PARTIAL")]
    PartialSuccess,
    /// Transport-level failure: refused, timed out, proxy error.
    #[serde(rename = "FAILED")]
    RequestFailed,
    /// The request could not be constructed (malformed URL).
    #[serde(rename = "ERROR")]
    RequestBuildError,
}

impl OutcomeKind {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Whether an HTTP response was obtained at all.
    pub fn has_response(self) -> bool {
        matches!(self, Self::Success | Self::PartialSuccess)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::PartialSuccess => write!(f, "PARTIAL"),
            Self::RequestFailed => write!(f, "FAILED"),
            Self::RequestBuildError => write!(f, "ERROR"),
        }
    }
}

/// The classified result of attempting one target.
///
/// Constructors enforce that `status_code` is 0 for outcomes without a
/// response and that `error` is present for every non-success outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// Target URL as written in the source.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub target_kind: Option<String>,
    #[serde(rename = "status")]
    pub kind: OutcomeKind,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "timestamp")]
    pub captured_at: DateTime<Utc>,
    /// Raw response bytes, at most the fetcher's body cap.
    #[serde(
        default,
        rename = "content",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_body",
        deserialize_with = "deserialize_body"
    )]
    pub body: Vec<u8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl FetchOutcome {
    fn base(target: &Target, kind: OutcomeKind, captured_at: DateTime<Utc>) -> Self {
        Self {
            url: target.url().to_string(),
            label: target.label().map(str::to_string),
            target_kind: target.kind().map(str::to_string),
            kind,
            status_code: 0,
            error: None,
            captured_at,
            body: Vec::new(),
            truncated: false,
        }
    }

    /// A response was obtained and fully read (up to the body cap).
    pub fn success(
        target: &Target,
        captured_at: DateTime<Utc>,
        status_code: u16,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let mut outcome = Self::base(target, OutcomeKind::Success, captured_at);
        outcome.status_code = status_code;
        outcome.body = body.into();
        outcome
    }

    /// A response was obtained but the body read failed.
    pub fn partial(
        target: &Target,
        captured_at: DateTime<Utc>,
        status_code: u16,
        body: impl Into<Vec<u8>>,
        error: impl Into<String>,
    ) -> Self {
        let mut outcome = Self::base(target, OutcomeKind::PartialSuccess, captured_at);
        outcome.status_code = status_code;
        outcome.body = body.into();
        outcome.error = Some(error.into());
        outcome
    }

    /// The request never produced a response.
    pub fn request_failed(
        target: &Target,
        captured_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        let mut outcome = Self::base(target, OutcomeKind::RequestFailed, captured_at);
        outcome.error = Some(error.into());
        outcome
    }

    /// The request could not be built.
    pub fn build_error(
        target: &Target,
        captured_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        let mut outcome = Self::base(target, OutcomeKind::RequestBuildError, captured_at);
        outcome.error = Some(error.into());
        outcome
    }

    /// Mark the body as cut at the size cap.
    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn is_success(&self) -> bool {
        self.kind.is_success()
    }

    /// Body length in bytes.
    pub fn content_size(&self) -> usize {
        self.body.len()
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Check the status-code and error-presence rules for this outcome.
    pub fn is_consistent(&self) -> bool {
        let status_ok = match self.kind {
            OutcomeKind::Success => self.status_code != 0,
            OutcomeKind::PartialSuccess => true,
            OutcomeKind::RequestFailed | OutcomeKind::RequestBuildError => self.status_code == 0,
        };
        let error_ok = self.kind.is_success() == self.error.is_none();
        status_ok && error_ok
    }
}

/// Bodies are stored as bytes but written to text reports as strings.
fn serialize_body<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}

fn deserialize_body<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    String::deserialize(deserializer).map(String::into_bytes)
}
