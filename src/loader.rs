//! Target list loading.
//!
//! Two input shapes are auto-detected:
//!
//! 1. A YAML (or JSON) document with a top-level `targets` list:
//!
//!    ```yaml
//!    targets:
//!      - url: abcdef.onion
//!        name: Example forum
//!        type: forum
//!      - url: http://mocked.onion
//!        mock_response: "<html>offline copy</html>"
//!    ```
//!
//! 2. Anything else is read line by line: blank lines and `#` comments are
//!    skipped, every other trimmed line becomes a URL-only target.

use crate::error::{ScanError, ScanResult};
use crate::types::Target;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Which parsing stage produced the targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// YAML/JSON document with a `targets` list.
    Structured,
    /// One URL per line.
    Lines,
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Lines => write!(f, "line-oriented"),
        }
    }
}

/// Targets parsed from a source, tagged with the stage that accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTargets {
    pub format: TargetFormat,
    pub targets: Vec<Target>,
}

#[derive(Debug, Deserialize)]
struct TargetDocument {
    #[serde(default)]
    targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    #[serde(default)]
    url: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    mock_response: Option<String>,
}

impl TargetEntry {
    fn into_target(self) -> Option<Target> {
        let mut target = Target::new(self.url)?;
        if let Some(name) = self.name {
            target = target.with_label(name);
        }
        if let Some(kind) = self.kind {
            target = target.with_kind(kind);
        }
        if let Some(body) = self.mock_response {
            target = target.with_mock_response(body);
        }
        Some(target)
    }
}

/// Read and parse a target source file.
///
/// An empty result is not an error here; the caller decides whether a run
/// with zero targets makes sense.
pub fn load_targets(path: &Path) -> ScanResult<LoadedTargets> {
    let bytes = fs::read(path).map_err(|source| ScanError::TargetSource {
        path: path.to_path_buf(),
        source,
    })?;
    // Stray non-UTF-8 bytes (e.g. a Latin-1 comment) must not reject the file.
    let data = String::from_utf8_lossy(&bytes);

    let loaded = parse_targets(&data);
    info!(
        "Loaded {} targets from {} ({})",
        loaded.targets.len(),
        path.display(),
        loaded.format
    );
    Ok(loaded)
}

/// Parse target source text.
pub fn parse_targets(data: &str) -> LoadedTargets {
    if let Some(targets) = parse_structured(data) {
        return LoadedTargets {
            format: TargetFormat::Structured,
            targets,
        };
    }

    LoadedTargets {
        format: TargetFormat::Lines,
        targets: parse_lines(data),
    }
}

/// First stage: accept the document only if it parses and yields at least
/// one entry with a URL.
fn parse_structured(data: &str) -> Option<Vec<Target>> {
    let document: TargetDocument = match serde_yaml::from_str(data) {
        Ok(document) => document,
        Err(e) => {
            debug!("Not a structured target document: {}", e);
            return None;
        }
    };

    let targets: Vec<Target> = document
        .targets
        .into_iter()
        .filter_map(TargetEntry::into_target)
        .collect();

    if targets.is_empty() {
        None
    } else {
        Some(targets)
    }
}

fn parse_lines(data: &str) -> Vec<Target> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(Target::new)
        .collect()
}
