//! Application settings and paths.
//!
//! Settings come from built-in defaults, optionally overridden by a JSON
//! file: either `--config <PATH>` or `settings.json` in the XDG config
//! directory. The scan pipeline never reads settings itself; the CLI turns
//! them into explicit [`ProxyConfig`], [`FetchConfig`] and [`ScanOptions`]
//! values.

use crate::error::{ConfigError, ConfigResult};
use crate::proxy::{ProxyConfig, TOR_BROWSER_PORT, TOR_DAEMON_PORT};
use crate::scanner::{FetchConfig, ScanOptions, DEFAULT_USER_AGENT, MAX_BODY_BYTES};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/torscout)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Nothing is created on disk.
    pub fn discover() -> Option<Self> {
        let project = ProjectDirs::from("org", "torscout", "torscout")?;
        Some(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Address of the local SOCKS5 listener.
    pub proxy_host: IpAddr,
    /// Port probed first.
    pub primary_port: u16,
    /// Port probed when the primary does not answer.
    pub fallback_port: u16,
    /// Budget for each proxy probe, in milliseconds.
    pub probe_timeout_ms: u64,
    pub tls_handshake_timeout_secs: u64,
    pub response_header_timeout_secs: u64,
    /// Ceiling for a whole request, in seconds.
    pub request_timeout_secs: u64,
    /// Wait between fetches, in milliseconds.
    pub pacing_delay_ms: u64,
    /// Response bodies are cut at this many bytes.
    pub max_body_bytes: usize,
    pub user_agent: String,
    /// Default directory for report artifacts.
    pub output_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            proxy_host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            primary_port: TOR_BROWSER_PORT,
            fallback_port: TOR_DAEMON_PORT,
            probe_timeout_ms: 5000,
            tls_handshake_timeout_secs: 20,
            response_header_timeout_secs: 20,
            request_timeout_secs: 30,
            pacing_delay_ms: 1000,
            max_body_bytes: MAX_BODY_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AppSettings {
    /// Load settings, preferring an explicit file over the XDG one.
    ///
    /// A missing XDG file means defaults; a missing explicit file is an error.
    pub fn resolve(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Paths::discover().map(|paths| paths.settings_file()) {
            Some(file) if file.exists() => Self::load_from(&file),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!("Loaded settings from {}", path.display());
        Ok(serde_json::from_str(&content)?)
    }

    /// Reject combinations the pipeline cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.primary_port == 0 || self.fallback_port == 0 {
            return Err(ConfigError::Invalid("proxy ports must be non-zero".to_string()));
        }
        if self.primary_port == self.fallback_port {
            return Err(ConfigError::Invalid(format!(
                "primary and fallback proxy ports are both {}",
                self.primary_port
            )));
        }
        if !self.proxy_host.is_loopback() {
            return Err(ConfigError::Invalid(format!(
                "proxy host {} is not a loopback address",
                self.proxy_host
            )));
        }
        if self.probe_timeout_ms == 0
            || self.tls_handshake_timeout_secs == 0
            || self.response_header_timeout_secs == 0
            || self.request_timeout_secs == 0
        {
            return Err(ConfigError::Invalid("timeouts must be non-zero".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be non-zero".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            host: self.proxy_host,
            primary_port: self.primary_port,
            fallback_port: self.fallback_port,
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            tls_handshake_timeout: Duration::from_secs(self.tls_handshake_timeout_secs),
            response_header_timeout: Duration::from_secs(self.response_header_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .with_user_agent(self.user_agent.clone())
            .with_max_body_bytes(self.max_body_bytes)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::default().with_pacing_delay(Duration::from_millis(self.pacing_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.primary_port, 9150);
        assert_eq!(settings.fallback_port, 9050);
        assert_eq!(settings.pacing_delay_ms, 1000);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.proxy_config(), ProxyConfig::default());
        assert_eq!(settings.fetch_config(), FetchConfig::default());
        assert_eq!(settings.scan_options(), ScanOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"primary_port": 9250, "pacing_delay_ms": 0}}"#).unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.primary_port, 9250);
        assert_eq!(settings.fallback_port, 9050);
        assert_eq!(settings.scan_options().pacing_delay, Duration::ZERO);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppSettings::resolve(Some(&dir.path().join("nope.json")));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            AppSettings::load_from(file.path()),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let same_ports = AppSettings {
            fallback_port: 9150,
            ..AppSettings::default()
        };
        assert!(same_ports.validate().is_err());

        let remote = AppSettings {
            proxy_host: "10.0.0.5".parse().unwrap(),
            ..AppSettings::default()
        };
        assert!(remote.validate().is_err());

        let no_body = AppSettings {
            max_body_bytes: 0,
            ..AppSettings::default()
        };
        assert!(no_body.validate().is_err());
    }
}
