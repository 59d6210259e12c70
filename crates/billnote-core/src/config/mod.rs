//! Client configuration.
//!
//! Provides the `ClientConfig` used by the CLI and any other front end to
//! reach the note-generation backend and to place client-side downloads.
//! Values resolve in order: explicit overrides, environment, persisted
//! profile values, built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Seconds between two task status polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
/// Seconds before an HTTP request to the backend is abandoned.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_BASE_URL: &str = "BILLNOTE_API_BASE_URL";
pub const ENV_DOWNLOADS_DIR: &str = "BILLNOTE_DOWNLOADS_DIR";
pub const ENV_POLL_INTERVAL_SECS: &str = "BILLNOTE_POLL_INTERVAL_SECS";

/// Optional configuration values coming from one layer (flags, env, profile).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigLayer {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub downloads_dir: Option<String>,
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

impl ConfigLayer {
    /// Reads the layer from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the layer through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base_url: normalize_text_option(lookup(ENV_API_BASE_URL)),
            downloads_dir: normalize_text_option(lookup(ENV_DOWNLOADS_DIR)),
            poll_interval_secs: normalize_text_option(lookup(ENV_POLL_INTERVAL_SECS))
                .and_then(|raw| raw.parse::<u64>().ok())
                .filter(|secs| *secs > 0),
        }
    }

    /// Fills every missing value from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            api_base_url: normalize_text_option(self.api_base_url)
                .or_else(|| normalize_text_option(fallback.api_base_url)),
            downloads_dir: normalize_text_option(self.downloads_dir)
                .or_else(|| normalize_text_option(fallback.downloads_dir)),
            poll_interval_secs: self.poll_interval_secs.or(fallback.poll_interval_secs),
        }
    }
}

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without trailing slash, e.g. `http://localhost:8000/api`
    pub api_base_url: String,
    /// Directory that receives client-side downloads (export fallbacks)
    pub downloads_dir: PathBuf,
    /// Delay between task status polls
    pub poll_interval: Duration,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            downloads_dir: default_downloads_dir(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Builds a configuration from a merged layer, validating the base URL.
    pub fn from_layer(layer: ConfigLayer) -> Result<Self, String> {
        let defaults = Self::default();
        let api_base_url = match normalize_text_option(layer.api_base_url) {
            Some(url) => normalize_api_base_url(&url)?,
            None => defaults.api_base_url,
        };
        let downloads_dir = normalize_text_option(layer.downloads_dir)
            .map_or(defaults.downloads_dir, PathBuf::from);
        let poll_interval = layer
            .poll_interval_secs
            .filter(|secs| *secs > 0)
            .map_or(defaults.poll_interval, Duration::from_secs);

        Ok(Self {
            api_base_url,
            downloads_dir,
            poll_interval,
            http_timeout: defaults.http_timeout,
        })
    }
}

/// Trims the trailing slash and requires an http(s) scheme.
pub fn normalize_api_base_url(raw: &str) -> Result<String, String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err("API base URL must not be empty".to_string());
    }
    if !is_http_url(&base) {
        return Err("API base URL must include http:// or https://".to_string());
    }
    Ok(base)
}

/// The user's download directory, or the working directory when unknown.
pub fn default_downloads_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn layer_from_lookup_ignores_blank_and_invalid_values() {
        let env = HashMap::from([
            (ENV_API_BASE_URL, "  "),
            (ENV_DOWNLOADS_DIR, "/tmp/notes"),
            (ENV_POLL_INTERVAL_SECS, "soon"),
        ]);
        let layer = ConfigLayer::from_lookup(|key| env.get(key).map(ToString::to_string));

        assert_eq!(layer.api_base_url, None);
        assert_eq!(layer.downloads_dir.as_deref(), Some("/tmp/notes"));
        assert_eq!(layer.poll_interval_secs, None);
    }

    #[test]
    fn explicit_layer_wins_over_fallback() {
        let explicit = ConfigLayer {
            api_base_url: Some("http://10.0.0.2:8483/api/".to_string()),
            ..Default::default()
        };
        let fallback = ConfigLayer {
            api_base_url: Some("http://ignored".to_string()),
            downloads_dir: None,
            poll_interval_secs: Some(7),
        };

        let config = ClientConfig::from_layer(explicit.or(fallback)).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.2:8483/api");
        assert_eq!(config.poll_interval, Duration::from_secs(7));
    }

    #[test]
    fn from_layer_rejects_non_http_base_url() {
        let layer = ConfigLayer {
            api_base_url: Some("localhost:8000".to_string()),
            ..Default::default()
        };
        assert!(ClientConfig::from_layer(layer).is_err());
    }

    #[test]
    fn empty_layer_uses_defaults() {
        let config = ClientConfig::from_layer(ConfigLayer::default()).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(
            config.poll_interval,
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        );
    }
}
