//! Viewer configuration.
//!
//! The environment surface is deliberately small: the base URL of the
//! annotation server (everything else — rows, media, push — derives from
//! it) and the poll period.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use relabel_core::RowId;

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "RELABEL_BASE_URL";

/// Configuration validation error
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Unsupported URL scheme {scheme}: expected http or https")]
    UnsupportedScheme { scheme: String },

    #[error("poll_interval_secs must be positive")]
    ZeroPollInterval,
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Base URL of the annotation server
    pub base_url: String,
    /// Poll period for the refresh scheduler, in seconds
    pub poll_interval_secs: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            poll_interval_secs: 2,
        }
    }
}

impl ViewerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults, with the base URL taken from `RELABEL_BASE_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.parse_base()?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::UnsupportedScheme {
                    scheme: other.to_string(),
                })
            }
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// `GET {base}/rows`
    pub fn rows_url(&self) -> Result<Url, ConfigError> {
        self.join("/rows")
    }

    /// `PUT {base}/rows/{id}`
    pub fn row_url(&self, id: RowId) -> Result<Url, ConfigError> {
        self.join(&format!("/rows/{id}"))
    }

    /// Static asset location for an audio file path.
    pub fn media_url(&self, audio_file_path: &str) -> Result<Url, ConfigError> {
        self.join(&format!("/static/{audio_file_path}"))
    }

    /// Push channel endpoint: the base URL with the scheme swapped to
    /// ws/wss and path `/ws`.
    pub fn ws_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.join("/ws")?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| ConfigError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
            })?;
        Ok(url)
    }

    fn parse_base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })
    }

    fn join(&self, path: &str) -> Result<Url, ConfigError> {
        let base = self.parse_base()?;
        base.join(path).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ViewerConfig::new("http://annotations.local:8000");
        assert_eq!(
            config.rows_url().unwrap().as_str(),
            "http://annotations.local:8000/rows"
        );
        assert_eq!(
            config.row_url(17).unwrap().as_str(),
            "http://annotations.local:8000/rows/17"
        );
        assert_eq!(
            config.media_url("clips/17.wav").unwrap().as_str(),
            "http://annotations.local:8000/static/clips/17.wav"
        );
    }

    #[test]
    fn test_ws_url_scheme_swap() {
        let config = ViewerConfig::new("http://localhost:8000");
        assert_eq!(config.ws_url().unwrap().as_str(), "ws://localhost:8000/ws");

        let config = ViewerConfig::new("https://annotations.example.com");
        assert_eq!(
            config.ws_url().unwrap().as_str(),
            "wss://annotations.example.com/ws"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ViewerConfig::new("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let config = ViewerConfig::new("ftp://example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = ViewerConfig {
            poll_interval_secs: 0,
            ..ViewerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroPollInterval)
        ));
    }
}
