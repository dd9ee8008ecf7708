//! Layered desk configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! then `CLINIC_DESK__*` environment variables (e.g.
//! `CLINIC_DESK__API_BASE_URL`).

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::StockThresholds;

/// Default backend base URL (local development)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Default list page size
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for one desk instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeskConfig {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// Overall request timeout
    pub request_timeout_secs: u64,
    /// Connection establishment timeout
    pub connect_timeout_secs: u64,
    /// Rows per list page
    pub page_size: usize,
    /// Local store file; in-memory when absent
    #[serde(default)]
    pub store_path: Option<String>,
    /// Quantity at or below which an item shows as low stock
    pub low_stock_threshold: i64,
    /// Days before expiry at which an item shows as expiring
    pub expiring_within_days: i64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            page_size: DEFAULT_PAGE_SIZE,
            store_path: None,
            low_stock_threshold: 5,
            expiring_within_days: 30,
        }
    }
}

impl DeskConfig {
    /// Load configuration, optionally layering a TOML file over the defaults.
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs as i64)?
            .set_default("page_size", defaults.page_size as i64)?
            .set_default("low_stock_threshold", defaults.low_stock_threshold)?
            .set_default("expiring_within_days", defaults.expiring_within_days)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let loaded: DeskConfig = builder
            .add_source(
                Environment::with_prefix("CLINIC_DESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validated()
    }

    /// Normalize and check settings.
    pub fn validated(mut self) -> ConfigResult<Self> {
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();

        let parsed = url::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", self.api_base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "URL must use http or https scheme, got: {}",
                parsed.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn stock_thresholds(&self) -> StockThresholds {
        StockThresholds {
            low_stock: self.low_stock_threshold,
            expiring_within_days: self.expiring_within_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = DeskConfig::default().validated().unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = DeskConfig {
            api_base_url: "https://clinic.example.org/".into(),
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(config.api_base_url, "https://clinic.example.org");
    }

    #[test]
    fn test_rejects_bad_urls() {
        let bad_scheme = DeskConfig {
            api_base_url: "ftp://localhost:8080".into(),
            ..Default::default()
        };
        assert!(matches!(bad_scheme.validated(), Err(ConfigError::InvalidUrl(_))));

        let not_a_url = DeskConfig {
            api_base_url: "not-a-url".into(),
            ..Default::default()
        };
        assert!(not_a_url.validated().is_err());
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = DeskConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validated(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_base_url = \"https://desk.example.org\"").unwrap();
        writeln!(file, "page_size = 25").unwrap();

        let config = DeskConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api_base_url, "https://desk.example.org");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.low_stock_threshold, 5);
    }
}
