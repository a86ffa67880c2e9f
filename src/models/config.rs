//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// API client settings
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.as_ref().display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Config load failed from {:?}: {}. Using defaults.",
                    path.as_ref(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.crawler.validate()?;
        let api_base = self.client.api_base.trim();
        if api_base.is_empty() {
            return Err(AppError::validation("client.api_base is empty"));
        }
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(AppError::validation(format!(
                "client.api_base must start with http:// or https://, got: {api_base}"
            )));
        }
        if self.client.archive_base.trim().is_empty() {
            return Err(AppError::validation("client.archive_base is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pause between sequential requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl CrawlerConfig {
    /// Validate the settings the archiver uses.
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Settings for the typed API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the live REST API (e.g. `https://evan.ugent.be/api/v1/`)
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Where archived documents are served from in archive mode
    #[serde(default = "defaults::archive_base")]
    pub archive_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            archive_base: defaults::archive_base(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        concat!("evan-archive/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        0
    }

    // Client defaults
    pub fn api_base() -> String {
        "https://evan.ugent.be/api/v1/".into()
    }
    pub fn archive_base() -> String {
        "/data/".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_api_base() {
        let mut config = Config::default();
        config.client.api_base = "ftp://example.com/api/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn crawler_validation_ignores_client_section() {
        let mut config = Config::default();
        config.client.api_base = String::new();
        config.client.archive_base = String::new();
        assert!(config.validate().is_err());
        assert!(config.crawler.validate().is_ok());

        config.crawler.timeout_secs = 0;
        assert!(config.crawler.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            timeout_secs = 5

            [client]
            archive_base = "/srv/snapshot/"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.timeout_secs, 5);
        assert_eq!(config.crawler.request_delay_ms, 0);
        assert_eq!(config.client.api_base, "https://evan.ugent.be/api/v1/");
        assert_eq!(config.client.archive_base, "/srv/snapshot/");
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path().join("missing.toml"));
        assert_eq!(config.client.archive_base, "/data/");
    }

    #[test]
    fn load_or_default_reads_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("archive.toml");
        fs::write(&path, "[crawler]\nrequest_delay_ms = 250\n").unwrap();

        let config = Config::load_or_default(&path);
        assert_eq!(config.crawler.request_delay_ms, 250);
    }
}
