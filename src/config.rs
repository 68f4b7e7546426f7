//! Configuration Management Module
//!
//! Loads and validates configuration for the marketplace client: ledger
//! gateway connection, optional session identity, and submission timing.

use serde::{Deserialize, Serialize};
use url::Url;

/// Main configuration structure for the marketplace client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Ledger gateway connection
    pub api: ApiConfig,
    /// Session identity settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Delay after a submission before data is considered settled and
    /// reloadable, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

/// Connection settings for the ledger's REST gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the gateway (e.g., "http://127.0.0.1:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Session identity settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hex public key to start the session logged in as
    #[serde(default)]
    pub public_key: Option<String>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_settle_delay_ms() -> u64 {
    2_000
}

impl MarketplaceConfig {
    /// Loads configuration from the default location.
    ///
    /// The path is taken from the `MARKETPLACE_CONFIG_PATH` environment
    /// variable when set, falling back to `config/marketplace.toml`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MARKETPLACE_CONFIG_PATH")
            .unwrap_or_else(|_| "config/marketplace.toml".to_string());
        Self::load_from_path(&path)
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        if !std::path::Path::new(path).exists() {
            return Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/marketplace.template.toml config/marketplace.toml\n\
                Then edit config/marketplace.toml with your ledger URL.",
                path
            ));
        }
        let content = std::fs::read_to_string(path)?;
        let config: MarketplaceConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// The base URL must parse as an absolute http(s) URL and the request
    /// timeout must be nonzero.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.api.base_url).map_err(|err| {
            anyhow::anyhow!("Invalid api.base_url '{}': {}", self.api.base_url, err)
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "Invalid api.base_url '{}': expected an http(s) URL",
                self.api.base_url
            );
        }
        if self.api.timeout_ms == 0 {
            anyhow::bail!("api.timeout_ms must be nonzero");
        }
        Ok(())
    }

    /// The settle delay as a `Duration`, for use with `tokio::time::sleep`.
    pub fn settle_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.settle_delay_ms)
    }
}
