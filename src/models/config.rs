//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listings endpoint and HTTP behavior
    #[serde(default)]
    pub api: ApiConfig,

    /// Poll loop timing
    #[serde(default)]
    pub poll: PollConfig,

    /// Local snapshot file
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Remote table store
    #[serde(default)]
    pub store: StoreConfig,

    /// Remote log sink
    #[serde(default)]
    pub sink: SinkConfig,

    /// Local log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.endpoint)?;
        Url::parse(&self.sink.endpoint)?;

        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.api.limit == Some(0) {
            return Err(AppError::config("api.limit must be > 0 when set"));
        }
        if self.sink.timeout_secs == 0 {
            return Err(AppError::config("sink.timeout_secs must be > 0"));
        }
        if self.sink.tag.trim().is_empty() {
            return Err(AppError::config("sink.tag is empty"));
        }
        if self.snapshot.path.trim().is_empty() {
            return Err(AppError::config("snapshot.path is empty"));
        }
        if self.store.enabled {
            if self.store.table.trim().is_empty() {
                return Err(AppError::config("store.table is empty"));
            }
            if self.store.region.trim().is_empty() {
                return Err(AppError::config("store.region is empty"));
            }
        }
        Ok(())
    }
}

/// Listings endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listings URL
    #[serde(default = "defaults::api_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::api_timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Number of listings to request (server default when unset)
    #[serde(default)]
    pub limit: Option<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::api_endpoint(),
            timeout_secs: defaults::api_timeout(),
            user_agent: defaults::user_agent(),
            limit: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Sleep between cycles in seconds
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Snapshot file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "defaults::snapshot_path")]
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: defaults::snapshot_path(),
        }
    }
}

impl SnapshotConfig {
    /// Move a relative snapshot path under `dir`. Absolute paths are kept.
    pub fn root_under(&mut self, dir: impl AsRef<Path>) {
        let path = Path::new(&self.path);
        if path.is_relative() {
            self.path = dir.as_ref().join(path).to_string_lossy().into_owned();
        }
    }
}

/// Table store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Upsert records at all
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::region")]
    pub region: String,

    #[serde(default = "defaults::table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            region: defaults::region(),
            table: defaults::table(),
        }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Base URL; messages go to `{endpoint}/inputs/{token}/tag/{tag}/`
    #[serde(default = "defaults::sink_endpoint")]
    pub endpoint: String,

    #[serde(default = "defaults::sink_tag")]
    pub tag: String,

    #[serde(default = "defaults::sink_timeout")]
    pub timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::sink_endpoint(),
            tag: defaults::sink_tag(),
            timeout_secs: defaults::sink_timeout(),
        }
    }
}

impl SinkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Local logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // API defaults
    pub fn api_endpoint() -> String {
        "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest".into()
    }
    pub fn api_timeout() -> u64 {
        2
    }
    pub fn user_agent() -> String {
        concat!("coinpoll/", env!("CARGO_PKG_VERSION")).into()
    }

    // Poll defaults (6 hours)
    pub fn interval() -> u64 {
        21_600
    }

    // Snapshot defaults
    pub fn snapshot_path() -> String {
        "coinlist.json".into()
    }

    // Store defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn region() -> String {
        "us-east-1".into()
    }
    pub fn table() -> String {
        "mcruz-CoinMarketCap".into()
    }

    // Sink defaults
    pub fn sink_endpoint() -> String {
        "https://logs-01.loggly.com".into()
    }
    pub fn sink_tag() -> String {
        "CoinAPI".into()
    }
    pub fn sink_timeout() -> u64 {
        5
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
