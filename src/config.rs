use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PRICE_URL: &str = "http://doc-x.net/hex/all_prices.txt";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// File the game client rewrites with each API message
    pub api_data: PathBuf,
    /// Price feed location, a file path or an http(s) URL
    #[serde(default = "default_prices")]
    pub prices: String,
    /// Collection cache read at startup and rewritten after reconciliation
    pub collection_cache: PathBuf,
    /// Timeout for fetching the price feed over HTTP
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_prices() -> String {
    DEFAULT_PRICE_URL.to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// How often the API data file is checked for new messages
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Quiet period after the last Collection event before the cache is rewritten
    #[serde(default = "default_write_delay")]
    pub collection_write_delay_secs: u64,
}

fn default_poll_interval() -> u64 {
    200
}

fn default_write_delay() -> u64 {
    10
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            collection_write_delay_secs: default_write_delay(),
        }
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn collection_write_delay(&self) -> Duration {
        Duration::from_secs(self.collection_write_delay_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rolling log files (console only when unset)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("sources.api_data", "api.data")?
            .set_default("sources.collection_cache", "collection.cache")?
            .set_default("sources.prices", DEFAULT_PRICE_URL)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("watch.poll_interval_ms", 200)?
            .set_default("watch.collection_write_delay_secs", 10)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("HEXGUIDE_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (HEXGUIDE__SOURCES__API_DATA, etc.)
            .add_source(
                Environment::with_prefix("HEXGUIDE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.sources.api_data.as_os_str().is_empty() {
            errors.push("sources.api_data must not be empty".to_string());
        }

        if self.sources.collection_cache.as_os_str().is_empty() {
            errors.push("sources.collection_cache must not be empty".to_string());
        }

        if self.sources.prices.trim().is_empty() {
            errors.push("sources.prices must not be empty".to_string());
        }

        if self.watch.poll_interval_ms == 0 {
            errors.push("watch.poll_interval_ms must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_from_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(dir.path()).unwrap();

        assert_eq!(cfg.sources.api_data, PathBuf::from("api.data"));
        assert_eq!(cfg.sources.prices, DEFAULT_PRICE_URL);
        assert_eq!(cfg.watch.poll_interval(), Duration::from_millis(200));
        assert_eq!(cfg.watch.collection_write_delay(), Duration::from_secs(10));
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_load_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
[sources]
api_data = "/tmp/hex/api.data"
prices = "prices.txt"
collection_cache = "/tmp/hex/collection.cache"

[watch]
collection_write_delay_secs = 3
"#,
        )
        .unwrap();

        let cfg = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(cfg.sources.api_data, PathBuf::from("/tmp/hex/api.data"));
        assert_eq!(cfg.sources.prices, "prices.txt");
        assert_eq!(cfg.watch.collection_write_delay_secs, 3);
        assert_eq!(cfg.watch.poll_interval_ms, 200);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let cfg = AppConfig {
            sources: SourcesConfig {
                api_data: PathBuf::new(),
                prices: " ".to_string(),
                collection_cache: PathBuf::from("collection.cache"),
                fetch_timeout_secs: 30,
            },
            watch: WatchConfig {
                poll_interval_ms: 0,
                collection_write_delay_secs: 10,
            },
            logging: LoggingConfig::default(),
        };

        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
