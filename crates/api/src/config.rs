//! Application configuration loaded from environment variables.

use std::time::Duration;

use domain::StoreConfig;
use domain::config::{DEFAULT_MAX_ITEMS_PER_ORDER, DEFAULT_ORDER_NUMBER_MAX};

/// Origins allowed by CORS when `CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3001",
    "http://localhost:3000",
    "http://localhost:12345",
];

const DEFAULT_ARCHIVE_TIMEOUT_MS: u64 = 5000;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: Postgres archive; archival is disabled when unset
/// - `ARCHIVE_TIMEOUT_MS`: bound on one archive write (default: `5000`)
/// - `MAX_ITEMS_PER_ORDER`: item cap, `0` disables it (default: `255`)
/// - `ORDER_NUMBER_MAX`: last order number before wrapping (default: `999`)
/// - `CORS_ORIGINS`: comma-separated list of allowed origins
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub archive_timeout: Duration,
    pub max_items_per_order: Option<u32>,
    pub order_number_max: u32,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            archive_timeout: parsed("ARCHIVE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.archive_timeout),
            max_items_per_order: match parsed("MAX_ITEMS_PER_ORDER") {
                Some(0) => None,
                Some(cap) => Some(u32::try_from(cap).unwrap_or(u32::MAX)),
                None => defaults.max_items_per_order,
            },
            order_number_max: parsed("ORDER_NUMBER_MAX")
                .and_then(|max| u32::try_from(max).ok())
                .filter(|max| *max > 0)
                .unwrap_or(defaults.order_number_max),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Store settings derived from this configuration.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_items_per_order: self.max_items_per_order,
            order_number_max: self.order_number_max,
            ..StoreConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            archive_timeout: Duration::from_millis(DEFAULT_ARCHIVE_TIMEOUT_MS),
            max_items_per_order: Some(DEFAULT_MAX_ITEMS_PER_ORDER),
            order_number_max: DEFAULT_ORDER_NUMBER_MAX,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}
