//! Configuration types for jepx-spot

use serde::Deserialize;
use std::net::SocketAddr;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    pub store: StoreConfig,
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Query API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

/// Upstream spot summary feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the CSV endpoint, the fiscal year file name is appended
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,

    /// Referer the upstream checks before serving the file
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Browser user agent sent with the request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_feed_base_url() -> String {
    "https://www.jepx.jp/js/csv_read.php".to_string()
}
fn default_referer() -> String {
    "https://www.jepx.jp/electricpower/market-data/spot/".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base_url(),
            referer: default_referer(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Firestore,
    Memory,
}

/// Document and object store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub bucket: String,

    /// Firestore REST root, override to target the emulator
    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    /// Cloud Storage JSON API root
    #[serde(default = "default_storage_url")]
    pub storage_url: String,

    /// OAuth bearer token; requests go out unauthenticated when absent
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}
fn default_storage_url() -> String {
    "https://storage.googleapis.com".to_string()
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormatConfig,
    /// Prometheus exporter port, disabled when absent
    pub metrics_port: Option<u16>,
}

/// Log line format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatConfig {
    #[default]
    Pretty,
    Json,
}

/// Ingestion schedule configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Offset of the market time zone from UTC, in hours
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_utc_offset_hours() -> i32 {
    9 // Asia/Tokyo, no DST
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text and apply environment overrides
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply the deployment environment variables on top of file values
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(project_id) = lookup("PROJECT_ID") {
            self.store.project_id = project_id;
        }
        if let Some(bucket) = lookup("STORAGE_BUCKET_NAME") {
            self.store.bucket = bucket;
        }
        if let Some(token) = lookup("GOOGLE_ACCESS_TOKEN") {
            self.store.access_token = Some(token);
        }
    }
}
