//! Configuration types for foliowatch

use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Portfolio backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the portfolio CRUD backend
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// User account to operate on
    #[serde(default = "default_user_id")]
    pub user_id: u64,
}

/// Price feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Finnhub API token
    #[serde(default)]
    pub api_key: String,

    /// Quote REST endpoint base URL
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// Streaming endpoint URL
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Symbols to track
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Pause between snapshot quote requests (rate-limit safety)
    #[serde(default = "default_snapshot_delay_ms")]
    pub snapshot_delay_ms: u64,

    /// Reconnection attempts before giving up
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// First reconnection delay; doubles per attempt
    #[serde(default = "default_initial_reconnect_delay_ms")]
    pub initial_reconnect_delay_ms: u64,

    /// Ceiling for the reconnection delay
    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,

    /// Keepalive ping interval on the stream
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_user_id() -> u64 {
    2
}
fn default_rest_url() -> String {
    "https://finnhub.io/api/v1".to_string()
}
fn default_ws_url() -> String {
    "wss://ws.finnhub.io".to_string()
}
fn default_symbols() -> Vec<String> {
    ["AAPL", "TSLA", "AMZN", "NVDA", "NFLX"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_snapshot_delay_ms() -> u64 {
    100
}
fn default_max_reconnect_attempts() -> u32 {
    5
}
fn default_initial_reconnect_delay_ms() -> u64 {
    1_000
}
fn default_max_reconnect_delay_ms() -> u64 {
    16_000
}
fn default_ping_interval_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            user_id: default_user_id(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            rest_url: default_rest_url(),
            ws_url: default_ws_url(),
            symbols: default_symbols(),
            snapshot_delay_ms: default_snapshot_delay_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            initial_reconnect_delay_ms: default_initial_reconnect_delay_ms(),
            max_reconnect_delay_ms: default_max_reconnect_delay_ms(),
            ping_interval_secs: default_ping_interval_secs(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
