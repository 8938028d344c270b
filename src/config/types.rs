//! Configuration types

use serde::{Deserialize, Serialize};

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://acis-trading.com/api/v1";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// ACIS API configuration
    #[serde(default)]
    pub acis: AcisConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// ACIS Trading API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AcisConfig {
    /// API key; required when the client is built
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
    /// Override for the User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for AcisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_seconds: default_request_timeout(),
            user_agent: None,
        }
    }
}

impl std::fmt::Debug for AcisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
