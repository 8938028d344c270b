//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AcisConfig, AppConfig, AppSettings};
use crate::common::errors::{AcisError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. `ACIS_*` environment variables (api key, base url, timeout)
/// 2. Environment variables prefixed with `APP__` (nested with `__`)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| AcisError::Configuration(e.to_string()))?;

    let mut app: AppConfig = config
        .try_deserialize()
        .map_err(|e| AcisError::Configuration(e.to_string()))?;

    apply_acis_env(&mut app.acis)?;
    Ok(app)
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let mut acis = AcisConfig::default();
    apply_acis_env(&mut acis)?;

    Ok(AppConfig {
        acis,
        settings: AppSettings::default(),
    })
}

fn apply_acis_env(acis: &mut AcisConfig) -> Result<()> {
    if let Ok(key) = std::env::var("ACIS_API_KEY") {
        acis.api_key = Some(key);
    }
    if let Ok(url) = std::env::var("ACIS_BASE_URL") {
        acis.base_url = url;
    }
    if let Ok(timeout) = std::env::var("ACIS_TIMEOUT_SECONDS") {
        acis.timeout_seconds = timeout.trim().parse().map_err(|e| {
            AcisError::Configuration(format!("Invalid ACIS_TIMEOUT_SECONDS '{}': {}", timeout, e))
        })?;
    }
    if acis.timeout_seconds == 0 {
        return Err(AcisError::Configuration(
            "timeout_seconds must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
