//! Application configuration
//!
//! Configuration is loaded from `.tormgr.toml`. The file carries a default
//! `[api]` table plus optional per-environment overrides under `[env.<name>]`.
//! The active environment is selected with `TORMGR_ENV` (default `development`),
//! and `TORMGR_API_BASE_URL` wins over anything in the file.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080"
//!
//! [env.production.api]
//! base_url = "https://api.tormgr.io"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

pub const ENV_VAR: &str = "TORMGR_ENV";
pub const BASE_URL_VAR: &str = "TORMGR_API_BASE_URL";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Remote API settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix for every relative request URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Resolved application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Name of the selected environment
    pub environment: String,
    pub api: ApiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            api: ApiConfig::default(),
        }
    }
}

/// On-disk shape of the config file
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    api: Option<ApiConfig>,
    #[serde(default)]
    env: HashMap<String, EnvSection>,
}

#[derive(Debug, Deserialize, Default)]
struct EnvSection {
    #[serde(default)]
    api: Option<ApiConfig>,
}

impl AppConfig {
    /// Load config from `.env`, the config file and environment variables
    ///
    /// Falls back to defaults when no file is found or the file is invalid.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }

        let environment = env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
        let base_url_override = env::var(BASE_URL_VAR).ok();
        let content = crate::load_config_file();

        match Self::resolve(content.as_deref(), &environment, base_url_override) {
            Ok(config) => {
                log::info!(
                    "Loaded app config for environment '{}' (api: {})",
                    config.environment,
                    config.api.base_url
                );
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {:#}", e);
                Self {
                    environment,
                    ..Self::default()
                }
            }
        }
    }

    /// Resolve the config for `environment` from optional file content
    ///
    /// Precedence: override > `[env.<environment>.api]` > `[api]` > defaults.
    pub fn resolve(
        content: Option<&str>,
        environment: &str,
        base_url_override: Option<String>,
    ) -> Result<Self> {
        let mut file: ConfigFile = match content {
            Some(content) => toml::from_str(content).context("Invalid config file")?,
            None => ConfigFile::default(),
        };

        let api = file
            .env
            .remove(environment)
            .and_then(|section| section.api)
            .or(file.api)
            .unwrap_or_default();

        let mut config = Self {
            environment: environment.to_string(),
            api,
        };

        if let Some(base_url) = base_url_override {
            config.api.base_url = base_url;
        }
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();

        Ok(config)
    }
}
