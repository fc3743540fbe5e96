use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Prefix of the environment variables read by [`Config::from_env`]
pub const ENV_PREFIX: &str = "CART";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl Config {
    /// Load configuration from `CART_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_prefix(ENV_PREFIX)
    }

    /// Load configuration from environment variables starting with `prefix`
    pub fn from_prefix(prefix: &str) -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let config = Config {
            api: load_section(prefix, "api")?,
            storage: load_section(prefix, "storage")?,
            observability: load_section(prefix, "observability")?,
        };

        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        storage_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = api_base_url {
            self.api.api_base_url = url;
        }
        if let Some(path) = storage_path {
            self.storage.storage_path = path;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.api_base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("API base URL must be an http(s) URL: '{}'", url),
            });
        }

        if self.api.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        if self.storage.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Storage path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn load_section<T: DeserializeOwned>(prefix: &str, section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix(prefix))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

// Default value functions
pub(crate) fn default_api_base_url() -> String {
    "http://localhost:3333".to_string()
}

pub(crate) fn default_timeout() -> u64 {
    10
}

pub(crate) fn default_storage_path() -> PathBuf {
    PathBuf::from(".rocketshoes").join("storage.json")
}

pub(crate) fn default_service_name() -> String {
    "rocketshoes-cart".to_string()
}

pub(crate) fn default_log_level() -> String {
    "warn".to_string()
}
