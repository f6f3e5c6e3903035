//! Configuration types for the aicart access service.
//!
//! Configuration is read from a single YAML file (`aicart.yaml` by default)
//! and every field has a serde default, so an empty or missing file yields a
//! runnable development setup.
//!
//! ```yaml
//! server:
//!   bind: "0.0.0.0:4000"
//! database:
//!   database_url_env: DATABASE_URL
//!   pool:
//!     acquire_timeout_seconds: 5
//! token:
//!   private_key_env: AICART_TOKEN_KEY
//!   lifetime_days: 7
//! ```

pub mod database;
pub mod server;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use database::{ConnectionPoolConfig, DatabaseConfig};
pub use server::ServerConfig;
pub use token::{MAX_LIFETIME_DAYS, TokenConfig};

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "AICART_CONFIG";

/// Configuration file used when neither a path nor `AICART_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "aicart.yaml";

/// Complete aicart configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AicartConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Credential store connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session token signing.
    #[serde(default)]
    pub token: TokenConfig,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl AicartConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config path and load it.
    ///
    /// Precedence: explicit path, then `AICART_CONFIG`, then `aicart.yaml`.
    /// An explicit path must exist; the implicit default may be absent, in
    /// which case defaults are returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token.lifetime_days <= 0 {
            return Err(ConfigError::Invalid(
                "token.lifetime_days must be positive".to_string(),
            ));
        }
        if self.token.lifetime_days > token::MAX_LIFETIME_DAYS {
            return Err(ConfigError::Invalid(format!(
                "token.lifetime_days must be at most {}",
                token::MAX_LIFETIME_DAYS
            )));
        }
        if self.database.pool.query_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "database.pool.query_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
