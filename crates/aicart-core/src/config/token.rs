//! Session token signing configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest accepted session lifetime, in days.
pub const MAX_LIFETIME_DAYS: i64 = 3650;

/// Where the token signing secret comes from and how long tokens live.
///
/// The secret is a hex-encoded Ed25519 private key. Rotating it invalidates
/// every outstanding session token at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Environment variable containing the private key (hex-encoded).
    #[serde(default = "default_private_key_env")]
    pub private_key_env: Option<String>,

    /// Path to the private key file.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,

    /// Session lifetime in days.
    #[serde(default = "default_lifetime_days")]
    pub lifetime_days: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            private_key_env: default_private_key_env(),
            private_key_file: None,
            lifetime_days: default_lifetime_days(),
        }
    }
}

impl TokenConfig {
    /// Resolve the private key from environment or file.
    ///
    /// Returns `Ok(None)` when neither source is configured or present.
    pub fn resolve_private_key(&self) -> Result<Option<String>, std::io::Error> {
        if let Some(env_var) = &self.private_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.trim().is_empty()
        {
            return Ok(Some(key.trim().to_string()));
        }

        if let Some(path) = &self.private_key_file
            && path.exists()
        {
            let key = std::fs::read_to_string(path)?;
            return Ok(Some(key.trim().to_string()));
        }

        Ok(None)
    }
}

fn default_private_key_env() -> Option<String> {
    Some("AICART_TOKEN_KEY".to_string())
}

fn default_lifetime_days() -> i64 {
    7
}
