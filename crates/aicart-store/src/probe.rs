//! One-shot availability check performed at process start.

use crate::error::StoreError;
use crate::postgres::PostgresCredentialStore;
use aicart_core::DatabaseConfig;

/// Outcome of the startup probe. Decided once and never revisited.
pub enum StoreAvailability {
    Available(PostgresCredentialStore),
    Unavailable { reason: String },
}

impl StoreAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, StoreAvailability::Available(_))
    }
}

/// Try to connect to the configured store.
///
/// Failure is logged and reported as [`StoreAvailability::Unavailable`]
/// rather than returned as an error; the caller switches to degraded mode.
pub async fn probe_store(config: &DatabaseConfig) -> StoreAvailability {
    match PostgresCredentialStore::connect(config).await {
        Ok(store) => {
            tracing::info!("credential store reachable");
            StoreAvailability::Available(store)
        }
        Err(e) => {
            let reason = e.to_string();
            match e {
                StoreError::Migration(_) => {
                    tracing::error!(error = %reason, "credential store migration failed")
                }
                _ => tracing::warn!(error = %reason, "credential store unreachable"),
            }
            StoreAvailability::Unavailable { reason }
        }
    }
}
