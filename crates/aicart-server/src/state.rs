//! Shared application state.

use aicart_access::AccessService;
use aicart_core::AicartConfig;
use aicart_store::{StoreAvailability, probe_store};
use aicart_token::TokenIssuer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    access: Arc<AccessService>,
}

impl AppState {
    pub fn new(access: AccessService) -> Self {
        Self {
            access: Arc::new(access),
        }
    }

    /// Build state from configuration, probing the credential store once.
    pub async fn init(cfg: &AicartConfig) -> anyhow::Result<Self> {
        let tokens = Arc::new(TokenIssuer::from_config(&cfg.token)?);

        let access = match probe_store(&cfg.database).await {
            StoreAvailability::Available(store) => AccessService::live(Arc::new(store), tokens),
            StoreAvailability::Unavailable { reason } => {
                tracing::warn!(
                    error = %reason,
                    "serving the degraded-mode directory until restart"
                );
                AccessService::degraded(tokens)
            }
        };
        tracing::info!(mode = %access.mode(), "access service ready");
        Ok(Self::new(access))
    }

    pub fn access(&self) -> &AccessService {
        &self.access
    }
}
