//! Shared application state

use std::sync::Arc;

use crate::config::Config;
use crate::db::{MemoryStore, PgStore, RecordStore};
use crate::reconcile::{ReconcileService, SyncSettings};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub service: ReconcileService,
    /// None disables storefront signature checks (development only)
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(service: ReconcileService, webhook_secret: Option<String>) -> Self {
        Self {
            service,
            webhook_secret,
        }
    }

    /// Connect the configured record store and build the service
    pub async fn from_config(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn RecordStore> = match &config.database_url {
            Some(url) => Arc::new(PgStore::connect(url, config.db_max_connections).await?),
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory record store");
                Arc::new(MemoryStore::new())
            }
        };

        if config.webhook_secret.is_none() {
            tracing::warn!("STOREFRONT_WEBHOOK_SECRET not set, storefront signatures are not checked");
        }

        Ok(Self::new(
            ReconcileService::new(store, SyncSettings::from(config)),
            config.webhook_secret.clone(),
        ))
    }
}
