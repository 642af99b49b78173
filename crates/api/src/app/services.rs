use std::sync::Arc;

use anyhow::Context;

use motorshop_infra::{AppConfig, InMemoryProductStore, ProductStore, SqliteProductStore, StoreKind};

/// Services shared by every request handler.
///
/// Built once at startup and injected into the router; handlers never reach
/// for process-wide state.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn ProductStore>,
    pub max_upload_bytes: usize,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>, max_upload_bytes: usize) -> Self {
        Self {
            store,
            max_upload_bytes,
        }
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn ProductStore> = match config.store {
        StoreKind::Memory => {
            tracing::warn!("MOTORSHOP_STORE=memory; products will not survive a restart");
            Arc::new(InMemoryProductStore::new())
        }
        StoreKind::Sqlite => Arc::new(
            SqliteProductStore::connect(&config.database_url)
                .await
                .with_context(|| format!("failed to open product store at {}", config.database_url))?,
        ),
    };

    tracing::info!(store = %config.store, "services ready");
    Ok(AppServices::new(store, config.max_upload_bytes))
}
