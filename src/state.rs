use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AlertService, CatalogService, CollectionService, DisplayService, SeaOrmAlertService,
    SeaOrmCatalogService, SeaOrmCollectionService, SeaOrmDisplayService,
};

/// Everything the API handlers and CLI commands share: config, the store
/// and the domain services built on top of it.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub catalog: Arc<dyn CatalogService>,

    pub display: Arc<dyn DisplayService>,

    pub collection: Arc<dyn CollectionService>,

    pub alerts: Arc<dyn AlertService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let store_arc = Arc::new(store.clone());

        let catalog: Arc<dyn CatalogService> = Arc::new(SeaOrmCatalogService::new(
            store_arc.clone(),
            config.catalog.clone(),
        ));
        let display: Arc<dyn DisplayService> =
            Arc::new(SeaOrmDisplayService::new(store_arc.clone()));
        let collection: Arc<dyn CollectionService> =
            Arc::new(SeaOrmCollectionService::new(store_arc.clone()));
        let alerts: Arc<dyn AlertService> = Arc::new(SeaOrmAlertService::new(store_arc));

        Self {
            config: Arc::new(config),
            store,
            catalog,
            display,
            collection,
            alerts,
        }
    }
}
