//! `SeaORM` implementation of the [`CollectionService`] trait.

use std::sync::Arc;

use crate::db::Store;
use crate::domain::{Identity, TitleId};
use crate::models::collection::{CollectionEntryInput, CollectionEntryView};
use crate::services::catalog_service::CatalogError;
use crate::services::collection_service::CollectionService;

pub struct SeaOrmCollectionService {
    store: Arc<Store>,
}

impl SeaOrmCollectionService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl CollectionService for SeaOrmCollectionService {
    async fn upsert_entry(
        &self,
        identity: &Identity,
        input: &CollectionEntryInput,
    ) -> Result<CollectionEntryView, CatalogError> {
        input.validate().map_err(CatalogError::Validation)?;
        Ok(self
            .store
            .upsert_collection_entry(identity.user_id, input)
            .await?)
    }

    async fn list_entries(
        &self,
        identity: &Identity,
        status: Option<&str>,
    ) -> Result<Vec<CollectionEntryView>, CatalogError> {
        let status = status.map(str::trim).filter(|s| !s.is_empty());
        Ok(self
            .store
            .list_collection(identity.user_id, status)
            .await?)
    }

    async fn remove_entry(
        &self,
        identity: &Identity,
        title_id: TitleId,
    ) -> Result<(), CatalogError> {
        self.store
            .remove_collection_entry(identity.user_id, title_id)
            .await?;
        Ok(())
    }
}
