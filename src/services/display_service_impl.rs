//! `SeaORM` implementation of the [`DisplayService`] trait.

use std::sync::Arc;

use crate::db::Store;
use crate::domain::{Direction, TitleId};
use crate::models::display::{DisplayEpisode, DisplaySync, DisplayTitle};
use crate::services::catalog_service::CatalogError;
use crate::services::display_service::DisplayService;

pub struct SeaOrmDisplayService {
    store: Arc<Store>,
}

impl SeaOrmDisplayService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl DisplayService for SeaOrmDisplayService {
    async fn upsert_display_title(
        &self,
        title_id: TitleId,
        sync: &DisplaySync,
    ) -> Result<DisplayTitle, CatalogError> {
        sync.validate().map_err(CatalogError::Validation)?;
        Ok(self.store.upsert_display_title(title_id, sync).await?)
    }

    async fn get_display_title(&self, title_id: TitleId) -> Result<DisplayTitle, CatalogError> {
        self.store
            .get_display_title(title_id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Display title {title_id}")))
    }

    async fn adjacent_episode(
        &self,
        title_id: TitleId,
        episode_number: i32,
        direction: Direction,
    ) -> Result<Option<DisplayEpisode>, CatalogError> {
        Ok(self
            .store
            .adjacent_display_episode(title_id, episode_number, direction)
            .await?)
    }

    async fn remove_display_title(&self, title_id: TitleId) -> Result<(), CatalogError> {
        self.store.remove_display_title(title_id).await?;
        Ok(())
    }

    async fn clear_display_mirror(&self) -> Result<u64, CatalogError> {
        Ok(self.store.clear_display_mirror().await?)
    }

    async fn rebuild_from_catalog(
        &self,
        title_id: TitleId,
    ) -> Result<DisplayTitle, CatalogError> {
        Ok(self.store.rebuild_display_title(title_id).await?)
    }
}
