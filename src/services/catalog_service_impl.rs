//! `SeaORM` implementation of the [`CatalogService`] trait.

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::db::{Store, TitleWrite};
use crate::domain::TitleId;
use crate::models::display::{DisplaySync, DisplayTitle};
use crate::models::title::{NewTitle, TitleDetails, TitleSummary, TitleUpdate, validate_title_write};
use crate::services::catalog_service::{CatalogError, CatalogService};

pub struct SeaOrmCatalogService {
    store: Arc<Store>,
    settings: CatalogConfig,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Arc<Store>, settings: CatalogConfig) -> Self {
        Self { store, settings }
    }

    fn write<'a>(&self, update: &'a TitleUpdate) -> TitleWrite<'a> {
        TitleWrite {
            title: &update.title,
            new_id: update.new_id,
            episodes: &update.episodes,
            mode: self.settings.episode_write_mode,
        }
    }
}

#[async_trait::async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn insert_title(&self, request: &NewTitle) -> Result<TitleId, CatalogError> {
        validate_title_write(&request.title, &request.episodes).map_err(CatalogError::Validation)?;

        let id = self
            .store
            .insert_title(
                &request.title,
                &request.episodes,
                self.settings.id_assign_retries,
            )
            .await?;
        Ok(id)
    }

    async fn update_title(
        &self,
        original: TitleId,
        update: &TitleUpdate,
    ) -> Result<TitleDetails, CatalogError> {
        update.validate().map_err(CatalogError::Validation)?;

        let details = self.store.update_title(original, self.write(update)).await?;
        Ok(details)
    }

    async fn update_title_with_display(
        &self,
        original: TitleId,
        update: &TitleUpdate,
        display: &DisplaySync,
    ) -> Result<(TitleDetails, DisplayTitle), CatalogError> {
        update.validate().map_err(CatalogError::Validation)?;
        display.validate().map_err(CatalogError::Validation)?;

        let result = self
            .store
            .update_title_with_display(original, self.write(update), display)
            .await?;
        Ok(result)
    }

    async fn get_title(&self, id: TitleId) -> Result<TitleDetails, CatalogError> {
        self.store
            .get_title(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Title {id}")))
    }

    async fn list_titles(&self) -> Result<Vec<TitleSummary>, CatalogError> {
        Ok(self.store.list_titles().await?)
    }

    async fn delete_title(&self, id: TitleId) -> Result<(), CatalogError> {
        self.store.delete_title(id).await?;
        Ok(())
    }

    async fn record_view(&self, id: TitleId) -> Result<i64, CatalogError> {
        Ok(self.store.record_view(id).await?)
    }
}
