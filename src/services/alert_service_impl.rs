//! `SeaORM` implementation of the [`AlertService`] trait.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::db::Store;
use crate::domain::TitleId;
use crate::models::title::ReleasedEpisode;
use crate::services::alert_service::AlertService;
use crate::services::catalog_service::CatalogError;

pub struct SeaOrmAlertService {
    store: Arc<Store>,
}

impl SeaOrmAlertService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl AlertService for SeaOrmAlertService {
    async fn released_today(&self) -> Result<Vec<ReleasedEpisode>, CatalogError> {
        self.released_on(Utc::now().date_naive()).await
    }

    async fn released_on(&self, day: NaiveDate) -> Result<Vec<ReleasedEpisode>, CatalogError> {
        Ok(self.store.released_on(day).await?)
    }

    async fn clear_alert(&self, title_id: TitleId, number: i32) -> Result<u64, CatalogError> {
        if number < 0 {
            return Err(CatalogError::Validation(format!(
                "Invalid episode number: {number}"
            )));
        }
        Ok(self.store.clear_alert(title_id, number).await?)
    }
}
