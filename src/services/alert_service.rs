//! Domain service for new-release alerts.

use chrono::NaiveDate;

use crate::domain::TitleId;
use crate::models::title::ReleasedEpisode;
use crate::services::catalog_service::CatalogError;

#[async_trait::async_trait]
pub trait AlertService: Send + Sync {
    /// Episodes flagged for alert or released today (UTC), ordered by
    /// title, season and number.
    async fn released_today(&self) -> Result<Vec<ReleasedEpisode>, CatalogError>;

    /// Same as [`AlertService::released_today`] for an explicit day.
    async fn released_on(&self, day: NaiveDate) -> Result<Vec<ReleasedEpisode>, CatalogError>;

    /// Clears the alert flag on episode `number` of a title in every season.
    /// Returns the number of rows changed; zero is not an error.
    async fn clear_alert(&self, title_id: TitleId, number: i32) -> Result<u64, CatalogError>;
}
