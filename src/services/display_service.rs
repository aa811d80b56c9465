//! Domain service for the display mirror, the denormalized copy of
//! titles and episodes served to the player pages.

use crate::domain::{Direction, TitleId};
use crate::models::display::{DisplayEpisode, DisplaySync, DisplayTitle};
use crate::services::catalog_service::CatalogError;

#[async_trait::async_trait]
pub trait DisplayService: Send + Sync {
    /// Renames or creates the mirror entry and replaces its episodes, all or nothing.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for a blank name or an episode without a link
    /// - [`CatalogError::NotFound`] if the catalog has no such title
    /// - [`CatalogError::TransactionFailure`] if any insert fails
    async fn upsert_display_title(
        &self,
        title_id: TitleId,
        sync: &DisplaySync,
    ) -> Result<DisplayTitle, CatalogError>;

    async fn get_display_title(&self, title_id: TitleId) -> Result<DisplayTitle, CatalogError>;

    /// Nearest mirror episode strictly before or after `episode_number`.
    /// `None` at either end of the list.
    async fn adjacent_episode(
        &self,
        title_id: TitleId,
        episode_number: i32,
        direction: Direction,
    ) -> Result<Option<DisplayEpisode>, CatalogError>;

    async fn remove_display_title(&self, title_id: TitleId) -> Result<(), CatalogError>;

    /// Empties the whole mirror; returns the number of titles removed.
    async fn clear_display_mirror(&self) -> Result<u64, CatalogError>;

    /// Recomputes one mirror entry from the catalog's title and episodes.
    async fn rebuild_from_catalog(&self, title_id: TitleId)
    -> Result<DisplayTitle, CatalogError>;
}
