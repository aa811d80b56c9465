//! Domain service for per-user collection entries.

use crate::domain::{Identity, TitleId};
use crate::models::collection::{CollectionEntryInput, CollectionEntryView};
use crate::services::catalog_service::CatalogError;

#[async_trait::async_trait]
pub trait CollectionService: Send + Sync {
    /// Creates or merges the caller's entry for a title.
    ///
    /// A repeated call never fails as a conflict: status, progress and notes
    /// are overwritten, `added_at` is kept, and `status_changed_at` only
    /// moves when the status actually changes.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for a blank status
    /// - [`CatalogError::NotFound`] if the title does not exist
    async fn upsert_entry(
        &self,
        identity: &Identity,
        input: &CollectionEntryInput,
    ) -> Result<CollectionEntryView, CatalogError>;

    async fn list_entries(
        &self,
        identity: &Identity,
        status: Option<&str>,
    ) -> Result<Vec<CollectionEntryView>, CatalogError>;

    async fn remove_entry(&self, identity: &Identity, title_id: TitleId)
    -> Result<(), CatalogError>;
}
