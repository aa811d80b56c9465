//! Domain service for the canonical catalog: titles and their episodes.
//!
//! Every write validates its input before a unit of work is opened, so a
//! [`CatalogError::Validation`] never leaves anything to roll back.

use crate::db::UnitError;
use crate::domain::TitleId;
use crate::models::display::{DisplaySync, DisplayTitle};
use crate::models::title::{NewTitle, TitleDetails, TitleSummary, TitleUpdate};
use thiserror::Error;

/// Errors surfaced by the catalog, mirror, collection and alert services.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    /// A unit of work was rolled back; nothing it touched was kept.
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<UnitError> for CatalogError {
    fn from(err: UnitError) -> Self {
        match err {
            UnitError::NotFound(what) => Self::NotFound(what),
            other => Self::TransactionFailure(other.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for catalog operations.
///
/// # Examples
///
/// ```rust,ignore
/// use kuroneko::services::{CatalogError, CatalogService};
/// use kuroneko::domain::TitleId;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn CatalogService>) -> Result<(), CatalogError> {
///     let details = service.get_title(TitleId::new(1)).await?;
///     println!("{} has {} episodes", details.title.name, details.episodes.len());
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Inserts a title with its episodes under a newly assigned id.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for a blank name or malformed episode
    /// - [`CatalogError::TransactionFailure`] if any row fails; nothing is kept
    async fn insert_title(&self, request: &NewTitle) -> Result<TitleId, CatalogError>;

    /// Rewrites a title, optionally moving it to `update.new_id`, and
    /// replaces its episode set. Returns the stored result.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if `original` does not exist
    /// - [`CatalogError::TransactionFailure`] if any statement fails
    async fn update_title(
        &self,
        original: TitleId,
        update: &TitleUpdate,
    ) -> Result<TitleDetails, CatalogError>;

    /// [`CatalogService::update_title`] and a mirror sync in one unit.
    async fn update_title_with_display(
        &self,
        original: TitleId,
        update: &TitleUpdate,
        display: &DisplaySync,
    ) -> Result<(TitleDetails, DisplayTitle), CatalogError>;

    async fn get_title(&self, id: TitleId) -> Result<TitleDetails, CatalogError>;

    async fn list_titles(&self) -> Result<Vec<TitleSummary>, CatalogError>;

    /// Removes a title together with its episodes, mirror entry and
    /// collection entries.
    async fn delete_title(&self, id: TitleId) -> Result<(), CatalogError>;

    /// Increments the view counter; returns the new count.
    async fn record_view(&self, id: TitleId) -> Result<i64, CatalogError>;
}
