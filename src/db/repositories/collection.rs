use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::db::unit::{UnitError, UnitOfWork, UnitResult};
use crate::entities::{collection_entries, prelude::*, titles};
use crate::models::collection::{CollectionEntry, CollectionEntryInput, CollectionEntryView};
use crate::models::title::TitleSummary;

/// Keeps the stored timestamp while the status is unchanged. SQLite
/// evaluates the right-hand side against the row as it was before the update.
const STATUS_CHANGED_AT_ON_CONFLICT: &str = r#"CASE WHEN "collection_entries"."status" = "excluded"."status" THEN "collection_entries"."status_changed_at" ELSE "excluded"."status_changed_at" END"#;

fn view(
    entry: collection_entries::Model,
    title: Option<titles::Model>,
) -> Option<CollectionEntryView> {
    Some(CollectionEntryView {
        entry: CollectionEntry::from(entry),
        title: TitleSummary::from(title?),
    })
}

pub struct CollectionRepository {
    conn: DatabaseConnection,
}

impl CollectionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn upsert(
        &self,
        user_id: i32,
        input: &CollectionEntryInput,
    ) -> UnitResult<CollectionEntryView> {
        let unit = UnitOfWork::begin(&self.conn, "upsert_collection_entry").await?;
        let outcome = Self::upsert_in(&unit, user_id, input).await;
        unit.finish(outcome).await
    }

    async fn upsert_in(
        unit: &UnitOfWork,
        user_id: i32,
        input: &CollectionEntryInput,
    ) -> UnitResult<CollectionEntryView> {
        let txn = unit.txn();

        if Titles::find_by_id(input.title_id).one(txn).await?.is_none() {
            return Err(UnitError::not_found(format!("Title {}", input.title_id)));
        }

        let now = Utc::now().to_rfc3339();
        let row = collection_entries::ActiveModel {
            user_id: Set(user_id),
            title_id: Set(input.title_id),
            status: Set(input.status.clone()),
            last_watched_episode: Set(input.last_watched_episode),
            notes: Set(input.notes.clone()),
            added_at: Set(now.clone()),
            status_changed_at: Set(now),
        };

        CollectionEntries::insert(row)
            .on_conflict(
                OnConflict::columns([
                    collection_entries::Column::UserId,
                    collection_entries::Column::TitleId,
                ])
                .update_columns([
                    collection_entries::Column::Status,
                    collection_entries::Column::LastWatchedEpisode,
                    collection_entries::Column::Notes,
                ])
                .value(
                    collection_entries::Column::StatusChangedAt,
                    Expr::cust(STATUS_CHANGED_AT_ON_CONFLICT),
                )
                .to_owned(),
            )
            .exec_without_returning(txn)
            .await?;

        let merged = CollectionEntries::find_by_id((user_id, input.title_id))
            .find_also_related(Titles)
            .one(txn)
            .await?
            .and_then(|(entry, title)| view(entry, title))
            .ok_or_else(|| UnitError::not_found(format!("Title {}", input.title_id)))?;

        info!(
            user_id,
            title_id = input.title_id,
            status = %merged.entry.status,
            "Upserted collection entry"
        );
        Ok(merged)
    }

    /// A user's entries, most recent status change first.
    pub async fn list(
        &self,
        user_id: i32,
        status: Option<&str>,
    ) -> Result<Vec<CollectionEntryView>, DbErr> {
        let mut query = CollectionEntries::find()
            .filter(collection_entries::Column::UserId.eq(user_id));

        if let Some(status) = status {
            query = query.filter(collection_entries::Column::Status.eq(status));
        }

        let rows = query
            .find_also_related(Titles)
            .order_by_desc(collection_entries::Column::StatusChangedAt)
            .order_by_asc(collection_entries::Column::TitleId)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, title)| view(entry, title))
            .collect())
    }

    pub async fn remove(&self, user_id: i32, title_id: i32) -> UnitResult<()> {
        let result = CollectionEntries::delete_by_id((user_id, title_id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(UnitError::not_found(format!(
                "Collection entry for title {title_id}"
            )));
        }

        info!(user_id, title_id, "Removed collection entry");
        Ok(())
    }
}
