use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{info, warn};

use super::display::DisplayRepository;
use super::episode::EpisodeRepository;
use crate::db::unit::{UnitError, UnitOfWork, UnitResult, is_unique_violation};
use crate::domain::{EpisodeWriteMode, TitleId};
use crate::entities::{
    collection_entries, display_episodes, episodes, prelude::*, titles,
};
use crate::models::display::{DisplaySync, DisplayTitle};
use crate::models::title::{Episode, EpisodeInput, TitleDetails, TitleInput, TitleSummary};

/// Caller-editable columns. Id, `posted_at` and `views` are left unset.
fn editable_columns(title: &TitleInput) -> titles::ActiveModel {
    titles::ActiveModel {
        name: Set(title.name.clone()),
        alt_name: Set(title.alt_name.clone()),
        seal: Set(title.seal.clone()),
        synopsis: Set(title.synopsis.clone()),
        rating: Set(title.rating.clone()),
        status: Set(title.status.clone()),
        seasons: Set(title.seasons),
        release_year: Set(title.release_year),
        ova_notes: Set(title.ova_notes.clone()),
        studio: Set(title.studio.clone()),
        director: Set(title.director.clone()),
        genres: Set(title.genres_json()),
        media_type: Set(title.media_type.clone()),
        ..Default::default()
    }
}

/// Reads `max(id) + 1`, or 1 on an empty catalog.
async fn next_id<C: ConnectionTrait>(db: &C) -> UnitResult<TitleId> {
    let max: Option<i32> = Titles::find()
        .select_only()
        .column_as(titles::Column::Id.max(), "max_id")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();

    let max = TitleId::new(max.unwrap_or(0));
    max.next()
        .ok_or_else(|| UnitError::IdSpaceExhausted(max.value()))
}

pub(crate) async fn load_details<C: ConnectionTrait>(
    db: &C,
    id: TitleId,
) -> Result<Option<TitleDetails>, DbErr> {
    let Some(title) = Titles::find_by_id(id.value()).one(db).await? else {
        return Ok(None);
    };

    let episodes = Episodes::find()
        .filter(episodes::Column::TitleId.eq(id.value()))
        .order_by_asc(episodes::Column::Season)
        .order_by_asc(episodes::Column::Number)
        .all(db)
        .await?;

    Ok(Some(TitleDetails {
        title: title.into(),
        episodes: episodes.into_iter().map(Episode::from).collect(),
    }))
}

/// Everything an update call may change on a title.
#[derive(Debug, Clone, Copy)]
pub struct TitleWrite<'a> {
    pub title: &'a TitleInput,
    pub new_id: Option<TitleId>,
    pub episodes: &'a [EpisodeInput],
    pub mode: EpisodeWriteMode,
}

pub struct TitleRepository {
    conn: DatabaseConnection,
}

impl TitleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a title and its episodes under a freshly assigned id.
    ///
    /// The primary key decides races: when a concurrent insert takes the
    /// candidate id, or the write lock is not granted in time, the unit is
    /// rolled back and the whole pipeline rerun, up to `max_attempts` times.
    pub async fn insert(
        &self,
        title: &TitleInput,
        episodes: &[EpisodeInput],
        max_attempts: u32,
    ) -> UnitResult<TitleId> {
        let mut attempt = 1;
        loop {
            let result = match UnitOfWork::begin(&self.conn, "insert_title").await {
                Ok(unit) => {
                    let outcome = Self::insert_in(&unit, title, episodes).await;
                    unit.finish(outcome).await
                }
                Err(e) => Err(e),
            };

            match result {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %e, "Title insert raced, retrying");
                    metrics::counter!("catalog_id_assign_retries_total").increment(1);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn insert_in(
        unit: &UnitOfWork,
        title: &TitleInput,
        episodes: &[EpisodeInput],
    ) -> UnitResult<TitleId> {
        let txn = unit.txn();
        let id = next_id(txn).await?;
        let now = Utc::now().to_rfc3339();

        let mut row = editable_columns(title);
        row.id = Set(id.value());
        row.posted_at = Set(now.clone());
        row.views = Set(0);

        Titles::insert(row)
            .exec_without_returning(txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    UnitError::IdCollision(id.value())
                } else {
                    e.into()
                }
            })?;

        EpisodeRepository::insert_all(unit, id.value(), episodes, &now).await?;

        info!(
            title_id = id.value(),
            episodes = episodes.len(),
            "Inserted title: {}",
            title.name
        );
        Ok(id)
    }

    pub async fn update(&self, original: TitleId, write: TitleWrite<'_>) -> UnitResult<TitleDetails> {
        let unit = UnitOfWork::begin(&self.conn, "update_title").await?;
        let outcome = Self::update_and_load(&unit, original, write).await;
        unit.finish(outcome).await
    }

    async fn update_and_load(
        unit: &UnitOfWork,
        original: TitleId,
        write: TitleWrite<'_>,
    ) -> UnitResult<TitleDetails> {
        let id = Self::update_in(unit, original, write).await?;
        load_details(unit.txn(), id)
            .await?
            .ok_or_else(|| UnitError::not_found(format!("Title {id}")))
    }

    /// Catalog update and mirror sync committed or rolled back together.
    pub async fn update_with_display(
        &self,
        original: TitleId,
        write: TitleWrite<'_>,
        display: &DisplaySync,
    ) -> UnitResult<(TitleDetails, DisplayTitle)> {
        let unit = UnitOfWork::begin(&self.conn, "update_title_with_display").await?;
        let outcome = Self::update_with_display_in(&unit, original, write, display).await;
        unit.finish(outcome).await
    }

    async fn update_with_display_in(
        unit: &UnitOfWork,
        original: TitleId,
        write: TitleWrite<'_>,
        display: &DisplaySync,
    ) -> UnitResult<(TitleDetails, DisplayTitle)> {
        let details = Self::update_and_load(unit, original, write).await?;
        let mirror = DisplayRepository::sync_in(unit, details.title.id, display).await?;
        Ok((details, mirror))
    }

    /// Rewrites the title matched by `original`, optionally moving it to a
    /// new id, then writes its episode set. Returns the id it ends up under.
    ///
    /// Rows keyed on the title id follow an id move through the cascading
    /// foreign keys within the same statement.
    pub(crate) async fn update_in(
        unit: &UnitOfWork,
        original: TitleId,
        write: TitleWrite<'_>,
    ) -> UnitResult<TitleId> {
        let mut row = editable_columns(write.title);
        if let Some(new_id) = write.new_id {
            row.id = Set(new_id.value());
        }

        let result = Titles::update_many()
            .set(row)
            .filter(titles::Column::Id.eq(original.value()))
            .exec(unit.txn())
            .await
            .map_err(|e| match write.new_id {
                Some(new_id) if is_unique_violation(&e) => UnitError::IdCollision(new_id.value()),
                _ => e.into(),
            })?;

        if result.rows_affected == 0 {
            return Err(UnitError::not_found(format!("Title {original}")));
        }

        let target = write.new_id.unwrap_or(original);
        let now = Utc::now().to_rfc3339();
        EpisodeRepository::write_set(unit, target.value(), write.episodes, write.mode, &now)
            .await?;

        if target == original {
            info!(title_id = target.value(), "Updated title");
        } else {
            info!(
                from = original.value(),
                to = target.value(),
                "Updated title and moved its id"
            );
        }
        Ok(target)
    }

    pub async fn get(&self, id: TitleId) -> Result<Option<TitleDetails>, DbErr> {
        load_details(&self.conn, id).await
    }

    pub async fn list(&self) -> Result<Vec<TitleSummary>, DbErr> {
        let rows = Titles::find()
            .order_by_asc(titles::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(TitleSummary::from).collect())
    }

    pub async fn delete(&self, id: TitleId) -> UnitResult<()> {
        let unit = UnitOfWork::begin(&self.conn, "delete_title").await?;
        let outcome = Self::delete_in(&unit, id).await;
        unit.finish(outcome).await
    }

    async fn delete_in(unit: &UnitOfWork, id: TitleId) -> UnitResult<()> {
        let txn = unit.txn();
        let title_id = id.value();

        DisplayEpisodes::delete_many()
            .filter(display_episodes::Column::TitleId.eq(title_id))
            .exec(txn)
            .await?;

        DisplayTitles::delete_by_id(title_id).exec(txn).await?;

        CollectionEntries::delete_many()
            .filter(collection_entries::Column::TitleId.eq(title_id))
            .exec(txn)
            .await?;

        Episodes::delete_many()
            .filter(episodes::Column::TitleId.eq(title_id))
            .exec(txn)
            .await?;

        let result = Titles::delete_by_id(title_id).exec(txn).await?;
        if result.rows_affected == 0 {
            return Err(UnitError::not_found(format!("Title {id}")));
        }

        info!(title_id, "Deleted title");
        Ok(())
    }

    /// Bumps the view counter and returns the new count.
    pub async fn record_view(&self, id: TitleId) -> UnitResult<i64> {
        let unit = UnitOfWork::begin(&self.conn, "record_view").await?;
        let outcome = Self::record_view_in(&unit, id).await;
        unit.finish(outcome).await
    }

    async fn record_view_in(unit: &UnitOfWork, id: TitleId) -> UnitResult<i64> {
        let result = Titles::update_many()
            .col_expr(
                titles::Column::Views,
                Expr::col(titles::Column::Views).add(1),
            )
            .filter(titles::Column::Id.eq(id.value()))
            .exec(unit.txn())
            .await?;

        if result.rows_affected == 0 {
            return Err(UnitError::not_found(format!("Title {id}")));
        }

        let title = Titles::find_by_id(id.value())
            .one(unit.txn())
            .await?
            .ok_or_else(|| UnitError::not_found(format!("Title {id}")))?;
        Ok(title.views)
    }
}
