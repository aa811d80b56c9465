use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::info;

use crate::db::unit::{UnitError, UnitOfWork, UnitResult};
use crate::domain::Direction;
use crate::entities::{display_episodes, display_titles, episodes, prelude::*};
use crate::models::display::{DisplayEpisode, DisplayEpisodeInput, DisplaySync, DisplayTitle};

fn new_row(title_id: i32, ep: &DisplayEpisodeInput) -> display_episodes::ActiveModel {
    display_episodes::ActiveModel {
        title_id: Set(title_id),
        season: Set(ep.season),
        episode_number: Set(ep.episode_number),
        description: Set(ep.description.clone()),
        link: Set(ep.link.clone()),
        extra_link1: Set(ep.extra_link1.clone()),
        extra_link2: Set(ep.extra_link2.clone()),
        extra_link3: Set(ep.extra_link3.clone()),
        ..Default::default()
    }
}

pub(crate) async fn load<C: ConnectionTrait>(
    db: &C,
    title_id: i32,
) -> Result<Option<DisplayTitle>, DbErr> {
    let Some(model) = DisplayTitles::find_by_id(title_id).one(db).await? else {
        return Ok(None);
    };

    let episodes = DisplayEpisodes::find()
        .filter(display_episodes::Column::TitleId.eq(title_id))
        .order_by_asc(display_episodes::Column::Season)
        .order_by_asc(display_episodes::Column::EpisodeNumber)
        .all(db)
        .await?;

    Ok(Some(DisplayTitle::from_parts(model, episodes)))
}

pub struct DisplayRepository {
    conn: DatabaseConnection,
}

impl DisplayRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn upsert(&self, title_id: i32, sync: &DisplaySync) -> UnitResult<DisplayTitle> {
        let unit = UnitOfWork::begin(&self.conn, "upsert_display_title").await?;
        let outcome = Self::sync_in(&unit, title_id, sync).await;
        unit.finish(outcome).await
    }

    /// Renames or creates the mirror entry, then replaces its episodes.
    pub(crate) async fn sync_in(
        unit: &UnitOfWork,
        title_id: i32,
        sync: &DisplaySync,
    ) -> UnitResult<DisplayTitle> {
        let txn = unit.txn();

        if Titles::find_by_id(title_id).one(txn).await?.is_none() {
            return Err(UnitError::not_found(format!("Title {title_id}")));
        }

        let now = Utc::now().to_rfc3339();
        let renamed = DisplayTitles::update_many()
            .col_expr(display_titles::Column::Name, Expr::value(sync.name.clone()))
            .col_expr(display_titles::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(display_titles::Column::TitleId.eq(title_id))
            .exec(txn)
            .await?;

        if renamed.rows_affected == 0 {
            DisplayTitles::insert(display_titles::ActiveModel {
                title_id: Set(title_id),
                name: Set(sync.name.clone()),
                updated_at: Set(now),
            })
            .exec_without_returning(txn)
            .await?;
        }

        DisplayEpisodes::delete_many()
            .filter(display_episodes::Column::TitleId.eq(title_id))
            .exec(txn)
            .await?;

        unit.fan_out(sync.episodes.iter().map(|ep| {
            DisplayEpisodes::insert(new_row(title_id, ep)).exec_without_returning(txn)
        }))
        .await?;

        info!(
            title_id,
            episodes = sync.episodes.len(),
            "Synced display mirror"
        );

        load(txn, title_id)
            .await?
            .ok_or_else(|| UnitError::not_found(format!("Display title {title_id}")))
    }

    pub async fn get(&self, title_id: i32) -> Result<Option<DisplayTitle>, DbErr> {
        load(&self.conn, title_id).await
    }

    /// Nearest mirror episode strictly before or after `episode_number`.
    pub async fn adjacent(
        &self,
        title_id: i32,
        episode_number: i32,
        direction: Direction,
    ) -> Result<Option<DisplayEpisode>, DbErr> {
        let query = DisplayEpisodes::find()
            .filter(display_episodes::Column::TitleId.eq(title_id));

        let query = match direction {
            Direction::Previous => query
                .filter(display_episodes::Column::EpisodeNumber.lt(episode_number))
                .order_by_desc(display_episodes::Column::EpisodeNumber)
                .order_by_desc(display_episodes::Column::Season),
            Direction::Next => query
                .filter(display_episodes::Column::EpisodeNumber.gt(episode_number))
                .order_by_asc(display_episodes::Column::EpisodeNumber)
                .order_by_asc(display_episodes::Column::Season),
        };

        Ok(query.one(&self.conn).await?.map(DisplayEpisode::from))
    }

    pub async fn remove(&self, title_id: i32) -> UnitResult<()> {
        let unit = UnitOfWork::begin(&self.conn, "remove_display_title").await?;
        let outcome = Self::remove_in(&unit, title_id).await;
        unit.finish(outcome).await
    }

    async fn remove_in(unit: &UnitOfWork, title_id: i32) -> UnitResult<()> {
        DisplayEpisodes::delete_many()
            .filter(display_episodes::Column::TitleId.eq(title_id))
            .exec(unit.txn())
            .await?;

        let result = DisplayTitles::delete_by_id(title_id)
            .exec(unit.txn())
            .await?;
        if result.rows_affected == 0 {
            return Err(UnitError::not_found(format!("Display title {title_id}")));
        }

        info!(title_id, "Removed display mirror entry");
        Ok(())
    }

    /// Empties the whole mirror. Returns the number of titles removed.
    pub async fn clear(&self) -> UnitResult<u64> {
        let unit = UnitOfWork::begin(&self.conn, "clear_display_mirror").await?;
        let outcome = Self::clear_in(&unit).await;
        unit.finish(outcome).await
    }

    async fn clear_in(unit: &UnitOfWork) -> UnitResult<u64> {
        DisplayEpisodes::delete_many().exec(unit.txn()).await?;
        let result = DisplayTitles::delete_many().exec(unit.txn()).await?;

        info!(titles = result.rows_affected, "Cleared display mirror");
        Ok(result.rows_affected)
    }

    pub async fn rebuild(&self, title_id: i32) -> UnitResult<DisplayTitle> {
        let unit = UnitOfWork::begin(&self.conn, "rebuild_display_title").await?;
        let outcome = Self::rebuild_in(&unit, title_id).await;
        unit.finish(outcome).await
    }

    async fn rebuild_in(unit: &UnitOfWork, title_id: i32) -> UnitResult<DisplayTitle> {
        let txn = unit.txn();

        let title = Titles::find_by_id(title_id)
            .one(txn)
            .await?
            .ok_or_else(|| UnitError::not_found(format!("Title {title_id}")))?;

        let episodes = Episodes::find()
            .filter(episodes::Column::TitleId.eq(title_id))
            .order_by_asc(episodes::Column::Season)
            .order_by_asc(episodes::Column::Number)
            .all(txn)
            .await?;

        let sync = DisplaySync::from_catalog(&title, &episodes);
        Self::sync_in(unit, title_id, &sync).await
    }
}
