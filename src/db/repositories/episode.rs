use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    Unchanged,
};
use tracing::info;

use crate::db::unit::{UnitOfWork, UnitResult};
use crate::domain::EpisodeWriteMode;
use crate::entities::{episodes, prelude::*};
use crate::models::title::{EpisodeInput, ReleasedEpisode};

/// Row-level changes that turn an existing episode set into the incoming one.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EpisodeDiff {
    /// `(existing row id, index into the incoming list)`
    pub update: Vec<(i32, usize)>,
    /// Indexes into the incoming list.
    pub insert: Vec<usize>,
    /// Existing row ids whose key is absent from the incoming list.
    pub delete: Vec<i32>,
}

/// Plans a diff write keyed on `(season, number)`.
///
/// `existing` holds `(id, season, number)` triples. A key repeated in
/// `incoming` is planned as an insert and left for the unique index to reject.
pub(crate) fn plan_diff(existing: &[(i32, i32, i32)], incoming: &[EpisodeInput]) -> EpisodeDiff {
    let mut by_key: HashMap<(i32, i32), i32> = existing
        .iter()
        .map(|&(id, season, number)| ((season, number), id))
        .collect();

    let mut diff = EpisodeDiff::default();
    for (idx, ep) in incoming.iter().enumerate() {
        match by_key.remove(&(ep.season, ep.number)) {
            Some(id) => diff.update.push((id, idx)),
            None => diff.insert.push(idx),
        }
    }

    diff.delete = by_key.into_values().collect();
    diff.delete.sort_unstable();
    diff
}

fn new_row(title_id: i32, ep: &EpisodeInput, released_at: &str) -> episodes::ActiveModel {
    episodes::ActiveModel {
        title_id: Set(title_id),
        season: Set(ep.season),
        number: Set(ep.number),
        name: Set(ep.name.clone()),
        link: Set(ep.link.clone()),
        cover_image: Set(ep.cover_image.clone()),
        alert: Set(ep.alert),
        released_at: Set(released_at.to_string()),
        ..Default::default()
    }
}

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Fans out one insert per episode, all stamped with `released_at`.
    pub(crate) async fn insert_all(
        unit: &UnitOfWork,
        title_id: i32,
        episodes: &[EpisodeInput],
        released_at: &str,
    ) -> UnitResult<()> {
        let txn = unit.txn();
        unit.fan_out(episodes.iter().map(|ep| {
            Episodes::insert(new_row(title_id, ep, released_at)).exec_without_returning(txn)
        }))
        .await?;
        Ok(())
    }

    /// Writes the full episode set of a title inside `unit`.
    pub(crate) async fn write_set(
        unit: &UnitOfWork,
        title_id: i32,
        episodes: &[EpisodeInput],
        mode: EpisodeWriteMode,
        released_at: &str,
    ) -> UnitResult<()> {
        match mode {
            EpisodeWriteMode::Replace => {
                Episodes::delete_many()
                    .filter(episodes::Column::TitleId.eq(title_id))
                    .exec(unit.txn())
                    .await?;
                Self::insert_all(unit, title_id, episodes, released_at).await
            }
            EpisodeWriteMode::Diff => Self::write_diff(unit, title_id, episodes, released_at).await,
        }
    }

    async fn write_diff(
        unit: &UnitOfWork,
        title_id: i32,
        episodes: &[EpisodeInput],
        released_at: &str,
    ) -> UnitResult<()> {
        let txn = unit.txn();

        let existing: Vec<(i32, i32, i32)> = Episodes::find()
            .filter(episodes::Column::TitleId.eq(title_id))
            .all(txn)
            .await?
            .into_iter()
            .map(|m| (m.id, m.season, m.number))
            .collect();

        let diff = plan_diff(&existing, episodes);

        if !diff.delete.is_empty() {
            Episodes::delete_many()
                .filter(episodes::Column::Id.is_in(diff.delete.clone()))
                .exec(txn)
                .await?;
        }

        unit.fan_out(diff.update.iter().map(|&(id, idx)| {
            let ep = &episodes[idx];
            Episodes::update(episodes::ActiveModel {
                id: Unchanged(id),
                name: Set(ep.name.clone()),
                link: Set(ep.link.clone()),
                cover_image: Set(ep.cover_image.clone()),
                alert: Set(ep.alert),
                ..Default::default()
            })
            .exec(txn)
        }))
        .await?;

        unit.fan_out(diff.insert.iter().map(|&idx| {
            Episodes::insert(new_row(title_id, &episodes[idx], released_at))
                .exec_without_returning(txn)
        }))
        .await?;

        info!(
            title_id,
            updated = diff.update.len(),
            inserted = diff.insert.len(),
            deleted = diff.delete.len(),
            "Applied episode diff"
        );
        Ok(())
    }

    /// Episodes flagged for alert or released on `day` (UTC), with their title name.
    pub async fn released_on(&self, day: NaiveDate) -> Result<Vec<ReleasedEpisode>, DbErr> {
        let prefix = day.format("%Y-%m-%d").to_string();

        let rows = Episodes::find()
            .filter(
                Condition::any()
                    .add(episodes::Column::Alert.eq(true))
                    .add(episodes::Column::ReleasedAt.starts_with(&prefix)),
            )
            .find_also_related(Titles)
            .order_by_asc(episodes::Column::TitleId)
            .order_by_asc(episodes::Column::Season)
            .order_by_asc(episodes::Column::Number)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(ep, title)| ReleasedEpisode {
                title_id: ep.title_id,
                title_name: title.map(|t| t.name).unwrap_or_default(),
                season: ep.season,
                number: ep.number,
                name: ep.name,
                link: ep.link,
                cover_image: ep.cover_image,
                alert: ep.alert,
                released_at: ep.released_at,
            })
            .collect())
    }

    /// Clears the alert flag on every season's episode `number` of a title.
    pub async fn clear_alert(&self, title_id: i32, number: i32) -> Result<u64, DbErr> {
        let result = Episodes::update_many()
            .col_expr(episodes::Column::Alert, Expr::value(false))
            .filter(episodes::Column::TitleId.eq(title_id))
            .filter(episodes::Column::Number.eq(number))
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!(
                title_id,
                number,
                rows = result.rows_affected,
                "Cleared episode alert"
            );
        }
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(season: i32, number: i32) -> EpisodeInput {
        EpisodeInput {
            season,
            number,
            name: format!("Episode {number}"),
            link: format!("https://cdn.example/{season}/{number}"),
            cover_image: None,
            alert: false,
        }
    }

    #[test]
    fn diff_matches_on_season_and_number() {
        let existing = [(10, 1, 1), (11, 1, 2), (12, 2, 1)];
        let incoming = [ep(1, 2), ep(2, 1), ep(2, 2)];

        let diff = plan_diff(&existing, &incoming);

        assert_eq!(diff.update, vec![(11, 0), (12, 1)]);
        assert_eq!(diff.insert, vec![2]);
        assert_eq!(diff.delete, vec![10]);
    }

    #[test]
    fn diff_against_empty_set_inserts_everything() {
        let diff = plan_diff(&[], &[ep(1, 1), ep(1, 2)]);
        assert!(diff.update.is_empty());
        assert_eq!(diff.insert, vec![0, 1]);
        assert!(diff.delete.is_empty());
    }

    #[test]
    fn empty_incoming_deletes_everything() {
        let diff = plan_diff(&[(3, 1, 1), (1, 1, 2)], &[]);
        assert_eq!(diff.delete, vec![1, 3]);
        assert!(diff.insert.is_empty());
    }

    #[test]
    fn repeated_key_is_planned_as_insert() {
        let diff = plan_diff(&[(5, 1, 1)], &[ep(1, 1), ep(1, 1)]);
        assert_eq!(diff.update, vec![(5, 0)]);
        assert_eq!(diff.insert, vec![1]);
    }
}
