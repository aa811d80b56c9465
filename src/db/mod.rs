use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::{Direction, Identity, TitleId};
use crate::models::collection::{CollectionEntryInput, CollectionEntryView};
use crate::models::display::{DisplayEpisode, DisplaySync, DisplayTitle};
use crate::models::title::{EpisodeInput, ReleasedEpisode, TitleDetails, TitleInput, TitleSummary};

pub mod migrator;
pub mod repositories;
pub mod unit;

pub use repositories::title::TitleWrite;
pub use repositories::user::User;
pub use unit::{UnitError, UnitOfWork, UnitResult};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        let path_str = path_str.split('?').next().unwrap_or(path_str);
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false)
            .map_sqlx_sqlite_opts(|o| o.busy_timeout(Duration::from_secs(10)));

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn title_repo(&self) -> repositories::title::TitleRepository {
        repositories::title::TitleRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn display_repo(&self) -> repositories::display::DisplayRepository {
        repositories::display::DisplayRepository::new(self.conn.clone())
    }

    fn collection_repo(&self) -> repositories::collection::CollectionRepository {
        repositories::collection::CollectionRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Catalog ==========

    pub async fn insert_title(
        &self,
        title: &TitleInput,
        episodes: &[EpisodeInput],
        max_attempts: u32,
    ) -> UnitResult<TitleId> {
        self.title_repo().insert(title, episodes, max_attempts).await
    }

    pub async fn update_title(
        &self,
        original: TitleId,
        write: TitleWrite<'_>,
    ) -> UnitResult<TitleDetails> {
        self.title_repo().update(original, write).await
    }

    pub async fn update_title_with_display(
        &self,
        original: TitleId,
        write: TitleWrite<'_>,
        display: &DisplaySync,
    ) -> UnitResult<(TitleDetails, DisplayTitle)> {
        self.title_repo()
            .update_with_display(original, write, display)
            .await
    }

    pub async fn get_title(&self, id: TitleId) -> Result<Option<TitleDetails>, DbErr> {
        self.title_repo().get(id).await
    }

    pub async fn list_titles(&self) -> Result<Vec<TitleSummary>, DbErr> {
        self.title_repo().list().await
    }

    pub async fn delete_title(&self, id: TitleId) -> UnitResult<()> {
        self.title_repo().delete(id).await
    }

    pub async fn record_view(&self, id: TitleId) -> UnitResult<i64> {
        self.title_repo().record_view(id).await
    }

    // ========== Alerts ==========

    pub async fn released_on(&self, day: NaiveDate) -> Result<Vec<ReleasedEpisode>, DbErr> {
        self.episode_repo().released_on(day).await
    }

    pub async fn clear_alert(&self, title_id: TitleId, number: i32) -> Result<u64, DbErr> {
        self.episode_repo()
            .clear_alert(title_id.value(), number)
            .await
    }

    // ========== Display mirror ==========

    pub async fn upsert_display_title(
        &self,
        title_id: TitleId,
        sync: &DisplaySync,
    ) -> UnitResult<DisplayTitle> {
        self.display_repo().upsert(title_id.value(), sync).await
    }

    pub async fn get_display_title(&self, title_id: TitleId) -> Result<Option<DisplayTitle>, DbErr> {
        self.display_repo().get(title_id.value()).await
    }

    pub async fn adjacent_display_episode(
        &self,
        title_id: TitleId,
        episode_number: i32,
        direction: Direction,
    ) -> Result<Option<DisplayEpisode>, DbErr> {
        self.display_repo()
            .adjacent(title_id.value(), episode_number, direction)
            .await
    }

    pub async fn remove_display_title(&self, title_id: TitleId) -> UnitResult<()> {
        self.display_repo().remove(title_id.value()).await
    }

    pub async fn clear_display_mirror(&self) -> UnitResult<u64> {
        self.display_repo().clear().await
    }

    pub async fn rebuild_display_title(&self, title_id: TitleId) -> UnitResult<DisplayTitle> {
        self.display_repo().rebuild(title_id.value()).await
    }

    // ========== Collections ==========

    pub async fn upsert_collection_entry(
        &self,
        user_id: i32,
        input: &CollectionEntryInput,
    ) -> UnitResult<CollectionEntryView> {
        self.collection_repo().upsert(user_id, input).await
    }

    pub async fn list_collection(
        &self,
        user_id: i32,
        status: Option<&str>,
    ) -> Result<Vec<CollectionEntryView>, DbErr> {
        self.collection_repo().list(user_id, status).await
    }

    pub async fn remove_collection_entry(&self, user_id: i32, title_id: TitleId) -> UnitResult<()> {
        self.collection_repo()
            .remove(user_id, title_id.value())
            .await
    }

    // ========== Users ==========

    pub async fn identity_for_api_key(&self, api_key: &str) -> Result<Option<Identity>> {
        self.user_repo().identity_for_api_key(api_key).await
    }

    pub async fn create_user(&self, username: &str, is_admin: bool) -> Result<(User, String)> {
        self.user_repo().create(username, is_admin).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }
}
