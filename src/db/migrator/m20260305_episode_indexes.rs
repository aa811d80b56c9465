use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per (title, season, number); a repeated key fails the whole write.
        manager
            .create_index(
                Index::create()
                    .name("idx_episodes_natural_key")
                    .table(Episodes::Table)
                    .col(Episodes::TitleId)
                    .col(Episodes::Season)
                    .col(Episodes::Number)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_episodes_released_at")
                    .table(Episodes::Table)
                    .col(Episodes::ReleasedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_display_episodes_number")
                    .table(DisplayEpisodes::Table)
                    .col(DisplayEpisodes::TitleId)
                    .col(DisplayEpisodes::EpisodeNumber)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_display_episodes_number",
            "idx_episodes_released_at",
            "idx_episodes_natural_key",
        ] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Episodes {
    Table,
    TitleId,
    Season,
    Number,
    ReleasedAt,
}

#[derive(DeriveIden)]
enum DisplayEpisodes {
    Table,
    TitleId,
    EpisodeNumber,
}
