use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_favourites_device_anime", "favourites", "device_id, anime_id"),
    ("idx_collections_device_anime", "collections", "device_id, anime_id"),
    ("idx_history_device_anime", "history", "device_id, anime_id"),
    ("idx_timecodes_device_episode", "timecodes", "device_id, episode_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (name, table, columns) in INDEXES {
            conn.execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {name} ON {table}({columns})"
            ))
            .await?;
        }

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_episode_sources_episode ON episode_sources(episode_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_episode_subtitles_episode ON episode_subtitles(episode_id)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for (name, _, _) in INDEXES {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_episode_sources_episode")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_episode_subtitles_episode")
            .await?;

        Ok(())
    }
}
