use crate::config::DatabaseConfig;
use crate::domain::{DeviceId, PageRequest, Paginated};
use crate::models::anime::SearchResult;
use crate::models::episode::Episode;
use crate::models::personal::{Change, Collection, Favourite, History, HistoryInput, Timecode};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    /// Opens `db_url` with default pool bounds. Used for local runs and tests.
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: db_url.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Self::with_pool_options(
            &config.url,
            config.max_connections,
            config.min_connections,
            Duration::from_secs(config.max_lifetime_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        max_lifetime: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if db_url.starts_with("sqlite:") && !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(connect_timeout)
            .acquire_timeout(connect_timeout)
            .sqlx_logging(false);

        // Every pooled connection to an in-memory database is its own database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(max_lifetime);
            (max_connections, min_connections)
        };
        opt.max_connections(max_connections)
            .min_connections(min_connections);

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

    fn search_repo(&self) -> repositories::search::SearchRepository {
        repositories::search::SearchRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn device_repo(&self) -> repositories::device::DeviceRepository {
        repositories::device::DeviceRepository::new(self.conn.clone())
    }

    fn favourite_repo(&self) -> repositories::favourite::FavouriteRepository {
        repositories::favourite::FavouriteRepository::new(self.conn.clone())
    }

    fn collection_repo(&self) -> repositories::collection::CollectionRepository {
        repositories::collection::CollectionRepository::new(self.conn.clone())
    }

    fn history_repo(&self) -> repositories::history::HistoryRepository {
        repositories::history::HistoryRepository::new(self.conn.clone())
    }

    fn timecode_repo(&self) -> repositories::timecode::TimecodeRepository {
        repositories::timecode::TimecodeRepository::new(self.conn.clone())
    }

    pub async fn insert_search_results(&self, results: &[SearchResult]) -> Result<u64> {
        self.search_repo().insert_missing(results).await
    }

    pub async fn get_search_result(&self, id: &str) -> Result<Option<SearchResult>> {
        self.search_repo().get(id).await
    }

    pub async fn get_episode(&self, id: &str) -> Result<Option<Episode>> {
        self.episode_repo().get(id).await
    }

    pub async fn insert_episode(&self, episode: &Episode) -> Result<bool> {
        self.episode_repo().insert(episode).await
    }

    pub async fn create_device(&self, device_id: &DeviceId) -> Result<()> {
        self.device_repo().create(device_id).await
    }

    pub async fn add_favourite(&self, device_id: &str, anime_id: &str) -> Result<Change> {
        self.favourite_repo().add(device_id, anime_id).await
    }

    pub async fn remove_favourite(&self, device_id: &str, anime_id: &str) -> Result<Change> {
        self.favourite_repo().remove(device_id, anime_id).await
    }

    pub async fn is_favourite(&self, device_id: &str, anime_id: &str) -> Result<bool> {
        self.favourite_repo().exists(device_id, anime_id).await
    }

    pub async fn list_favourites(
        &self,
        device_id: &str,
        page: PageRequest,
    ) -> Result<Paginated<Favourite>> {
        self.favourite_repo().list(device_id, page).await
    }

    pub async fn list_all_favourites(&self, device_id: &str) -> Result<Vec<Favourite>> {
        self.favourite_repo().list_all(device_id).await
    }

    pub async fn upsert_collection(
        &self,
        device_id: &str,
        anime_id: &str,
        kind: &str,
    ) -> Result<Option<String>> {
        self.collection_repo()
            .upsert(device_id, anime_id, kind)
            .await
    }

    pub async fn remove_collection(
        &self,
        device_id: &str,
        anime_id: &str,
        kind: &str,
    ) -> Result<Change> {
        self.collection_repo()
            .remove(device_id, anime_id, kind)
            .await
    }

    pub async fn list_collections(
        &self,
        device_id: &str,
        kind: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<Collection>> {
        self.collection_repo().list(device_id, kind, page).await
    }

    pub async fn list_all_collections(&self, device_id: &str) -> Result<Vec<Collection>> {
        self.collection_repo().list_all(device_id).await
    }

    pub async fn upsert_history(&self, device_id: &str, input: &HistoryInput) -> Result<()> {
        self.history_repo().upsert(device_id, input).await
    }

    pub async fn list_history(
        &self,
        device_id: &str,
        page: PageRequest,
    ) -> Result<Paginated<History>> {
        self.history_repo().list(device_id, page).await
    }

    pub async fn list_all_history(&self, device_id: &str) -> Result<Vec<History>> {
        self.history_repo().list_all(device_id).await
    }

    pub async fn upsert_timecode(&self, device_id: &str, timecode: &Timecode) -> Result<()> {
        self.timecode_repo().upsert(device_id, timecode).await
    }

    pub async fn get_timecode(
        &self,
        device_id: &str,
        episode_id: &str,
    ) -> Result<Option<Timecode>> {
        self.timecode_repo().get(device_id, episode_id).await
    }

    pub async fn list_timecodes(&self, device_id: &str) -> Result<Vec<Timecode>> {
        self.timecode_repo().list_all(device_id).await
    }

    pub async fn list_anime_timecodes(
        &self,
        device_id: &str,
        anime_id: &str,
    ) -> Result<Vec<Timecode>> {
        self.timecode_repo()
            .list_for_anime(device_id, anime_id)
            .await
    }
}
