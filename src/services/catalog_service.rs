//! Domain service for catalog reads across both providers.
//!
//! Every read goes through the cache layer first. Lists are persisted into
//! the relational `search` table on a miss, and every list request emits a
//! search analytics event.

use crate::clients::UpstreamError;
use crate::models::anime::{Anime, Genre, SearchPage, SearchResult};
use crate::models::episode::{Episode, EpisodeOverrides};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Looks up a previously listed search result by its id.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no list ever returned this id
    /// - Returns [`CatalogError::Database`] on connection failures
    async fn search_by_id(&self, id: &str) -> Result<SearchResult, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Anilibria fails.
    async fn anilibria_search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Anilibria fails.
    async fn anilibria_recommended(
        &self,
        limit: u32,
        page: u32,
    ) -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Anilibria fails.
    async fn anilibria_latest(&self, limit: u32) -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Anilibria fails.
    async fn anilibria_random(&self, limit: u32) -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Anilibria fails.
    async fn anilibria_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Anilibria fails.
    async fn anilibria_genre_releases(
        &self,
        genre_id: i64,
        limit: u32,
        page: u32,
    ) -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Anilibria fails.
    async fn anilibria_anime(&self, id: &str) -> Result<Anime, CatalogError>;

    /// Returns the stored episode when present, otherwise fetches and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if the episode is not stored and
    /// Anilibria fails.
    async fn anilibria_episode(&self, id: &str) -> Result<Episode, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Consumet fails.
    async fn consumet_search(&self, query: &str, page: u32) -> Result<SearchPage, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Consumet fails.
    async fn consumet_recommended(&self) -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Consumet fails.
    async fn consumet_latest(&self) -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Consumet fails.
    async fn consumet_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Consumet fails.
    async fn consumet_genre_releases(&self, genre: &str)
    -> Result<Vec<SearchResult>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Consumet fails.
    async fn consumet_anime(&self, id: &str) -> Result<Anime, CatalogError>;

    /// Fetches a watch payload; caller overrides replace the provider's
    /// title and ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Upstream`] if Consumet fails.
    async fn consumet_episode(
        &self,
        id: &str,
        overrides: EpisodeOverrides,
        dub: bool,
    ) -> Result<Episode, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_conversions_work() {
        let db_err = sea_orm::DbErr::Custom("test".to_string());
        let err: CatalogError = db_err.into();
        assert!(matches!(err, CatalogError::Database(_)));

        let err: CatalogError = UpstreamError::Status {
            url: "https://example.test".into(),
            status: 503,
        }
        .into();
        assert!(matches!(err, CatalogError::Upstream(_)));
    }
}
