//! Domain service for device-scoped favourites, collections, history and
//! resume timecodes.

use crate::domain::{DeviceId, PageRequest, Paginated};
use crate::models::personal::{Collection, Favourite, History, HistoryInput, Timecode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonalizationError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for PersonalizationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PersonalizationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// All operations are scoped to the presenting device; nothing is shared
/// between devices.
///
/// # Errors
///
/// Every method returns [`PersonalizationError::Database`] on connection
/// failures.
#[async_trait::async_trait]
pub trait PersonalizationService: Send + Sync {
    /// Adding an existing favourite is a silent no-op.
    async fn add_favourite(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<(), PersonalizationError>;

    async fn remove_favourite(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<(), PersonalizationError>;

    async fn is_favourite(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<bool, PersonalizationError>;

    async fn list_favourites(
        &self,
        device: &DeviceId,
        page: PageRequest,
    ) -> Result<Paginated<Favourite>, PersonalizationError>;

    async fn list_all_favourites(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<Favourite>, PersonalizationError>;

    /// Puts the anime into `kind`; a previous type for the same anime is
    /// replaced.
    async fn add_collection(
        &self,
        device: &DeviceId,
        anime_id: &str,
        kind: &str,
    ) -> Result<(), PersonalizationError>;

    async fn remove_collection(
        &self,
        device: &DeviceId,
        anime_id: &str,
        kind: &str,
    ) -> Result<(), PersonalizationError>;

    async fn list_collections(
        &self,
        device: &DeviceId,
        kind: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<Collection>, PersonalizationError>;

    async fn list_all_collections(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<Collection>, PersonalizationError>;

    async fn add_history(
        &self,
        device: &DeviceId,
        input: HistoryInput,
    ) -> Result<(), PersonalizationError>;

    async fn list_history(
        &self,
        device: &DeviceId,
        page: PageRequest,
    ) -> Result<Paginated<History>, PersonalizationError>;

    async fn list_all_history(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<History>, PersonalizationError>;

    async fn add_timecode(
        &self,
        device: &DeviceId,
        timecode: Timecode,
    ) -> Result<(), PersonalizationError>;

    /// # Errors
    ///
    /// Returns [`PersonalizationError::NotFound`] when no timecode is stored
    /// for the episode.
    async fn get_timecode(
        &self,
        device: &DeviceId,
        episode_id: &str,
    ) -> Result<Timecode, PersonalizationError>;

    async fn list_timecodes(&self, device: &DeviceId)
    -> Result<Vec<Timecode>, PersonalizationError>;

    async fn list_anime_timecodes(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<Vec<Timecode>, PersonalizationError>;
}
