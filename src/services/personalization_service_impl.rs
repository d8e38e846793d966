//! `SeaORM` implementation of [`PersonalizationService`].
//!
//! Favourite and collection changes also move the analytics counters, but
//! only when the relational row actually changed.

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::db::Store;
use crate::domain::{DeviceId, PageRequest, Paginated};
use crate::models::personal::{Change, Collection, Favourite, History, HistoryInput, Timecode};
use crate::services::personalization_service::{PersonalizationError, PersonalizationService};
use std::sync::Arc;

pub struct SeaOrmPersonalizationService {
    store: Arc<Store>,
    analytics: Analytics,
}

impl SeaOrmPersonalizationService {
    #[must_use]
    pub const fn new(store: Arc<Store>, analytics: Analytics) -> Self {
        Self { store, analytics }
    }

    fn favourite_delta(&self, anime_id: &str, delta: i8) {
        self.analytics.record(AnalyticsEvent::Favourite {
            anime_id: anime_id.to_string(),
            delta,
        });
    }

    fn collection_delta(&self, anime_id: &str, kind: &str, delta: i8) {
        self.analytics.record(AnalyticsEvent::Collection {
            anime_id: anime_id.to_string(),
            kind: kind.to_string(),
            delta,
        });
    }
}

#[async_trait::async_trait]
impl PersonalizationService for SeaOrmPersonalizationService {
    async fn add_favourite(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<(), PersonalizationError> {
        if self.store.add_favourite(device.as_str(), anime_id).await? == Change::Applied {
            self.favourite_delta(anime_id, 1);
        }
        Ok(())
    }

    async fn remove_favourite(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<(), PersonalizationError> {
        if self.store.remove_favourite(device.as_str(), anime_id).await? == Change::Applied {
            self.favourite_delta(anime_id, -1);
        }
        Ok(())
    }

    async fn is_favourite(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<bool, PersonalizationError> {
        Ok(self.store.is_favourite(device.as_str(), anime_id).await?)
    }

    async fn list_favourites(
        &self,
        device: &DeviceId,
        page: PageRequest,
    ) -> Result<Paginated<Favourite>, PersonalizationError> {
        Ok(self.store.list_favourites(device.as_str(), page).await?)
    }

    async fn list_all_favourites(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<Favourite>, PersonalizationError> {
        Ok(self.store.list_all_favourites(device.as_str()).await?)
    }

    async fn add_collection(
        &self,
        device: &DeviceId,
        anime_id: &str,
        kind: &str,
    ) -> Result<(), PersonalizationError> {
        let previous = self
            .store
            .upsert_collection(device.as_str(), anime_id, kind)
            .await?;

        match previous.as_deref() {
            Some(previous) if previous == kind => {}
            Some(previous) => {
                self.collection_delta(anime_id, previous, -1);
                self.collection_delta(anime_id, kind, 1);
            }
            None => self.collection_delta(anime_id, kind, 1),
        }
        Ok(())
    }

    async fn remove_collection(
        &self,
        device: &DeviceId,
        anime_id: &str,
        kind: &str,
    ) -> Result<(), PersonalizationError> {
        let change = self
            .store
            .remove_collection(device.as_str(), anime_id, kind)
            .await?;
        if change == Change::Applied {
            self.collection_delta(anime_id, kind, -1);
        }
        Ok(())
    }

    async fn list_collections(
        &self,
        device: &DeviceId,
        kind: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<Collection>, PersonalizationError> {
        Ok(self
            .store
            .list_collections(device.as_str(), kind, page)
            .await?)
    }

    async fn list_all_collections(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<Collection>, PersonalizationError> {
        Ok(self.store.list_all_collections(device.as_str()).await?)
    }

    async fn add_history(
        &self,
        device: &DeviceId,
        input: HistoryInput,
    ) -> Result<(), PersonalizationError> {
        Ok(self.store.upsert_history(device.as_str(), &input).await?)
    }

    async fn list_history(
        &self,
        device: &DeviceId,
        page: PageRequest,
    ) -> Result<Paginated<History>, PersonalizationError> {
        Ok(self.store.list_history(device.as_str(), page).await?)
    }

    async fn list_all_history(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<History>, PersonalizationError> {
        Ok(self.store.list_all_history(device.as_str()).await?)
    }

    async fn add_timecode(
        &self,
        device: &DeviceId,
        timecode: Timecode,
    ) -> Result<(), PersonalizationError> {
        Ok(self
            .store
            .upsert_timecode(device.as_str(), &timecode)
            .await?)
    }

    async fn get_timecode(
        &self,
        device: &DeviceId,
        episode_id: &str,
    ) -> Result<Timecode, PersonalizationError> {
        self.store
            .get_timecode(device.as_str(), episode_id)
            .await?
            .ok_or_else(|| PersonalizationError::NotFound(format!("timecode for {episode_id}")))
    }

    async fn list_timecodes(
        &self,
        device: &DeviceId,
    ) -> Result<Vec<Timecode>, PersonalizationError> {
        Ok(self.store.list_timecodes(device.as_str()).await?)
    }

    async fn list_anime_timecodes(
        &self,
        device: &DeviceId,
        anime_id: &str,
    ) -> Result<Vec<Timecode>, PersonalizationError> {
        Ok(self
            .store
            .list_anime_timecodes(device.as_str(), anime_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsSink;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<AnalyticsEvent>>);

    #[async_trait::async_trait]
    impl AnalyticsSink for Recording {
        async fn write(&self, event: &AnalyticsEvent) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    async fn service() -> (SeaOrmPersonalizationService, Arc<Recording>) {
        let store = Arc::new(Store::new("sqlite::memory:").await.unwrap());
        let sink = Arc::new(Recording::default());
        let service = SeaOrmPersonalizationService::new(store, Analytics::new(sink.clone()));
        (service, sink)
    }

    async fn settle() {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_repeat_favourite_counts_once() {
        let (service, sink) = service().await;
        let device = DeviceId::generate();

        service.add_favourite(&device, "1").await.unwrap();
        service.add_favourite(&device, "1").await.unwrap();
        settle().await;

        assert_eq!(sink.0.lock().unwrap().len(), 1);
        assert!(service.is_favourite(&device, "1").await.unwrap());
    }

    #[tokio::test]
    async fn test_collection_move_emits_both_deltas() {
        let (service, sink) = service().await;
        let device = DeviceId::generate();

        service
            .add_collection(&device, "1", "planned")
            .await
            .unwrap();
        service
            .add_collection(&device, "1", "watching")
            .await
            .unwrap();
        settle().await;

        let events = sink.0.lock().unwrap().clone();
        assert_eq!(events.len(), 3);
        assert!(events.contains(&AnalyticsEvent::Collection {
            anime_id: "1".into(),
            kind: "planned".into(),
            delta: -1,
        }));
    }

    #[tokio::test]
    async fn test_missing_timecode_is_not_found() {
        let (service, _) = service().await;
        let device = DeviceId::generate();

        let err = service.get_timecode(&device, "ep").await.unwrap_err();
        assert!(matches!(err, PersonalizationError::NotFound(_)));
    }
}
