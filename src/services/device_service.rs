//! Issues opaque device identifiers.

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::db::Store;
use crate::domain::DeviceId;
use crate::services::personalization_service::PersonalizationError;
use std::sync::Arc;
use tracing::info;

#[async_trait::async_trait]
pub trait DeviceService: Send + Sync {
    /// Generates and records a fresh device id.
    ///
    /// # Errors
    ///
    /// Returns [`PersonalizationError::Database`] if the id cannot be stored.
    async fn issue(&self) -> Result<DeviceId, PersonalizationError>;
}

pub struct SeaOrmDeviceService {
    store: Arc<Store>,
    analytics: Analytics,
}

impl SeaOrmDeviceService {
    #[must_use]
    pub const fn new(store: Arc<Store>, analytics: Analytics) -> Self {
        Self { store, analytics }
    }
}

#[async_trait::async_trait]
impl DeviceService for SeaOrmDeviceService {
    async fn issue(&self) -> Result<DeviceId, PersonalizationError> {
        let device = DeviceId::generate();
        self.store.create_device(&device).await?;

        info!(device_id = %device, "Issued device id");
        self.analytics.record(AnalyticsEvent::DeviceCreated {
            device_id: device.to_string(),
        });

        Ok(device)
    }
}
