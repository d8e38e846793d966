use crate::domain::DeviceId;
use crate::entities::{devices, prelude::*};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

pub struct DeviceRepository {
    conn: DatabaseConnection,
}

impl DeviceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, device_id: &DeviceId) -> Result<()> {
        Devices::insert(devices::ActiveModel {
            device_id: Set(device_id.as_str().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        })
        .exec_without_returning(&self.conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    #[tokio::test]
    async fn test_create_device() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = DeviceRepository::new(store.conn.clone());
        let id = DeviceId::generate();

        repo.create(&id).await.unwrap();

        let row = Devices::find_by_id(id.as_str().to_string())
            .one(&store.conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.device_id, id.as_str());
        assert!(chrono::DateTime::parse_from_rfc3339(&row.created_at).is_ok());

        assert!(repo.create(&id).await.is_err());
    }
}
