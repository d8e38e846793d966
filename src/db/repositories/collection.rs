use crate::domain::{PageRequest, Paginated};
use crate::entities::{collections, prelude::*};
use crate::models::personal::{Change, Collection};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

pub struct CollectionRepository {
    conn: DatabaseConnection,
}

impl CollectionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Puts the anime into `kind`, replacing any other type it had for this
    /// device. Returns the replaced type, if any.
    pub async fn upsert(
        &self,
        device_id: &str,
        anime_id: &str,
        kind: &str,
    ) -> Result<Option<String>> {
        let txn = self.conn.begin().await?;

        let previous = Collections::find()
            .filter(collections::Column::DeviceId.eq(device_id))
            .filter(collections::Column::AnimeId.eq(anime_id))
            .one(&txn)
            .await?
            .map(|m| m.kind);

        Collections::insert(collections::ActiveModel {
            device_id: Set(device_id.to_string()),
            anime_id: Set(anime_id.to_string()),
            kind: Set(kind.to_string()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([collections::Column::DeviceId, collections::Column::AnimeId])
                .update_columns([collections::Column::Kind, collections::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;
        Ok(previous)
    }

    pub async fn remove(&self, device_id: &str, anime_id: &str, kind: &str) -> Result<Change> {
        let result = Collections::delete_many()
            .filter(collections::Column::DeviceId.eq(device_id))
            .filter(collections::Column::AnimeId.eq(anime_id))
            .filter(collections::Column::Kind.eq(kind))
            .exec(&self.conn)
            .await?;

        Ok(Change::from_rows(result.rows_affected))
    }

    pub async fn list(
        &self,
        device_id: &str,
        kind: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<Collection>> {
        let mut query = Collections::find().filter(collections::Column::DeviceId.eq(device_id));
        if let Some(kind) = kind {
            query = query.filter(collections::Column::Kind.eq(kind));
        }

        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_asc(collections::Column::AnimeId)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(to_collection).collect(),
            total,
            page,
        ))
    }

    pub async fn list_all(&self, device_id: &str) -> Result<Vec<Collection>> {
        let rows = Collections::find()
            .filter(collections::Column::DeviceId.eq(device_id))
            .order_by_asc(collections::Column::AnimeId)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(to_collection).collect())
    }
}

fn to_collection(m: collections::Model) -> Collection {
    Collection {
        anime_id: m.anime_id,
        kind: m.kind,
    }
}
