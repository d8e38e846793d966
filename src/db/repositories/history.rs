use crate::domain::{PageRequest, Paginated};
use crate::entities::{history, prelude::*};
use crate::models::personal::{History as HistoryEntry, HistoryInput};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// One row per (device, anime); a repeat watch moves `watched_at` to now.
    pub async fn upsert(&self, device_id: &str, input: &HistoryInput) -> Result<()> {
        History::insert(history::ActiveModel {
            device_id: Set(device_id.to_string()),
            anime_id: Set(input.anime_id.clone()),
            last_watched: Set(input.last_watched),
            is_watched: Set(input.is_watched),
            watched_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([history::Column::DeviceId, history::Column::AnimeId])
                .update_columns([
                    history::Column::LastWatched,
                    history::Column::IsWatched,
                    history::Column::WatchedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        Ok(())
    }

    /// Most recently watched first.
    pub async fn list(
        &self,
        device_id: &str,
        page: PageRequest,
    ) -> Result<Paginated<HistoryEntry>> {
        let query = History::find().filter(history::Column::DeviceId.eq(device_id));

        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_desc(history::Column::WatchedAt)
            .order_by_desc(history::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(to_entry).collect(),
            total,
            page,
        ))
    }

    pub async fn list_all(&self, device_id: &str) -> Result<Vec<HistoryEntry>> {
        let rows = History::find()
            .filter(history::Column::DeviceId.eq(device_id))
            .order_by_desc(history::Column::WatchedAt)
            .order_by_desc(history::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(to_entry).collect())
    }
}

fn to_entry(m: history::Model) -> HistoryEntry {
    HistoryEntry {
        anime_id: m.anime_id,
        last_watched: m.last_watched,
        is_watched: m.is_watched,
        watched_at: m.watched_at,
    }
}
