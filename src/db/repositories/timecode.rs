use crate::entities::{prelude::*, timecodes};
use crate::models::personal::Timecode;
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

pub struct TimecodeRepository {
    conn: DatabaseConnection,
}

impl TimecodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn upsert(&self, device_id: &str, timecode: &Timecode) -> Result<()> {
        Timecodes::insert(timecodes::ActiveModel {
            device_id: Set(device_id.to_string()),
            episode_id: Set(timecode.episode_id.clone()),
            anime_id: Set(timecode.anime_id.clone()),
            time: Set(timecode.time),
            is_watched: Set(timecode.is_watched),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([timecodes::Column::DeviceId, timecodes::Column::EpisodeId])
                .update_columns([
                    timecodes::Column::AnimeId,
                    timecodes::Column::Time,
                    timecodes::Column::IsWatched,
                    timecodes::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        Ok(())
    }

    pub async fn get(&self, device_id: &str, episode_id: &str) -> Result<Option<Timecode>> {
        let row = Timecodes::find()
            .filter(timecodes::Column::DeviceId.eq(device_id))
            .filter(timecodes::Column::EpisodeId.eq(episode_id))
            .one(&self.conn)
            .await?;

        Ok(row.map(to_timecode))
    }

    pub async fn list_all(&self, device_id: &str) -> Result<Vec<Timecode>> {
        let rows = Timecodes::find()
            .filter(timecodes::Column::DeviceId.eq(device_id))
            .order_by_asc(timecodes::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(to_timecode).collect())
    }

    pub async fn list_for_anime(&self, device_id: &str, anime_id: &str) -> Result<Vec<Timecode>> {
        let rows = Timecodes::find()
            .filter(timecodes::Column::DeviceId.eq(device_id))
            .filter(timecodes::Column::AnimeId.eq(anime_id))
            .order_by_asc(timecodes::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(to_timecode).collect())
    }
}

fn to_timecode(m: timecodes::Model) -> Timecode {
    Timecode {
        episode_id: m.episode_id,
        anime_id: m.anime_id,
        time: m.time,
        is_watched: m.is_watched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    fn timecode(episode_id: &str, time: i32) -> Timecode {
        Timecode {
            episode_id: episode_id.into(),
            anime_id: "9".into(),
            time,
            is_watched: false,
        }
    }

    #[tokio::test]
    async fn test_upsert_updates_same_row() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = TimecodeRepository::new(store.conn.clone());

        repo.upsert("dev", &timecode("ep", 30)).await.unwrap();
        assert_eq!(repo.list_all("dev").await.unwrap().len(), 1);

        repo.upsert("dev", &timecode("ep", 600)).await.unwrap();
        let all = repo.list_all("dev").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].time, 600);
    }

    #[tokio::test]
    async fn test_get_and_list_for_anime() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = TimecodeRepository::new(store.conn.clone());

        repo.upsert("dev", &timecode("a", 1)).await.unwrap();
        repo.upsert("dev", &timecode("b", 2)).await.unwrap();

        assert_eq!(repo.get("dev", "b").await.unwrap().unwrap().time, 2);
        assert!(repo.get("other", "b").await.unwrap().is_none());
        assert_eq!(repo.list_for_anime("dev", "9").await.unwrap().len(), 2);
        assert!(repo.list_for_anime("dev", "10").await.unwrap().is_empty());
    }
}
