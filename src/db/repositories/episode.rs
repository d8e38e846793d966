use crate::entities::{episode_sources, episode_subtitles, episodes, prelude::*};
use crate::models::episode::{Episode, Source, Subtitle, TimeSegment};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Episode>> {
        let Some(row) = Episodes::find_by_id(id.to_string()).one(&self.conn).await? else {
            return Ok(None);
        };

        let sources = EpisodeSources::find()
            .filter(episode_sources::Column::EpisodeId.eq(id))
            .order_by_asc(episode_sources::Column::Position)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|s| Source {
                url: s.url,
                kind: s.kind,
            })
            .collect();

        let subtitles = EpisodeSubtitles::find()
            .filter(episode_subtitles::Column::EpisodeId.eq(id))
            .order_by_asc(episode_subtitles::Column::Position)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|s| Subtitle {
                url: s.url,
                lang: s.language,
            })
            .collect();

        Ok(Some(Episode {
            id: row.id,
            ordinal: row.ordinal,
            title: row.title,
            opening: TimeSegment {
                start: row.opening_start,
                end: row.opening_end,
            },
            ending: TimeSegment {
                start: row.ending_start,
                end: row.ending_end,
            },
            sources,
            subtitles,
        }))
    }

    /// Writes the episode with its sources and subtitles in one transaction.
    /// Returns `false` without touching child rows when the episode exists.
    pub async fn insert(&self, episode: &Episode) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let inserted = Episodes::insert(episodes::ActiveModel {
            id: Set(episode.id.clone()),
            ordinal: Set(episode.ordinal),
            title: Set(episode.title.clone()),
            opening_start: Set(episode.opening.start),
            opening_end: Set(episode.opening.end),
            ending_start: Set(episode.ending.start),
            ending_end: Set(episode.ending.end),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        })
        .on_conflict(
            OnConflict::column(episodes::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        if inserted == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        if !episode.sources.is_empty() {
            let sources = episode
                .sources
                .iter()
                .zip(0..)
                .map(|(s, position)| episode_sources::ActiveModel {
                    episode_id: Set(episode.id.clone()),
                    position: Set(position),
                    url: Set(s.url.clone()),
                    kind: Set(s.kind.clone()),
                    ..Default::default()
                });
            EpisodeSources::insert_many(sources).exec(&txn).await?;
        }

        if !episode.subtitles.is_empty() {
            let subtitles = episode
                .subtitles
                .iter()
                .zip(0..)
                .map(|(s, position)| episode_subtitles::ActiveModel {
                    episode_id: Set(episode.id.clone()),
                    position: Set(position),
                    url: Set(s.url.clone()),
                    language: Set(s.lang.clone()),
                    ..Default::default()
                });
            EpisodeSubtitles::insert_many(subtitles).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    fn episode() -> Episode {
        Episode {
            id: "ep-1".into(),
            ordinal: 3,
            title: "Third".into(),
            opening: TimeSegment { start: 10, end: 95 },
            ending: TimeSegment {
                start: 1300,
                end: 1390,
            },
            sources: vec![
                Source {
                    url: "https://cdn/480.m3u8".into(),
                    kind: "hls480".into(),
                },
                Source {
                    url: "https://cdn/1080.m3u8".into(),
                    kind: "hls1080".into(),
                },
            ],
            subtitles: vec![Subtitle {
                url: "https://cdn/en.vtt".into(),
                lang: "English".into(),
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_then_read_back() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = EpisodeRepository::new(store.conn.clone());

        assert!(repo.get("ep-1").await.unwrap().is_none());
        assert!(repo.insert(&episode()).await.unwrap());

        let stored = repo.get("ep-1").await.unwrap().unwrap();
        assert_eq!(stored, episode());
    }

    #[tokio::test]
    async fn test_second_insert_is_noop() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let repo = EpisodeRepository::new(store.conn.clone());

        assert!(repo.insert(&episode()).await.unwrap());

        let mut changed = episode();
        changed.title = "Changed".into();
        changed.sources.truncate(1);
        assert!(!repo.insert(&changed).await.unwrap());

        let stored = repo.get("ep-1").await.unwrap().unwrap();
        assert_eq!(stored.title, "Third");
        assert_eq!(stored.sources.len(), 2);
    }
}
