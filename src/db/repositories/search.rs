use crate::entities::{prelude::*, search};
use crate::models::anime::SearchResult;
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

pub struct SearchRepository {
    conn: DatabaseConnection,
}

impl SearchRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts every result whose id is not stored yet. Existing rows keep
    /// their first-seen metadata. Returns the number of rows written.
    pub async fn insert_missing(&self, results: &[SearchResult]) -> Result<u64> {
        if results.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let models: Vec<search::ActiveModel> = results
            .iter()
            .map(|r| search::ActiveModel {
                id: Set(r.id.clone()),
                title: Set(r.title.clone()),
                year: Set(r.year),
                poster: Set(r.poster.clone()),
                kind: Set(r.kind.clone()),
                parser_type: Set(r.provider.clone()),
                created_at: Set(now.clone()),
            })
            .collect();

        let inserted = Search::insert_many(models)
            .on_conflict(
                OnConflict::column(search::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(inserted)
    }

    pub async fn get(&self, id: &str) -> Result<Option<SearchResult>> {
        let row = Search::find_by_id(id.to_string()).one(&self.conn).await?;
        Ok(row.map(to_result))
    }
}

fn to_result(m: search::Model) -> SearchResult {
    SearchResult {
        id: m.id,
        title: m.title,
        poster: m.poster,
        year: m.year,
        kind: m.kind,
        provider: m.parser_type,
    }
}
