use crate::domain::{PageRequest, Paginated};
use crate::entities::{favourites, prelude::*};
use crate::models::personal::{Change, Favourite};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub struct FavouriteRepository {
    conn: DatabaseConnection,
}

impl FavouriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Adding an anime that is already a favourite is a no-op.
    pub async fn add(&self, device_id: &str, anime_id: &str) -> Result<Change> {
        let rows = Favourites::insert(favourites::ActiveModel {
            device_id: Set(device_id.to_string()),
            anime_id: Set(anime_id.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([favourites::Column::DeviceId, favourites::Column::AnimeId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        Ok(Change::from_rows(rows))
    }

    pub async fn remove(&self, device_id: &str, anime_id: &str) -> Result<Change> {
        let result = Favourites::delete_many()
            .filter(favourites::Column::DeviceId.eq(device_id))
            .filter(favourites::Column::AnimeId.eq(anime_id))
            .exec(&self.conn)
            .await?;

        Ok(Change::from_rows(result.rows_affected))
    }

    pub async fn exists(&self, device_id: &str, anime_id: &str) -> Result<bool> {
        let count = Favourites::find()
            .filter(favourites::Column::DeviceId.eq(device_id))
            .filter(favourites::Column::AnimeId.eq(anime_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Newest first.
    pub async fn list(&self, device_id: &str, page: PageRequest) -> Result<Paginated<Favourite>> {
        let query = Favourites::find().filter(favourites::Column::DeviceId.eq(device_id));

        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_desc(favourites::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.conn)
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(to_favourite).collect(),
            total,
            page,
        ))
    }

    pub async fn list_all(&self, device_id: &str) -> Result<Vec<Favourite>> {
        let rows = Favourites::find()
            .filter(favourites::Column::DeviceId.eq(device_id))
            .order_by_desc(favourites::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(to_favourite).collect())
    }
}

fn to_favourite(m: favourites::Model) -> Favourite {
    Favourite {
        anime_id: m.anime_id,
    }
}
