use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "episodes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub ordinal: i32,
    pub title: String,
    pub opening_start: i32,
    pub opening_end: i32,
    pub ending_start: i32,
    pub ending_end: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::episode_sources::Entity")]
    EpisodeSources,
    #[sea_orm(has_many = "super::episode_subtitles::Entity")]
    EpisodeSubtitles,
}

impl Related<super::episode_sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EpisodeSources.def()
    }
}

impl Related<super::episode_subtitles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EpisodeSubtitles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
