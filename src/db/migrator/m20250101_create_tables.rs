use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Search)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Episodes)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(EpisodeSources)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(EpisodeSubtitles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Devices)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Favourites)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Collections)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(History)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Timecodes)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Timecodes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(History).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collections).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Favourites).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EpisodeSubtitles).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EpisodeSources).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Episodes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Search).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
