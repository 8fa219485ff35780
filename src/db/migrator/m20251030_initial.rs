use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Genres available before any movie references them.
const DEFAULT_GENRES: &[&str] = &[
    "Action", "Comedy", "Drama", "Thriller", "Horror", "Romance", "Crime", "Sci-Fi", "Sports",
    "Musical", "Family",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Movies)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Genres)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(CastMembers)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(MovieGenres)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(MovieCasts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let mut insert = sea_orm_migration::sea_query::Query::insert();
        insert
            .into_table(Genres)
            .columns([crate::entities::genres::Column::Name]);
        for name in DEFAULT_GENRES {
            insert.values_panic([(*name).into()]);
        }
        insert.on_conflict(
            OnConflict::column(crate::entities::genres::Column::Name)
                .do_nothing()
                .to_owned(),
        );

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieCasts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieGenres).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CastMembers).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies).to_owned())
            .await?;

        Ok(())
    }
}
