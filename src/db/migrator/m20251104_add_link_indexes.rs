use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookups by genre / cast member ("which movies feature X").
        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genres_genre_id")
                    .table(MovieGenres::Table)
                    .col(MovieGenres::GenreId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_casts_cast_member_id")
                    .table(MovieCasts::Table)
                    .col(MovieCasts::CastMemberId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_movie_casts_cast_member_id")
                    .table(MovieCasts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_movie_genres_genre_id")
                    .table(MovieGenres::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum MovieGenres {
    Table,
    GenreId,
}

#[derive(DeriveIden)]
enum MovieCasts {
    Table,
    CastMemberId,
}
