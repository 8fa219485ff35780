use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

use crate::domain::{MovieId, NameList, snapshot};
use crate::entities::{movie_casts, movie_genres, movies, prelude::*};
use crate::models::movie::{Movie, MovieInput};

use super::{cast, genre};

/// Build the client view of a movie from resolved name lists.
#[must_use]
pub fn to_movie(model: movies::Model, genre: Vec<String>, cast: Vec<String>) -> Movie {
    Movie {
        id: MovieId::new(model.id),
        name: model.name,
        release_year: model.release_year,
        language: model.language,
        rating: model.rating,
        description: model.description,
        image_url: model.image_url,
        watch_url: model.watch_url,
        genre,
        cast,
    }
}

/// Client view using only the JSON snapshots.
#[must_use]
pub fn from_snapshot(model: movies::Model) -> Movie {
    let genre = snapshot::parse_names(&model.genre_json);
    let cast = snapshot::parse_names(&model.cast_json);
    to_movie(model, genre, cast)
}

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All movie rows in ascending id order.
    pub async fn list_all(&self) -> Result<Vec<movies::Model>> {
        Movies::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")
    }

    pub async fn get(&self, id: MovieId) -> Result<Option<movies::Model>> {
        Movies::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query movie by ID")
    }

    /// Movie with each list read from its join rows, or from the snapshot when
    /// the movie has none.
    pub async fn get_resolved(&self, id: MovieId) -> Result<Option<Movie>> {
        let Some(model) = self.get(id).await? else {
            return Ok(None);
        };

        let genre = self.linked_names(id, NameList::Genre).await?;
        let cast = self.linked_names(id, NameList::Cast).await?;

        let genre = snapshot::resolve(genre, &model.genre_json);
        let cast = snapshot::resolve(cast, &model.cast_json);

        Ok(Some(to_movie(model, genre, cast)))
    }

    pub async fn count(&self) -> Result<u64> {
        Movies::find()
            .count(&self.conn)
            .await
            .context("Failed to count movies")
    }

    pub async fn linked_names(&self, id: MovieId, list: NameList) -> Result<Vec<String>> {
        linked_names(&self.conn, id.value(), list)
            .await
            .with_context(|| format!("Failed to load {list} links for movie {id}"))
    }

    /// Linked names of every movie that has at least one join row for `list`.
    pub async fn all_linked_names(&self, list: NameList) -> Result<HashMap<i32, Vec<String>>> {
        let pairs: Vec<(i32, String)> = match list {
            NameList::Genre => MovieGenres::find()
                .find_also_related(Genres)
                .order_by_asc(movie_genres::Column::MovieId)
                .order_by_asc(movie_genres::Column::Position)
                .all(&self.conn)
                .await
                .context("Failed to load genre links")?
                .into_iter()
                .filter_map(|(link, genre)| genre.map(|g| (link.movie_id, g.name)))
                .collect(),
            NameList::Cast => MovieCasts::find()
                .find_also_related(CastMembers)
                .order_by_asc(movie_casts::Column::MovieId)
                .order_by_asc(movie_casts::Column::Position)
                .all(&self.conn)
                .await
                .context("Failed to load cast links")?
                .into_iter()
                .filter_map(|(link, member)| member.map(|m| (link.movie_id, m.name)))
                .collect(),
        };

        let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
        for (movie_id, name) in pairs {
            grouped.entry(movie_id).or_default().push(name);
        }

        Ok(grouped)
    }

    /// Insert the movie row only, with both snapshots taken from the input lists.
    pub async fn insert(&self, input: &MovieInput) -> Result<movies::Model> {
        let active = movies::ActiveModel {
            name: Set(input.name.clone()),
            release_year: Set(input.release_year.clone()),
            language: Set(input.language.clone()),
            rating: Set(input.rating.clone()),
            description: Set(input.description.clone()),
            image_url: Set(input.image_url.clone()),
            watch_url: Set(input.watch_url.clone()),
            genre_json: Set(snapshot::serialize_names(&input.genre)),
            cast_json: Set(snapshot::serialize_names(&input.cast)),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert movie")
    }

    /// Create join rows for both lists of the input in one transaction.
    pub async fn link_names(&self, id: MovieId, input: &MovieInput) -> Result<()> {
        let txn = self.conn.begin().await?;

        insert_links(&txn, id.value(), NameList::Genre, &input.genre).await?;
        insert_links(&txn, id.value(), NameList::Cast, &input.cast).await?;

        txn.commit().await.context("Failed to commit movie links")
    }

    /// Create join rows for a single list from already normalized names.
    pub async fn link_list(&self, id: MovieId, list: NameList, names: &[String]) -> Result<()> {
        let txn = self.conn.begin().await?;
        insert_links(&txn, id.value(), list, names).await?;
        txn.commit()
            .await
            .with_context(|| format!("Failed to commit {list} links for movie {id}"))
    }

    /// Overwrite scalars and snapshots and replace all join rows.
    ///
    /// Returns `false` when the movie does not exist.
    pub async fn replace(&self, id: MovieId, input: &MovieInput) -> Result<bool> {
        let txn = self.conn.begin().await?;

        // First statement is a write so SQLite takes the write lock up front.
        let result = Movies::update_many()
            .set(movies::ActiveModel {
                name: Set(input.name.clone()),
                release_year: Set(input.release_year.clone()),
                language: Set(input.language.clone()),
                rating: Set(input.rating.clone()),
                description: Set(input.description.clone()),
                image_url: Set(input.image_url.clone()),
                watch_url: Set(input.watch_url.clone()),
                genre_json: Set(snapshot::serialize_names(&input.genre)),
                cast_json: Set(snapshot::serialize_names(&input.cast)),
                ..Default::default()
            })
            .filter(movies::Column::Id.eq(id.value()))
            .exec(&txn)
            .await
            .with_context(|| format!("Failed to update movie {id}"))?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        delete_links(&txn, id.value()).await?;
        insert_links(&txn, id.value(), NameList::Genre, &input.genre).await?;
        insert_links(&txn, id.value(), NameList::Cast, &input.cast).await?;

        txn.commit().await.context("Failed to commit movie update")?;
        Ok(true)
    }

    /// Remove the movie and its join rows. Returns whether a movie was removed.
    pub async fn delete(&self, id: MovieId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        delete_links(&txn, id.value()).await?;
        let result = Movies::delete_by_id(id.value()).exec(&txn).await?;

        txn.commit().await.context("Failed to commit movie delete")?;
        Ok(result.rows_affected > 0)
    }

    /// Write the given snapshots. `None` leaves a column untouched.
    pub async fn update_snapshots(
        &self,
        id: MovieId,
        genre_json: Option<String>,
        cast_json: Option<String>,
    ) -> Result<()> {
        if genre_json.is_none() && cast_json.is_none() {
            return Ok(());
        }

        let mut active = movies::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(id.value()),
            ..Default::default()
        };
        if let Some(json) = genre_json {
            active.genre_json = Set(json);
        }
        if let Some(json) = cast_json {
            active.cast_json = Set(json);
        }

        active
            .update(&self.conn)
            .await
            .with_context(|| format!("Failed to update snapshots for movie {id}"))?;

        Ok(())
    }
}

async fn linked_names<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
    list: NameList,
) -> Result<Vec<String>, DbErr> {
    let names = match list {
        NameList::Genre => MovieGenres::find()
            .find_also_related(Genres)
            .filter(movie_genres::Column::MovieId.eq(movie_id))
            .order_by_asc(movie_genres::Column::Position)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(_, genre)| genre.map(|g| g.name))
            .collect(),
        NameList::Cast => MovieCasts::find()
            .find_also_related(CastMembers)
            .filter(movie_casts::Column::MovieId.eq(movie_id))
            .order_by_asc(movie_casts::Column::Position)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(_, member)| member.map(|m| m.name))
            .collect(),
    };

    Ok(names)
}

async fn insert_links<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
    list: NameList,
    names: &[String],
) -> Result<(), DbErr> {
    for (index, name) in names.iter().enumerate() {
        let position = i32::try_from(index).unwrap_or(i32::MAX);

        match list {
            NameList::Genre => {
                let genre_id = genre::get_or_create(db, name).await?;
                MovieGenres::insert(movie_genres::ActiveModel {
                    movie_id: Set(movie_id),
                    genre_id: Set(genre_id),
                    position: Set(position),
                })
                .on_conflict(
                    OnConflict::columns([
                        movie_genres::Column::MovieId,
                        movie_genres::Column::GenreId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
            }
            NameList::Cast => {
                let cast_member_id = cast::get_or_create(db, name).await?;
                MovieCasts::insert(movie_casts::ActiveModel {
                    movie_id: Set(movie_id),
                    cast_member_id: Set(cast_member_id),
                    position: Set(position),
                })
                .on_conflict(
                    OnConflict::columns([
                        movie_casts::Column::MovieId,
                        movie_casts::Column::CastMemberId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
            }
        }
    }

    Ok(())
}

async fn delete_links<C: ConnectionTrait>(db: &C, movie_id: i32) -> Result<(), DbErr> {
    MovieGenres::delete_many()
        .filter(movie_genres::Column::MovieId.eq(movie_id))
        .exec(db)
        .await?;

    MovieCasts::delete_many()
        .filter(movie_casts::Column::MovieId.eq(movie_id))
        .exec(db)
        .await?;

    Ok(())
}
