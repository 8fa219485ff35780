//! `SeaORM` implementation of the `MovieService` trait.

use crate::db::Store;
use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieInput};
use crate::services::movie_service::{MovieError, MovieService, matches_term};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmMovieService {
    store: Store,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn prepare(input: MovieInput) -> Result<MovieInput, MovieError> {
        let input = input.normalized();
        input.validate().map_err(MovieError::Validation)?;
        Ok(input)
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn list(&self) -> Result<Vec<Movie>, MovieError> {
        self.store
            .list_movies()
            .await
            .map_err(|e| MovieError::database(&e))
    }

    async fn search(&self, term: &str) -> Result<Vec<Movie>, MovieError> {
        let term = term.trim().to_lowercase();
        let movies = self.list().await?;

        if term.is_empty() {
            return Ok(movies);
        }

        Ok(movies
            .into_iter()
            .filter(|m| matches_term(m, &term))
            .collect())
    }

    async fn get(&self, id: MovieId) -> Result<Movie, MovieError> {
        self.store
            .get_movie(id)
            .await
            .map_err(|e| MovieError::database(&e))?
            .ok_or(MovieError::NotFound(id))
    }

    async fn add(&self, input: MovieInput) -> Result<Movie, MovieError> {
        let input = Self::prepare(input)?;

        let row = self
            .store
            .insert_movie(&input)
            .await
            .map_err(|e| MovieError::database(&e))?;
        let id = MovieId::new(row.id);

        // The row stays when linking fails; reads fall back to its snapshots.
        if let Err(e) = self.store.link_movie_names(id, &input).await {
            warn!(movie_id = %id, "Movie saved without genre/cast links: {e:#}");
            return Err(MovieError::database(&e));
        }

        info!(movie_id = %id, name = %input.name, "Movie added");
        self.get(id).await
    }

    async fn update(&self, id: MovieId, input: MovieInput) -> Result<(), MovieError> {
        let input = Self::prepare(input)?;

        let updated = self
            .store
            .replace_movie(id, &input)
            .await
            .map_err(|e| MovieError::database(&e))?;

        if !updated {
            return Err(MovieError::NotFound(id));
        }

        info!(movie_id = %id, "Movie updated");
        Ok(())
    }

    async fn delete(&self, id: MovieId) -> Result<bool, MovieError> {
        let removed = self
            .store
            .delete_movie(id)
            .await
            .map_err(|e| MovieError::database(&e))?;

        if removed {
            info!(movie_id = %id, "Movie deleted");
        }

        Ok(removed)
    }
}
