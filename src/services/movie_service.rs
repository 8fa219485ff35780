//! Domain service for the movie catalog.
//!
//! Handlers go through [`MovieService`] and never touch the join tables or the
//! JSON snapshots directly.

use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieInput};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    #[error("Invalid movie data: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl MovieError {
    pub(crate) fn database(err: &anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Movie catalog operations.
///
/// # Examples
///
/// ```rust,ignore
/// use livemovies::services::{MovieError, MovieService};
/// use livemovies::domain::MovieId;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn MovieService>) -> Result<(), MovieError> {
///     let movie = service.get(MovieId::new(1)).await?;
///     println!("{} ({})", movie.name, movie.release_year);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// All movies in storage order. Name lists come from the snapshots only.
    async fn list(&self) -> Result<Vec<Movie>, MovieError>;

    /// Case-insensitive substring search over the scalar fields and the
    /// snapshot names. A blank term returns the full list.
    async fn search(&self, term: &str) -> Result<Vec<Movie>, MovieError>;

    /// A single movie with join rows preferred over the snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if the movie does not exist.
    async fn get(&self, id: MovieId) -> Result<Movie, MovieError>;

    /// Validates and stores a new movie, linking its genres and cast.
    ///
    /// # Errors
    ///
    /// - [`MovieError::Validation`] for bad input, nothing is written
    /// - [`MovieError::Database`] if linking fails; the movie row is kept
    async fn add(&self, input: MovieInput) -> Result<Movie, MovieError>;

    /// Overwrites a movie and replaces all of its links.
    async fn update(&self, id: MovieId, input: MovieInput) -> Result<(), MovieError>;

    /// Removes a movie. Missing ids are not an error; returns whether a row went away.
    async fn delete(&self, id: MovieId) -> Result<bool, MovieError>;
}

/// Whether `movie` matches an already trimmed and lowercased search term.
#[must_use]
pub fn matches_term(movie: &Movie, term: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(term);

    contains(&movie.name)
        || contains(&movie.language)
        || contains(&movie.release_year)
        || contains(&movie.description)
        || contains(&movie.rating)
        || movie.genre.iter().any(|g| contains(g))
        || movie.cast.iter().any(|c| contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            id: MovieId::new(1),
            name: "Inception".to_string(),
            release_year: "2010".to_string(),
            language: "English".to_string(),
            rating: "PG-13".to_string(),
            description: "Dreams within dreams".to_string(),
            image_url: "https://example.com/i.jpg".to_string(),
            watch_url: "https://example.com/w".to_string(),
            genre: vec!["Sci-Fi".to_string()],
            cast: vec!["Leonardo DiCaprio".to_string()],
        }
    }

    #[test]
    fn test_matches_scalar_fields() {
        let m = movie();
        assert!(matches_term(&m, "incep"));
        assert!(matches_term(&m, "201"));
        assert!(matches_term(&m, "english"));
        assert!(matches_term(&m, "pg-13"));
        assert!(matches_term(&m, "within"));
    }

    #[test]
    fn test_matches_names() {
        let m = movie();
        assert!(matches_term(&m, "sci-fi"));
        assert!(matches_term(&m, "dicaprio"));
        assert!(!matches_term(&m, "comedy"));
    }

    #[test]
    fn test_matching_ignores_urls() {
        assert!(!matches_term(&movie(), "example.com"));
    }
}
