use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use std::sync::Arc;

use super::{ApiError, AppState, MessageResponse, MovieResponse, SearchQuery};
use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieInput};

/// GET /movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    Ok(Json(state.movie_service().list().await?))
}

/// GET /movies/search?q=term
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let term = query.q.unwrap_or_default();
    Ok(Json(state.movie_service().search(&term).await?))
}

/// GET /movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Movie>, ApiError> {
    Ok(Json(state.movie_service().get(MovieId::new(id)).await?))
}

/// POST /movies
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(input): Json<MovieInput>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state.movie_service().add(input).await?;

    Ok(Json(MovieResponse {
        message: "Movie added successfully".to_string(),
        movie,
    }))
}

/// POST /movies/with-image
///
/// Multipart form with the movie fields, repeated `genre` / `cast` fields and an
/// optional image file. A stored image replaces `image_url`.
pub async fn add_movie_with_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<MovieResponse>, ApiError> {
    let mut input = MovieInput::default();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_lowercase).unwrap_or_default();

        if matches!(name.as_str(), "image_file" | "imagefile" | "file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;
            if !bytes.is_empty() {
                image = Some((file_name, bytes.to_vec()));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::validation(format!("Invalid form field '{name}': {e}")))?;

        match name.trim_end_matches("[]") {
            "name" => input.name = value,
            "release_year" | "releaseyear" => input.release_year = value,
            "language" => input.language = value,
            "rating" => input.rating = value,
            "description" => input.description = value,
            "image_url" | "imageurl" => input.image_url = value,
            "watch_url" | "watchurl" => input.watch_url = value,
            "genre" | "genres" => input.genre.push(value),
            "cast" => input.cast.push(value),
            _ => {}
        }
    }

    let images = state.image_service();
    let saved = match image {
        Some((file_name, bytes)) => {
            let path = images.save_image(&file_name, &bytes).await?;
            input.image_url.clone_from(&path);
            Some(path)
        }
        None => None,
    };

    match state.movie_service().add(input).await {
        Ok(movie) => Ok(Json(MovieResponse {
            message: "Movie added successfully".to_string(),
            movie,
        })),
        Err(e) => {
            if let Some(path) = saved {
                images.delete_image(&path).await;
            }
            Err(e.into())
        }
    }
}

/// PUT /movies/{id}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<MovieInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .movie_service()
        .update(MovieId::new(id), input)
        .await?;

    Ok(Json(MessageResponse::new("Movie updated successfully")))
}

/// DELETE /movies/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.movie_service().delete(MovieId::new(id)).await?;

    Ok(Json(MessageResponse::new("Movie deleted successfully")))
}
