use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DeleteImageQuery, UploadResponse};

/// POST /upload/image (multipart field `file`)
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {e}")))?
    {
        if !field
            .name()
            .is_some_and(|n| n.eq_ignore_ascii_case("file"))
        {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        let image_path = state.image_service().save_image(&file_name, &bytes).await?;

        return Ok(Json(UploadResponse {
            success: true,
            image_path,
        }));
    }

    Err(ApiError::validation("No file uploaded"))
}

/// DELETE /upload/image?imagePath=/uploads/movies/...
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteImageQuery>,
) -> Result<Json<ApiResponse>, ApiError> {
    if state.image_service().delete_image(&query.image_path).await {
        Ok(Json(ApiResponse::success("Image deleted successfully")))
    } else {
        Err(ApiError::NotFound("Image not found".to_string()))
    }
}
