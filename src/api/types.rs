use serde::{Deserialize, Serialize};

use crate::models::movie::Movie;

/// `{success, message}` body used by the auth and upload endpoints and by every error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MovieResponse {
    pub message: String,
    pub movie: Movie,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(rename = "imagePath")]
    pub image_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageQuery {
    #[serde(rename = "imagePath", alias = "image_path", default)]
    pub image_path: String,
}
