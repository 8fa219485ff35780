use crate::config::UploadsConfig;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

/// URL prefix under which the uploads directory is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

const MOVIE_IMAGES_DIR: &str = "movies";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("No file uploaded")]
    Empty,

    #[error("File size exceeds the {max_bytes} byte limit")]
    TooLarge { max_bytes: usize },

    #[error("File type '{0}' is not allowed")]
    UnsupportedExtension(String),

    #[error("Failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores uploaded movie images below the uploads directory.
pub struct ImageService {
    uploads_dir: PathBuf,
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl ImageService {
    #[must_use]
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            uploads_dir: PathBuf::from(&config.uploads_path),
            max_file_size: config.max_file_size_bytes,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Write the file under a fresh name and return its public path,
    /// e.g. `/uploads/movies/<uuid>.png`.
    pub async fn save_image(&self, file_name: &str, bytes: &[u8]) -> Result<String, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        if bytes.len() > self.max_file_size {
            return Err(ImageError::TooLarge {
                max_bytes: self.max_file_size,
            });
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !self.allowed_extensions.contains(&extension) {
            return Err(ImageError::UnsupportedExtension(extension));
        }

        let dir = self.uploads_dir.join(MOVIE_IMAGES_DIR);
        fs::create_dir_all(&dir).await?;

        let stored_name = format!("{}.{extension}", uuid::Uuid::new_v4());
        let file_path = dir.join(&stored_name);
        fs::write(&file_path, bytes).await?;

        info!(path = %file_path.display(), size = bytes.len(), "Saved uploaded image");

        Ok(format!("{UPLOADS_URL_PREFIX}{MOVIE_IMAGES_DIR}/{stored_name}"))
    }

    /// Remove a previously saved image. Returns whether a file was deleted.
    pub async fn delete_image(&self, image_path: &str) -> bool {
        let Some(path) = self.resolve(image_path) else {
            return false;
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted image");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to delete image");
                false
            }
        }
    }

    /// Map a public `/uploads/...` path onto the uploads directory.
    fn resolve(&self, image_path: &str) -> Option<PathBuf> {
        let relative = image_path.trim().strip_prefix(UPLOADS_URL_PREFIX)?;
        let relative = Path::new(relative);

        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if relative.as_os_str().is_empty() || !only_normal {
            return None;
        }

        Some(self.uploads_dir.join(relative))
    }
}
