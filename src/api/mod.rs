use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::services::{AuthService, ImageService, MovieService};
use crate::state::SharedState;

pub mod auth;
mod error;
mod movies;
mod observability;
mod types;
mod upload;
pub(crate) mod validation;

pub use error::ApiError;
pub use types::*;

/// Room for multipart framing and the text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn movie_service(&self) -> &Arc<dyn MovieService> {
        &self.shared.movie_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<ImageService> {
        &self.shared.image_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let config = state.config().read().await.clone();

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.server.session_cookie_name.clone())
        .with_secure(config.server.secure_cookies)
        .with_http_only(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            config.server.session_idle_days.max(1),
        )));

    let upload_limit = DefaultBodyLimit::max(
        config
            .uploads
            .max_file_size_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    );

    let api_router = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/register", post(auth::register))
        .route("/auth/check-auth", get(auth::check_auth))
        .route("/movies", get(movies::list_movies).post(movies::add_movie))
        .route("/movies/search", get(movies::search_movies))
        .route(
            "/movies/with-image",
            post(movies::add_movie_with_image).layer(upload_limit.clone()),
        )
        .route(
            "/movies/{id}",
            get(movies::get_movie)
                .put(movies::update_movie)
                .delete(movies::delete_movie),
        )
        .route(
            "/upload/image",
            post(upload::upload_image)
                .layer(upload_limit)
                .delete(upload::delete_image),
        )
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::guard_writes,
        ))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if config.server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        // Session cookies need credentials, which rule out wildcard methods/headers.
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service("/uploads", ServeDir::new(&config.uploads.uploads_path))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_metrics))
}
