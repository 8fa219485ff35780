use axum::{
    Json,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{validate_email, validate_password};
use super::{ApiError, ApiResponse, AppState, AuthStatusResponse};

pub const SESSION_IS_ADMIN: &str = "is_admin";
pub const SESSION_ADMIN_EMAIL: &str = "admin_email";
pub const SESSION_LOGIN_TIME: &str = "login_time";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Password")]
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// With `security.require_admin_for_writes` set, mutating requests outside
/// `/auth` need a logged-in session.
pub async fn guard_writes(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let enabled = state
        .config()
        .read()
        .await
        .security
        .require_admin_for_writes;

    let is_write = !matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );

    let is_auth_route = request
        .uri()
        .path()
        .trim_start_matches("/api")
        .starts_with("/auth/");

    if !enabled || !is_write || is_auth_route || is_admin(&session).await {
        return next.run(request).await;
    }

    ApiError::unauthorized("Login required").into_response()
}

async fn is_admin(session: &Session) -> bool {
    matches!(session.get::<bool>(SESSION_IS_ADMIN).await, Ok(Some(true)))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let email = validate_email(&payload.email)?;
    let password = validate_password(&payload.password)?;

    let is_valid = state.auth_service().validate_user(email, password).await?;
    if !is_valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    let login_time = chrono::Utc::now().to_rfc3339();
    for (key, value) in [
        (SESSION_IS_ADMIN, serde_json::Value::Bool(true)),
        (SESSION_ADMIN_EMAIL, serde_json::Value::String(email.to_string())),
        (SESSION_LOGIN_TIME, serde_json::Value::String(login_time)),
    ] {
        session
            .insert(key, value)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    }

    Ok(Json(ApiResponse::success("Login successful")))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;

    Ok(Json(ApiResponse::success("Logout successful")))
}

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let email = validate_email(&payload.email)?;
    let password = validate_password(&payload.password)?;

    if !state.auth_service().create_user(email, password).await? {
        return Err(ApiError::validation("User already exists"));
    }

    Ok(Json(ApiResponse::success("User registered successfully")))
}

/// GET /auth/check-auth
pub async fn check_auth(session: Session) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        is_admin: is_admin(&session).await,
    })
}
