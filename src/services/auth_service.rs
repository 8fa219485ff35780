//! Domain service for credential checks and user creation.
//!
//! Stateless per call; login state lives in the HTTP session.

use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Checks the password of an active user and records the login time.
    ///
    /// Unknown emails, inactive users and wrong passwords all yield `Ok(false)`.
    async fn validate_user(&self, email: &str, password: &str) -> Result<bool, AuthError>;

    /// Creates an active user. `Ok(false)` when the email is already registered.
    async fn create_user(&self, email: &str, password: &str) -> Result<bool, AuthError>;
}
