//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn validate_user(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let is_valid = self.store.verify_user_password(email, password).await?;

        if !is_valid {
            warn!(email = %email, "Failed login attempt");
            return Ok(false);
        }

        self.store.touch_last_login(email).await?;
        info!(email = %email, "User logged in");

        Ok(true)
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let created = self
            .store
            .create_user(email, password, &self.security)
            .await?;

        if created {
            info!(email = %email, "User registered");
        }

        Ok(created)
    }
}
