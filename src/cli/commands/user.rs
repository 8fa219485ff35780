//! Create user command handler

use crate::api::validation::{validate_email, validate_password};
use crate::config::Config;
use crate::db::Store;

pub async fn cmd_create_user(config: &Config, email: &str, password: &str) -> anyhow::Result<()> {
    let email = validate_email(email).map_err(|e| anyhow::anyhow!("{e}"))?;
    let password = validate_password(password).map_err(|e| anyhow::anyhow!("{e}"))?;

    let store = Store::new(&config.general.database_path).await?;

    if store.create_user(email, password, &config.security).await? {
        println!("✓ Created user {email}");
    } else {
        println!("User {email} already exists");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> Config {
        let mut config = Config::default();
        config.general.database_path = "sqlite::memory:".to_string();
        config
    }

    #[tokio::test]
    async fn test_rejects_invalid_credentials_before_connecting() {
        let config = memory_config();

        let err = cmd_create_user(&config, "not-an-email", "secret123")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid email format"));

        let err = cmd_create_user(&config, "critic@example.com", "12345")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least 6 characters"));
    }

    #[tokio::test]
    async fn test_creates_user() {
        let mut config = memory_config();
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;

        assert!(
            cmd_create_user(&config, " critic@example.com ", "popcorn")
                .await
                .is_ok()
        );
    }
}
