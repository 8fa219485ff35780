use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{MovieId, NameList};
use crate::entities::movies;
use crate::models::movie::{Movie, MovieInput};

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = is_memory_url(db_url);

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        // Every pooled connection to `:memory:` opens its own empty database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections.max(1), min_connections.min(max_connections))
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    fn cast_repo(&self) -> repositories::cast::CastRepository {
        repositories::cast::CastRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn list_movie_rows(&self) -> Result<Vec<movies::Model>> {
        self.movie_repo().list_all().await
    }

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        let rows = self.movie_repo().list_all().await?;
        Ok(rows
            .into_iter()
            .map(repositories::movie::from_snapshot)
            .collect())
    }

    pub async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        self.movie_repo().get_resolved(id).await
    }

    pub async fn count_movies(&self) -> Result<u64> {
        self.movie_repo().count().await
    }

    pub async fn insert_movie(&self, input: &MovieInput) -> Result<movies::Model> {
        self.movie_repo().insert(input).await
    }

    pub async fn link_movie_names(&self, id: MovieId, input: &MovieInput) -> Result<()> {
        self.movie_repo().link_names(id, input).await
    }

    pub async fn link_movie_list(
        &self,
        id: MovieId,
        list: NameList,
        names: &[String],
    ) -> Result<()> {
        self.movie_repo().link_list(id, list, names).await
    }

    pub async fn replace_movie(&self, id: MovieId, input: &MovieInput) -> Result<bool> {
        self.movie_repo().replace(id, input).await
    }

    pub async fn delete_movie(&self, id: MovieId) -> Result<bool> {
        self.movie_repo().delete(id).await
    }

    pub async fn linked_names(&self, id: MovieId, list: NameList) -> Result<Vec<String>> {
        self.movie_repo().linked_names(id, list).await
    }

    pub async fn all_linked_names(&self, list: NameList) -> Result<HashMap<i32, Vec<String>>> {
        self.movie_repo().all_linked_names(list).await
    }

    pub async fn update_movie_snapshots(
        &self,
        id: MovieId,
        genre_json: Option<String>,
        cast_json: Option<String>,
    ) -> Result<()> {
        self.movie_repo()
            .update_snapshots(id, genre_json, cast_json)
            .await
    }

    pub async fn list_genre_names(&self) -> Result<Vec<String>> {
        self.genre_repo().list_names().await
    }

    pub async fn get_or_create_genre(&self, name: &str) -> Result<i32> {
        self.genre_repo().get_or_create(name).await
    }

    pub async fn count_genres(&self) -> Result<u64> {
        self.genre_repo().count().await
    }

    pub async fn get_or_create_cast_member(&self, name: &str) -> Result<i32> {
        self.cast_repo().get_or_create(name).await
    }

    pub async fn count_cast_members(&self) -> Result<u64> {
        self.cast_repo().count().await
    }

    pub async fn get_user(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn touch_last_login(&self, email: &str) -> Result<()> {
        self.user_repo().touch_last_login(email).await
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<bool> {
        self.user_repo().create(email, password, config).await
    }
}

fn is_memory_url(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_memory_url() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url(":memory:"));
        assert!(is_memory_url("sqlite://file?mode=memory"));
        assert!(!is_memory_url("sqlite:data/livemovies.db"));
    }

    #[tokio::test]
    async fn test_memory_store_migrates_and_seeds_genres() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();

        let genres = store.list_genre_names().await.unwrap();
        assert_eq!(genres.len(), 11);
        assert!(genres.contains(&"Sci-Fi".to_string()));

        let admin = store.get_user("admin@movieapp.com").await.unwrap();
        assert!(admin.is_some_and(|u| u.is_active));
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = Store::new("sqlite::memory:").await.unwrap();

        let first = store.get_or_create_genre("Western").await.unwrap();
        let second = store.get_or_create_genre("Western").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.count_genres().await.unwrap(), 12);

        let a = store.get_or_create_cast_member("Tom Hanks").await.unwrap();
        let b = store.get_or_create_cast_member("Tom Hanks").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.count_cast_members().await.unwrap(), 1);
    }
}
