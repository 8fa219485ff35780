use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub uploads: UploadsConfig,

    pub legacy: LegacyConfig,

    pub reconcile: ReconcileConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/livemovies.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Set the Secure flag on the session cookie. Turn off for plain HTTP development.
    pub secure_cookies: bool,

    pub session_cookie_name: String,

    /// Sessions expire after this many days without a request.
    pub session_idle_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            secure_cookies: false,
            session_cookie_name: "LMDB.Session".to_string(),
            session_idle_days: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Directory served under `/uploads`.
    pub uploads_path: String,

    pub max_file_size_bytes: usize,

    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            uploads_path: "uploads".to_string(),
            max_file_size_bytes: 5 * 1024 * 1024,
            allowed_extensions: ["jpg", "jpeg", "png", "webp", "gif", "svg"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Bulk movie data file used to backfill and seed the catalog.
    pub data_path: String,

    pub fallback_path: String,

    /// Insert every legacy record when the catalog holds no movies.
    pub seed_when_empty: bool,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            data_path: "Data/seriesData.json".to_string(),
            fallback_path: "api/seriesData.json".to_string(),
            seed_when_empty: true,
        }
    }
}

impl LegacyConfig {
    /// Candidate files in lookup order.
    #[must_use]
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        [&self.data_path, &self.fallback_path]
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub run_on_startup: bool,

    /// Create join rows from the JSON snapshot for movies that have none.
    pub promote_snapshots: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            run_on_startup: true,
            promote_snapshots: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    /// Reject movie and upload writes from sessions that are not logged in.
    pub require_admin_for_writes: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            require_admin_for_writes: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("livemovies").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".livemovies").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.uploads.uploads_path.trim().is_empty() {
            anyhow::bail!("Uploads path cannot be empty");
        }

        if self.uploads.max_file_size_bytes == 0 {
            anyhow::bail!("Upload size limit must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.session_cookie_name, "LMDB.Session");
        assert_eq!(config.server.session_idle_days, 2);
        assert_eq!(config.uploads.max_file_size_bytes, 5 * 1024 * 1024);
        assert!(config.legacy.seed_when_empty);
        assert!(!config.reconcile.promote_snapshots);
        assert!(!config.security.require_admin_for_writes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();

        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[uploads]"));
        assert!(toml_str.contains("[legacy]"));
        assert!(toml_str.contains("[reconcile]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[server]\nport = 8080\n").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.session_cookie_name, "LMDB.Session");
        assert_eq!(config.legacy.data_path, "Data/seriesData.json");
    }

    #[test]
    fn test_validate_rejects_zero_upload_limit() {
        let mut config = Config::default();
        config.uploads.max_file_size_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_legacy_candidate_paths_skip_blank() {
        let legacy = LegacyConfig {
            fallback_path: "  ".to_string(),
            ..LegacyConfig::default()
        };

        assert_eq!(
            legacy.candidate_paths(),
            vec![PathBuf::from("Data/seriesData.json")]
        );
    }
}
