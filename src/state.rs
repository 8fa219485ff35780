use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ImageService, LegacyCatalog, MovieService, ReconcileReport, ReconcileService,
    SeaOrmAuthService, SeaOrmMovieService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub movie_service: Arc<dyn MovieService>,

    pub auth_service: Arc<dyn AuthService>,

    pub image_service: Arc<ImageService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let movie_service =
            Arc::new(SeaOrmMovieService::new(store.clone())) as Arc<dyn MovieService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let image_service = Arc::new(ImageService::new(&config.uploads));

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            movie_service,
            auth_service,
            image_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Reconciler over the current store, with the legacy file loaded if one exists.
    pub async fn reconcile_service(&self) -> ReconcileService {
        let config = self.config().await;

        let legacy = match LegacyCatalog::load(&config.legacy) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Ignoring unreadable legacy data: {e:#}");
                None
            }
        };

        ReconcileService::new(
            self.store.clone(),
            legacy,
            config.reconcile.promote_snapshots,
        )
    }

    /// Snapshot reconciliation followed by the empty-catalog seed, as configured.
    /// Must finish before the listener is bound.
    pub async fn run_startup_tasks(&self) -> anyhow::Result<Option<ReconcileReport>> {
        let config = self.config().await;
        let reconciler = self.reconcile_service().await;

        let report = if config.reconcile.run_on_startup {
            Some(reconciler.reconcile().await?)
        } else {
            None
        };

        if config.legacy.seed_when_empty {
            reconciler.seed_if_empty().await?;
        }

        Ok(report)
    }
}
