//! Keeps the JSON snapshots on `movies` in step with the join tables.
//!
//! Runs once before the server binds and on demand from the CLI. A second run
//! over unchanged data writes nothing.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::Store;
use crate::domain::{MovieId, NameList, snapshot};
use crate::entities::movies;
use crate::models::movie::normalize_names;
use crate::services::legacy::LegacyCatalog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub examined: usize,
    /// Movies whose snapshot was rewritten from join rows.
    pub rewritten: usize,
    /// Movies whose snapshots were filled in from the legacy file.
    pub backfilled: usize,
    /// Lists turned into join rows from a snapshot.
    pub promoted: usize,
}

impl ReconcileReport {
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.rewritten + self.backfilled + self.promoted
    }
}

pub struct ReconcileService {
    store: Store,
    legacy: Option<LegacyCatalog>,
    promote_snapshots: bool,
}

impl ReconcileService {
    #[must_use]
    pub const fn new(store: Store, legacy: Option<LegacyCatalog>, promote_snapshots: bool) -> Self {
        Self {
            store,
            legacy,
            promote_snapshots,
        }
    }

    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let rows = self.store.list_movie_rows().await?;
        let genre_links = self.store.all_linked_names(NameList::Genre).await?;
        let cast_links = self.store.all_linked_names(NameList::Cast).await?;

        let mut report = ReconcileReport::default();

        for row in rows {
            report.examined += 1;

            let genres = genre_links.get(&row.id);
            let casts = cast_links.get(&row.id);

            let mut genre_json = genres
                .map(|names| snapshot::serialize_names(names))
                .filter(|json| *json != row.genre_json);
            let mut cast_json = casts
                .map(|names| snapshot::serialize_names(names))
                .filter(|json| *json != row.cast_json);

            let mut backfilled = false;
            if genres.is_none() && casts.is_none() && snapshot::is_empty(&row.genre_json) {
                if let Some(record) = self.legacy.as_ref().and_then(|l| l.find_by_name(&row.name)) {
                    genre_json = Some(snapshot::serialize_names(&record.genre))
                        .filter(|json| *json != row.genre_json);
                    cast_json = Some(snapshot::serialize_names(&record.cast))
                        .filter(|json| *json != row.cast_json);
                    backfilled = genre_json.is_some() || cast_json.is_some();
                }
            }

            let id = MovieId::new(row.id);
            let changed = genre_json.is_some() || cast_json.is_some();

            let current_genre = genre_json.clone().unwrap_or_else(|| row.genre_json.clone());
            let current_cast = cast_json.clone().unwrap_or_else(|| row.cast_json.clone());

            if changed {
                debug!(movie_id = %id, name = %row.name, "Updating movie snapshots");
                self.store
                    .update_movie_snapshots(id, genre_json, cast_json)
                    .await?;

                if backfilled {
                    report.backfilled += 1;
                } else {
                    report.rewritten += 1;
                }
            }

            if self.promote_snapshots {
                if genres.is_none() {
                    self.promote(&row, NameList::Genre, &current_genre, &mut report)
                        .await?;
                }
                if casts.is_none() {
                    self.promote(&row, NameList::Cast, &current_cast, &mut report)
                        .await?;
                }
            }
        }

        info!(
            examined = report.examined,
            rewritten = report.rewritten,
            backfilled = report.backfilled,
            promoted = report.promoted,
            "Snapshot reconciliation finished"
        );

        Ok(report)
    }

    /// Create join rows for one list from its snapshot.
    async fn promote(
        &self,
        row: &movies::Model,
        list: NameList,
        stored: &str,
        report: &mut ReconcileReport,
    ) -> Result<()> {
        let names = normalize_names(&snapshot::parse_names(stored));
        if names.is_empty() {
            return Ok(());
        }

        let id = MovieId::new(row.id);
        self.store.link_movie_list(id, list, &names).await?;

        // Keep the snapshot byte-equal to what the join rows will serialize to.
        let json = snapshot::serialize_names(&names);
        if json != stored {
            let (genre_json, cast_json) = match list {
                NameList::Genre => (Some(json), None),
                NameList::Cast => (None, Some(json)),
            };
            self.store
                .update_movie_snapshots(id, genre_json, cast_json)
                .await?;
            report.rewritten += 1;
        }

        report.promoted += 1;
        debug!(movie_id = %id, list = %list, count = names.len(), "Promoted snapshot to join rows");
        Ok(())
    }

    /// Insert every legacy record as a snapshot-only movie when the catalog is empty.
    /// Returns the number of movies inserted.
    pub async fn seed_if_empty(&self) -> Result<usize> {
        let Some(legacy) = &self.legacy else {
            debug!("No legacy data available, skipping seed");
            return Ok(0);
        };

        if self.store.count_movies().await? > 0 {
            debug!("Catalog already has movies, skipping seed");
            return Ok(0);
        }

        info!(records = legacy.len(), "Seeding empty catalog from legacy data");

        let mut inserted = 0;
        for record in legacy.records() {
            match self.store.insert_movie(&record.to_input()).await {
                Ok(_) => inserted += 1,
                Err(e) => warn!(name = %record.name, "Failed to seed movie: {e:#}"),
            }
        }

        info!(inserted, "Legacy seed completed");
        Ok(inserted)
    }
}
