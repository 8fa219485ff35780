//! Reader for the bulk `seriesData.json` movie file.
//!
//! The file is a JSON array of objects whose keys are matched without regard
//! to case (`Name`, `Release_Year`, `Genre`, `Cast`, ...). Year and rating may
//! be strings or numbers.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::LegacyConfig;
use crate::models::movie::MovieInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRecord {
    pub name: String,
    pub release_year: String,
    pub language: String,
    pub genre: Vec<String>,
    pub rating: String,
    pub description: String,
    pub cast: Vec<String>,
    pub image_url: String,
    pub watch_url: String,
}

impl LegacyRecord {
    fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let field = |key: &str| {
            object
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        };

        let text = |key: &str| match field(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let names = |key: &str| match field(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
            _ => Vec::new(),
        };

        let name = text("name");
        if name.trim().is_empty() {
            return None;
        }

        Some(Self {
            name,
            release_year: text("release_year"),
            language: text("language"),
            genre: names("genre"),
            rating: text("rating"),
            description: text("description"),
            cast: names("cast"),
            image_url: text("image_url"),
            watch_url: text("watch_url"),
        })
    }

    /// The record as a movie input, lists left as they appear in the file.
    #[must_use]
    pub fn to_input(&self) -> MovieInput {
        MovieInput {
            name: self.name.clone(),
            release_year: self.release_year.clone(),
            language: self.language.clone(),
            genre: self.genre.clone(),
            rating: self.rating.clone(),
            description: self.description.clone(),
            cast: self.cast.clone(),
            image_url: self.image_url.clone(),
            watch_url: self.watch_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LegacyCatalog {
    records: Vec<LegacyRecord>,
}

impl LegacyCatalog {
    /// Load the first configured file that exists. `Ok(None)` when there is none.
    pub fn load(config: &LegacyConfig) -> Result<Option<Self>> {
        for path in config.candidate_paths() {
            if path.exists() {
                return Self::load_from_path(&path).map(Some);
            }
            debug!(path = %path.display(), "Legacy data file not present");
        }

        Ok(None)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read legacy data file: {}", path.display()))?;

        let catalog = Self::from_json(&content)
            .with_context(|| format!("Failed to parse legacy data file: {}", path.display()))?;

        info!(
            path = %path.display(),
            records = catalog.records.len(),
            "Loaded legacy movie data"
        );

        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let values: Vec<Value> =
            serde_json::from_str(content).context("Legacy data must be a JSON array")?;

        let mut records = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            match value.as_object().and_then(LegacyRecord::from_object) {
                Some(record) => records.push(record),
                None => warn!(index, "Skipping legacy entry without a name"),
            }
        }

        Ok(Self { records })
    }

    /// First record whose name equals `name`, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&LegacyRecord> {
        let wanted = name.to_lowercase();
        self.records
            .iter()
            .find(|r| r.name.to_lowercase() == wanted)
    }

    #[must_use]
    pub fn records(&self) -> &[LegacyRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
