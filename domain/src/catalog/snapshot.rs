//! Catalog snapshot and the freshness-annotated view handed to callers.

use crate::core::model::Model;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// The set of models reported by one successful listing.
///
/// Snapshots are immutable: a refresh produces a new one and the old one
/// stays valid for whoever still holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSnapshot {
    models: Vec<Model>,
    fetched_at: Option<DateTime<Utc>>,
    valid: bool,
}

impl CatalogSnapshot {
    /// Build a valid snapshot from a backend listing.
    ///
    /// Backend order is preserved; repeated identifiers keep their first
    /// occurrence.
    pub fn new(models: Vec<Model>) -> Self {
        Self::with_fetch_time(models, Utc::now())
    }

    pub fn with_fetch_time(models: Vec<Model>, fetched_at: DateTime<Utc>) -> Self {
        let mut seen = HashSet::with_capacity(models.len());
        let models = models
            .into_iter()
            .filter(|m| seen.insert(m.as_str().to_string()))
            .collect();
        Self {
            models,
            fetched_at: Some(fetched_at),
            valid: true,
        }
    }

    /// The "never fetched" snapshot
    pub fn empty() -> Self {
        Self {
            models: Vec::new(),
            fetched_at: None,
            valid: false,
        }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model_ids(&self) -> Vec<String> {
        self.models.iter().map(|m| m.as_str().to_string()).collect()
    }

    pub fn fetch_time(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Resolve a requested identifier to the catalog's spelling of it.
    ///
    /// An exact match wins over the `:latest` alias.
    pub fn resolve(&self, requested: &str) -> Option<&Model> {
        let requested = requested.trim();
        self.models
            .iter()
            .find(|m| m.as_str() == requested)
            .or_else(|| self.models.iter().find(|m| m.matches(requested)))
    }

    pub fn contains(&self, requested: &str) -> bool {
        self.resolve(requested).is_some()
    }
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Whether a view reflects the latest listing attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Freshness {
    Fresh,
    /// The last refresh failed; `reason` is the failure that was absorbed.
    Stale { reason: String },
}

/// A snapshot as returned to a caller, with its freshness annotation.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    snapshot: Arc<CatalogSnapshot>,
    freshness: Freshness,
}

impl CatalogView {
    pub fn fresh(snapshot: Arc<CatalogSnapshot>) -> Self {
        Self {
            snapshot,
            freshness: Freshness::Fresh,
        }
    }

    pub fn stale(snapshot: Arc<CatalogSnapshot>, reason: impl Into<String>) -> Self {
        Self {
            snapshot,
            freshness: Freshness::Stale {
                reason: reason.into(),
            },
        }
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    pub fn models(&self) -> &[Model] {
        self.snapshot.models()
    }

    pub fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.freshness, Freshness::Stale { .. })
    }

    pub fn stale_reason(&self) -> Option<&str> {
        match &self.freshness {
            Freshness::Stale { reason } => Some(reason),
            Freshness::Fresh => None,
        }
    }
}
