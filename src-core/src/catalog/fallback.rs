//! Layered catalog: a primary source backed by the bundled snapshot.
//!
//! Architecture:
//! 1. Ask the primary provider (normally `HttpCatalogProvider`)
//! 2. On any error, log it and answer from `StaticCatalog`
//! 3. Sanitize whatever comes back so the query engine sees valid records
//!
//! The UI therefore never renders empty because of a transient network failure.

use tracing::{error, warn};

use crate::error::Result;

use super::provider::CatalogProvider;
use super::query::{self, categories, featured, find_by_id};
use super::types::{Activity, FilterSpec};
use super::validation::sanitize_catalog;

/// Snapshot compiled into the binary from `src-core/data/activities.json`.
const BUNDLED_CATALOG: &str = include_str!("../../data/activities.json");

/// An in-memory catalog answering every request with the query engine.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    activities: Vec<Activity>,
}

impl StaticCatalog {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities: sanitize_catalog(activities),
        }
    }

    /// The snapshot shipped with the app.
    pub fn bundled() -> Self {
        match serde_json::from_str::<Vec<Activity>>(BUNDLED_CATALOG) {
            Ok(activities) => Self::new(activities),
            Err(e) => {
                error!("Bundled catalog is invalid: {}", e);
                Self::default()
            }
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn matching(&self, spec: &FilterSpec) -> Vec<Activity> {
        query::query(&self.activities, spec).into_iter().cloned().collect()
    }

    pub fn by_id(&self, id: &str) -> Option<Activity> {
        find_by_id(&self.activities, id).cloned()
    }

    pub fn featured(&self, limit: usize) -> Vec<Activity> {
        featured(&self.activities, limit).into_iter().cloned().collect()
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.activities)
    }
}

impl CatalogProvider for StaticCatalog {
    async fn fetch_activities(&self, spec: &FilterSpec) -> Result<Vec<Activity>> {
        Ok(self.matching(spec))
    }

    async fn fetch_activity_by_id(&self, id: &str) -> Result<Option<Activity>> {
        Ok(self.by_id(id))
    }

    async fn fetch_featured(&self, limit: usize) -> Result<Vec<Activity>> {
        Ok(StaticCatalog::featured(self, limit))
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        Ok(StaticCatalog::categories(self))
    }
}

/// Primary provider with a static fallback. Its inherent methods never fail.
pub struct FallbackCatalog<P> {
    primary: P,
    fallback: StaticCatalog,
}

impl<P: CatalogProvider> FallbackCatalog<P> {
    pub fn new(primary: P, fallback: StaticCatalog) -> Self {
        Self { primary, fallback }
    }

    /// Wrap `primary` with the bundled snapshot.
    pub fn with_bundled(primary: P) -> Self {
        Self::new(primary, StaticCatalog::bundled())
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Activities matching `spec`. Primary results are re-filtered locally so
    /// a server that ignores a filter still yields a consistent list.
    pub async fn activities(&self, spec: &FilterSpec) -> Vec<Activity> {
        match self.primary.fetch_activities(spec).await {
            Ok(activities) => {
                let activities = sanitize_catalog(activities);
                query::query(&activities, spec).into_iter().cloned().collect()
            }
            Err(e) => {
                warn!("Failed to fetch activities: {}, using bundled catalog", e);
                self.fallback.matching(spec)
            }
        }
    }

    pub async fn activity_by_id(&self, id: &str) -> Option<Activity> {
        match self.primary.fetch_activity_by_id(id).await {
            Ok(activity) => activity,
            Err(e) => {
                warn!("Failed to fetch activity {}: {}, using bundled catalog", id, e);
                self.fallback.by_id(id)
            }
        }
    }

    pub async fn featured(&self, limit: usize) -> Vec<Activity> {
        match self.primary.fetch_featured(limit).await {
            Ok(activities) => {
                let activities = sanitize_catalog(activities);
                featured(&activities, limit).into_iter().cloned().collect()
            }
            Err(e) => {
                warn!("Failed to fetch featured activities: {}, using bundled catalog", e);
                self.fallback.featured(limit)
            }
        }
    }

    pub async fn categories(&self) -> Vec<String> {
        match self.primary.fetch_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                warn!("Failed to fetch categories: {}, using bundled catalog", e);
                self.fallback.categories()
            }
        }
    }
}

impl<P: CatalogProvider> CatalogProvider for FallbackCatalog<P> {
    async fn fetch_activities(&self, spec: &FilterSpec) -> Result<Vec<Activity>> {
        Ok(self.activities(spec).await)
    }

    async fn fetch_activity_by_id(&self, id: &str) -> Result<Option<Activity>> {
        Ok(self.activity_by_id(id).await)
    }

    async fn fetch_featured(&self, limit: usize) -> Result<Vec<Activity>> {
        Ok(FallbackCatalog::featured(self, limit).await)
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        Ok(FallbackCatalog::categories(self).await)
    }
}
