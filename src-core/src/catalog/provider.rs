use crate::error::{Result, WanderLensError};

use super::types::{Activity, FilterSpec};

/// A source of catalog data.
///
/// Implemented by the HTTP client, the bundled snapshot, and the fallback
/// wrapper that layers the two, so callers never care which one answered.
/// Futures are not required to be `Send`: in the browser everything runs on
/// the single UI thread.
#[allow(async_fn_in_trait)]
pub trait CatalogProvider {
    /// Activities matching `spec`, in catalog order.
    async fn fetch_activities(&self, spec: &FilterSpec) -> Result<Vec<Activity>>;

    /// A single activity, or None if the id is unknown.
    async fn fetch_activity_by_id(&self, id: &str) -> Result<Option<Activity>>;

    /// The `limit` most relevant activities.
    async fn fetch_featured(&self, limit: usize) -> Result<Vec<Activity>>;

    /// Category names, starting with the "All Categories" sentinel.
    async fn fetch_categories(&self) -> Result<Vec<String>>;
}

/// An absent provider fails every request, so a fallback layer answers.
impl<P: CatalogProvider> CatalogProvider for Option<P> {
    async fn fetch_activities(&self, spec: &FilterSpec) -> Result<Vec<Activity>> {
        match self {
            Some(provider) => provider.fetch_activities(spec).await,
            None => Err(unavailable()),
        }
    }

    async fn fetch_activity_by_id(&self, id: &str) -> Result<Option<Activity>> {
        match self {
            Some(provider) => provider.fetch_activity_by_id(id).await,
            None => Err(unavailable()),
        }
    }

    async fn fetch_featured(&self, limit: usize) -> Result<Vec<Activity>> {
        match self {
            Some(provider) => provider.fetch_featured(limit).await,
            None => Err(unavailable()),
        }
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        match self {
            Some(provider) => provider.fetch_categories().await,
            None => Err(unavailable()),
        }
    }
}

fn unavailable() -> WanderLensError {
    WanderLensError::Transport("no catalog provider configured".to_string())
}
