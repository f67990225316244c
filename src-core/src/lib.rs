//! WanderLens core: activity catalog queries and the client-side favorites
//! store.
//!
//! Nothing in this crate touches a browser API. The `wanderlens` crate binds
//! the storage, timer and change-notification seams to `localStorage`,
//! `setTimeout` and DOM events.

pub mod catalog;
pub mod config;
pub mod debounce;
mod error;
pub mod favorites;

pub use catalog::{
    Activity, CatalogProvider, FallbackCatalog, FilterSpec, HttpCatalogProvider, StaticCatalog,
    ALL_CATEGORIES,
};
pub use config::Config;
pub use debounce::{Debouncer, ManualTimer, Timer, DEFAULT_DEBOUNCE};
pub use error::{Result, WanderLensError};
pub use favorites::{FavoriteEntry, FavoritesStore, KeyValueStorage, MemoryStorage, Subscription};

/// Install the global `tracing` subscriber. The filter comes from `RUST_LOG`
/// and defaults to `info`. Calling it again is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
