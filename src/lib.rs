//! Browser bindings for WanderLens.
//!
//! Binds the platform-neutral pieces of `wanderlens-core` to the page:
//! favorites persist in `localStorage`, other tabs are heard through
//! `storage` events, debounced filter edits run on `setTimeout`, and Leptos
//! hooks expose all of it to UI components.

pub mod events;
pub mod hooks;
pub mod logging;
pub mod storage;
pub mod timer;

use std::rc::Rc;

use wanderlens_core::{Config, FallbackCatalog, FavoritesStore, HttpCatalogProvider};

pub use events::FAVORITES_CHANGED_EVENT;
pub use hooks::{
    use_activity, use_catalog, use_categories, use_favorites, use_featured, use_filter_navigation,
    use_filter_spec, use_is_favorite, FilterNavigation,
};
pub use logging::init_logging;
pub use storage::LocalStorage;
pub use timer::BrowserTimer;

/// The catalog as seen from the page: the HTTP API, or the bundled snapshot
/// whenever the API cannot answer.
pub type PageCatalog = FallbackCatalog<Option<HttpCatalogProvider>>;

thread_local! {
    static FAVORITES: Rc<FavoritesStore<LocalStorage>> = init_favorites();
    static CATALOG: Rc<PageCatalog> = init_catalog();
}

/// Page configuration. The API base URL can be baked in at build time
/// through `WANDERLENS_API_BASE_URL`.
pub fn app_config() -> Config {
    Config::default().with_api_base_url_override(build_time_api_base_url())
}

fn build_time_api_base_url() -> Option<String> {
    option_env!("WANDERLENS_API_BASE_URL").map(str::to_string)
}

/// The page-wide favorites store. Every surface on the page shares it.
pub fn favorites() -> Rc<FavoritesStore<LocalStorage>> {
    FAVORITES.with(Rc::clone)
}

/// The page-wide catalog.
pub fn catalog() -> Rc<PageCatalog> {
    CATALOG.with(Rc::clone)
}

fn init_favorites() -> Rc<FavoritesStore<LocalStorage>> {
    init_logging();
    let store = Rc::new(FavoritesStore::from_config(LocalStorage, &app_config()));
    // Script on the page that is not built on these hooks still hears about
    // changes made here.
    store
        .subscribe_local(events::dispatch_favorites_changed)
        .detach();
    store
}

fn init_catalog() -> Rc<PageCatalog> {
    init_logging();
    let config = app_config();
    let primary = match HttpCatalogProvider::new(&config) {
        Ok(provider) => Some(provider),
        Err(e) => {
            tracing::error!("Catalog API unavailable, serving bundled data: {}", e);
            None
        }
    };
    Rc::new(FallbackCatalog::with_bundled(primary))
}
