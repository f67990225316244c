//! Leptos hooks over the page-wide favorites store, the URL filter state and
//! the catalog.
//!
//! Every hook ties what it registers to the calling component's owner, so
//! listeners and pending timeouts go away with the component.

use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use wasm_bindgen_futures::spawn_local;
use wanderlens_core::catalog::filter_params::{self, CATEGORY_KEY, MIN_RELEVANCE_KEY, SEARCH_KEY};
use wanderlens_core::{Activity, Debouncer, FavoriteEntry, FilterSpec, Timer, ALL_CATEGORIES};

use crate::timer::BrowserTimer;
use crate::{app_config, catalog, favorites};

/// Keep `value` alive until the current owner is cleaned up.
fn hold_until_cleanup<T: 'static>(value: T) {
    let slot = StoredValue::new_local(Some(value));
    on_cleanup(move || {
        slot.try_update_value(|held| held.take());
    });
}

/// The favorites collection, re-read whenever this page or another tab
/// changes it.
pub fn use_favorites() -> ReadSignal<Vec<FavoriteEntry>> {
    let store = favorites();
    let (entries, set_entries) = signal(store.list());

    let reader = Rc::clone(&store);
    hold_until_cleanup(store.subscribe(move || set_entries.set(reader.list())));

    entries
}

/// Whether activity `id` is a favorite, for badges and toggle buttons.
pub fn use_is_favorite(id: impl Into<String>) -> Signal<bool> {
    let id = id.into();
    let entries = use_favorites();
    Signal::derive(move || entries.with(|entries| entries.iter().any(|e| e.id == id)))
}

/// The filter encoded in the current URL's query string.
pub fn use_filter_spec() -> Memo<FilterSpec> {
    let query = use_query_map();
    Memo::new(move |_| {
        query.with(|params| {
            filter_params::from_pairs(
                [CATEGORY_KEY, MIN_RELEVANCE_KEY, SEARCH_KEY]
                    .into_iter()
                    .filter_map(|key| params.get(key).map(|value| (key, value))),
            )
        })
    })
}

/// Pushes filter edits into the URL. Typing goes through
/// [`schedule`](Self::schedule) so only the last edit of a burst navigates;
/// explicit actions use [`apply`](Self::apply).
pub struct FilterNavigation<T: Timer = BrowserTimer> {
    debouncer: Rc<Debouncer<T>>,
    navigate: Rc<dyn Fn(&str)>,
}

impl<T: Timer> Clone for FilterNavigation<T> {
    fn clone(&self) -> Self {
        Self {
            debouncer: Rc::clone(&self.debouncer),
            navigate: Rc::clone(&self.navigate),
        }
    }
}

impl<T: Timer + 'static> FilterNavigation<T> {
    pub fn new(timer: T, delay: Duration, navigate: impl Fn(&str) + 'static) -> Self {
        Self {
            debouncer: Rc::new(Debouncer::new(timer, delay)),
            navigate: Rc::new(navigate),
        }
    }

    /// Navigate to `spec` once edits pause for the debounce window.
    pub fn schedule(&self, spec: &FilterSpec) {
        let navigate = Rc::clone(&self.navigate);
        let path = filter_params::activities_path(spec);
        self.debouncer.schedule(move || navigate(&path));
    }

    /// Navigate to `spec` now, dropping any pending edit.
    pub fn apply(&self, spec: &FilterSpec) {
        self.debouncer.cancel();
        (self.navigate)(&filter_params::activities_path(spec));
    }

    /// Reset every filter.
    pub fn clear(&self) {
        self.apply(&FilterSpec::default());
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

pub fn use_filter_navigation() -> FilterNavigation {
    let navigate = use_navigate();
    let navigation = FilterNavigation::new(BrowserTimer, app_config().debounce(), move |path: &str| {
        navigate(path, Default::default())
    });

    let pending = navigation.clone();
    hold_until_cleanup(wanderlens_core::Subscription::new(move || pending.cancel()));

    navigation
}

/// Re-run `fetch` whenever `source` changes. Only the most recent request
/// may write its result, so a slow response never overwrites a newer one.
fn load<S, T, Fut>(
    initial: T,
    source: impl Fn() -> S + 'static,
    fetch: impl Fn(S) -> Fut + 'static,
) -> (ReadSignal<T>, ReadSignal<bool>)
where
    T: Send + Sync + 'static,
    Fut: Future<Output = T> + 'static,
{
    let (value, set_value) = signal(initial);
    let (loading, set_loading) = signal(true);
    let latest = StoredValue::new(0u64);

    Effect::new(move |_| {
        let request = latest.get_value().wrapping_add(1);
        latest.set_value(request);
        set_loading.set(true);

        let pending = fetch(source());
        spawn_local(async move {
            let result = pending.await;
            if latest.try_get_value() == Some(request) {
                set_value.set(result);
                set_loading.set(false);
            }
        });
    });

    (value, loading)
}

/// Activities matching `spec`, plus a loading flag.
pub fn use_catalog(spec: Memo<FilterSpec>) -> (ReadSignal<Vec<Activity>>, ReadSignal<bool>) {
    load(Vec::new(), move || spec.get(), |spec: FilterSpec| async move {
        catalog().activities(&spec).await
    })
}

/// A single activity for a detail view. None once loaded means not found.
pub fn use_activity(id: impl Into<Signal<String>>) -> (ReadSignal<Option<Activity>>, ReadSignal<bool>) {
    let id = id.into();
    load(None, move || id.get(), |id: String| async move {
        catalog().activity_by_id(&id).await
    })
}

/// The configured number of top-rated activities.
pub fn use_featured() -> (ReadSignal<Vec<Activity>>, ReadSignal<bool>) {
    let limit = app_config().featured_limit;
    load(Vec::new(), move || limit, |limit: usize| async move {
        catalog().featured(limit).await
    })
}

/// Category options for the filter form.
pub fn use_categories() -> ReadSignal<Vec<String>> {
    let (categories, _) = load(
        vec![ALL_CATEGORIES.to_string()],
        || (),
        |_: ()| async move { catalog().categories().await },
    );
    categories
}
