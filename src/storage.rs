//! `window.localStorage` as a favorites backend.

use wasm_bindgen::JsCast;
use wanderlens_core::favorites::Listener;
use wanderlens_core::{KeyValueStorage, Result, Subscription, WanderLensError};

use crate::events::{describe_js_error, listen};

/// The origin's `localStorage`. Private browsing modes and sandboxed frames
/// may deny access; every call then fails with `WanderLensError::Storage`
/// and the store degrades to an empty, non-persistent collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| WanderLensError::Storage("no window".to_string()))?;
        window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| WanderLensError::Storage("localStorage unavailable".to_string()))
    }
}

fn storage_error(value: wasm_bindgen::JsValue) -> WanderLensError {
    WanderLensError::Storage(describe_js_error(&value))
}

/// Whether a `storage` event for `event_key` concerns `watched`. A null key
/// means another tab called `localStorage.clear()`.
pub(crate) fn concerns_key(event_key: Option<&str>, watched: &str) -> bool {
    match event_key {
        Some(key) => key == watched,
        None => true,
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::storage()?.remove_item(key).map_err(storage_error)
    }

    /// Browsers fire `storage` only in the other tabs of an origin, which is
    /// exactly the cross-context signal the store wants.
    fn watch(&self, key: &str, listener: Listener) -> Option<Subscription> {
        let window = web_sys::window()?;
        let key = key.to_string();
        listen(&window, "storage", move |event| {
            let Some(event) = event.dyn_ref::<web_sys::StorageEvent>() else {
                return;
            };
            if concerns_key(event.key().as_deref(), &key) {
                listener();
            }
        })
    }
}
