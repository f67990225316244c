//! DOM event plumbing: listener guards and the same-page change event.

use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wanderlens_core::Subscription;

/// Dispatched on `window` after this page changes the favorites. Carries no
/// payload; listeners re-read the store. Page scripts already listen for
/// this name.
pub const FAVORITES_CHANGED_EVENT: &str = "favoritesUpdated";

/// Register `handler` for `event_type` on `target`. The listener is removed
/// when the returned guard is dropped.
pub fn listen(
    target: &web_sys::EventTarget,
    event_type: &'static str,
    handler: impl Fn(web_sys::Event) + 'static,
) -> Option<Subscription> {
    let closure = Closure::<dyn Fn(web_sys::Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref()) {
        warn!("Failed to listen for '{}': {}", event_type, describe_js_error(&e));
        return None;
    }

    let target = target.clone();
    Some(Subscription::new(move || {
        let _ = target.remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref());
    }))
}

/// Call `handler` each time this page changes the favorites.
pub fn on_favorites_changed(handler: impl Fn() + 'static) -> Option<Subscription> {
    let window = web_sys::window()?;
    listen(&window, FAVORITES_CHANGED_EVENT, move |_| handler())
}

pub(crate) fn dispatch_favorites_changed() {
    let Some(window) = web_sys::window() else {
        return;
    };
    match web_sys::CustomEvent::new(FAVORITES_CHANGED_EVENT) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(e) => warn!("Failed to create change event: {}", describe_js_error(&e)),
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
