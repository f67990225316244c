use std::time::Duration;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wanderlens_core::Timer;

use crate::events::describe_js_error;

/// `setTimeout` / `clearTimeout` on the page's window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

/// A registered timeout. Owns the callback, so cancelling frees it; dropping
/// a handle before its timeout fires disarms the timeout.
pub struct TimeoutHandle {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

/// Timeout delays are `i32` milliseconds in the DOM API.
pub(crate) fn delay_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

impl Timer for BrowserTimer {
    /// None when the timeout could not be registered.
    type Handle = Option<TimeoutHandle>;

    fn schedule(&self, delay: Duration, effect: Box<dyn FnOnce()>) -> Option<TimeoutHandle> {
        let Some(window) = web_sys::window() else {
            warn!("No window to schedule a timeout on");
            return None;
        };

        let callback = Closure::once(move || effect());
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_millis(delay),
        ) {
            Ok(id) => Some(TimeoutHandle {
                id,
                _callback: callback,
            }),
            Err(e) => {
                warn!("Failed to schedule timeout: {}", describe_js_error(&e));
                None
            }
        }
    }

    fn cancel(&self, handle: Option<TimeoutHandle>) {
        let Some(handle) = handle else {
            return;
        };
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle.id);
        }
    }
}
