//! Change fan-out for observers of the favorites collection.
//!
//! Everything here is single-threaded (`Rc` + `RefCell`): observers live on
//! the UI thread of one execution context. A notification carries no
//! payload; observers re-read the store when they receive one.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked when the collection may have changed.
pub type Listener = Rc<dyn Fn()>;

/// Keeps a listener registered until dropped or cancelled.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// One guard releasing every subscription in `parts`.
    pub fn combine(parts: Vec<Subscription>) -> Self {
        Self::new(move || drop(parts))
    }

    pub fn cancel(mut self) {
        self.release();
    }

    /// Keep the listener registered for as long as its source lives.
    pub fn detach(mut self) {
        self.cancel.take();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Same-context notification channel. Clones share the listener list.
#[derive(Clone, Default)]
pub struct ChangeHub {
    inner: Rc<RefCell<HubInner>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.subscribe_rc(Rc::new(listener))
    }

    pub fn subscribe_rc(&self, listener: Listener) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener));
            id
        };

        let weak: Weak<RefCell<HubInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Call every listener registered at the time of the call, in
    /// registration order. Listeners may subscribe or unsubscribe while
    /// being notified.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notify_reaches_all_listeners() {
        let hub = ChangeHub::new();
        let hits = Rc::new(Cell::new(0));

        let h1 = hits.clone();
        let _a = hub.subscribe(move || h1.set(h1.get() + 1));
        let h2 = hits.clone();
        let _b = hub.subscribe(move || h2.set(h2.get() + 10));

        hub.notify();
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = ChangeHub::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let sub = hub.subscribe(move || h.set(h.get() + 1));
        assert_eq!(hub.listener_count(), 1);

        drop(sub);
        assert_eq!(hub.listener_count(), 0);
        hub.notify();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_cancel_is_explicit_drop() {
        let hub = ChangeHub::new();
        let sub = hub.subscribe(|| {});
        sub.cancel();
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_detach_keeps_listener() {
        let hub = ChangeHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        hub.subscribe(move || h.set(h.get() + 1)).detach();

        hub.notify();
        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub = ChangeHub::new();
        let sub = hub.subscribe(|| {});
        drop(hub);
        drop(sub);
    }

    #[test]
    fn test_listener_can_unsubscribe_during_notify() {
        let hub = ChangeHub::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let slot_inner = slot.clone();
        let h = hits.clone();
        let sub = hub.subscribe(move || {
            h.set(h.get() + 1);
            slot_inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        hub.notify();
        hub.notify();
        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_combine_releases_every_part() {
        let first = ChangeHub::new();
        let second = ChangeHub::new();
        let combined = Subscription::combine(vec![first.subscribe(|| {}), second.subscribe(|| {})]);
        assert_eq!(first.listener_count() + second.listener_count(), 2);
        drop(combined);
        assert_eq!(first.listener_count() + second.listener_count(), 0);
    }
}
