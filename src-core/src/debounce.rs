//! Debounced effects: "run this after a delay, unless something newer
//! replaces it first".
//!
//! The filter UI commits a new filter spec only once the user has paused
//! typing. Each keystroke schedules the commit again, which cancels the one
//! still pending, so only the most recent edit ever fires.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Delay applied to filter edits unless configured otherwise.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A one-shot timer source. The browser crate backs this with
/// `setTimeout`/`clearTimeout`; [`ManualTimer`] drives it by hand.
pub trait Timer {
    type Handle;

    fn schedule(&self, delay: Duration, effect: Box<dyn FnOnce()>) -> Self::Handle;

    /// Cancelling a handle that already fired must be harmless.
    fn cancel(&self, handle: Self::Handle);
}

/// Runs at most one pending effect; scheduling again supersedes it.
pub struct Debouncer<T: Timer> {
    timer: T,
    delay: Duration,
    pending: RefCell<Option<T::Handle>>,
    next_generation: Cell<u64>,
    // Generation of the effect allowed to run. A fired effect whose
    // generation is no longer active does nothing.
    active: Rc<Cell<Option<u64>>>,
}

impl<T: Timer> Debouncer<T> {
    pub fn new(timer: T, delay: Duration) -> Self {
        Self {
            timer,
            delay,
            pending: RefCell::new(None),
            next_generation: Cell::new(0),
            active: Rc::new(Cell::new(None)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Run `effect` after the delay, cancelling whatever was pending.
    pub fn schedule(&self, effect: impl FnOnce() + 'static) {
        self.cancel();

        let mine = self.next_generation.get();
        self.next_generation.set(mine.wrapping_add(1));
        self.active.set(Some(mine));

        let active = Rc::clone(&self.active);
        let handle = self.timer.schedule(
            self.delay,
            Box::new(move || {
                if active.get() == Some(mine) {
                    active.set(None);
                    effect();
                }
            }),
        );
        *self.pending.borrow_mut() = Some(handle);
    }

    /// Drop the pending effect, if any.
    pub fn cancel(&self) {
        self.active.set(None);
        if let Some(handle) = self.pending.borrow_mut().take() {
            self.timer.cancel(handle);
        }
    }

    /// True while a scheduled effect has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.active.get().is_some()
    }
}

impl<T: Timer> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

type Scheduled = (Duration, u64);

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<Scheduled, Box<dyn FnOnce()>>,
}

/// Virtual-time timer for tests and headless use. Nothing runs until
/// [`advance`](ManualTimer::advance) moves the clock past an effect's
/// deadline. Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualTimer {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Move the clock forward, running due effects in deadline order.
    /// Effects may schedule further effects; those run too if they fall due
    /// within the same window.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.borrow().now + by;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                match inner.queue.keys().next().copied() {
                    Some(key) if key.0 <= target => {
                        inner.now = key.0;
                        inner.queue.remove(&key)
                    }
                    _ => None,
                }
            };
            match next {
                Some(effect) => effect(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }
}

impl Timer for ManualTimer {
    type Handle = Scheduled;

    fn schedule(&self, delay: Duration, effect: Box<dyn FnOnce()>) -> Scheduled {
        let mut inner = self.inner.borrow_mut();
        let key = (inner.now + delay, inner.next_id);
        inner.next_id += 1;
        inner.queue.insert(key, effect);
        key
    }

    fn cancel(&self, handle: Scheduled) {
        self.inner.borrow_mut().queue.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (log.clone(), log)
    }

    #[test]
    fn test_effect_runs_after_delay() {
        let timer = ManualTimer::new();
        let debouncer = Debouncer::new(timer.clone(), DEFAULT_DEBOUNCE);
        let (log, sink) = recorder();

        debouncer.schedule(move || sink.borrow_mut().push("apply".to_string()));
        assert!(debouncer.is_pending());

        timer.advance(Duration::from_millis(499));
        assert!(log.borrow().is_empty());

        timer.advance(Duration::from_millis(1));
        assert_eq!(*log.borrow(), vec!["apply"]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_new_input_supersedes_pending() {
        let timer = ManualTimer::new();
        let debouncer = Debouncer::new(timer.clone(), DEFAULT_DEBOUNCE);
        let (log, sink) = recorder();

        for text in ["s", "sa", "sai", "sailing"] {
            let sink = sink.clone();
            let text = text.to_string();
            debouncer.schedule(move || sink.borrow_mut().push(text));
            timer.advance(Duration::from_millis(200));
        }
        assert!(log.borrow().is_empty());
        assert_eq!(timer.pending_count(), 1);

        timer.advance(Duration::from_millis(300));
        assert_eq!(*log.borrow(), vec!["sailing"]);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let timer = ManualTimer::new();
        let debouncer = Debouncer::new(timer.clone(), Duration::from_millis(100));
        let (log, sink) = recorder();

        debouncer.schedule(move || sink.borrow_mut().push("apply".to_string()));
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        timer.advance(Duration::from_secs(1));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_stale_effect_ignored_even_if_timer_cannot_cancel() {
        /// Timer whose cancel is a no-op, like clearTimeout on a fired id.
        struct LeakyTimer(ManualTimer);

        impl Timer for LeakyTimer {
            type Handle = Scheduled;
            fn schedule(&self, delay: Duration, effect: Box<dyn FnOnce()>) -> Scheduled {
                self.0.schedule(delay, effect)
            }
            fn cancel(&self, _handle: Scheduled) {}
        }

        let clock = ManualTimer::new();
        let debouncer = Debouncer::new(LeakyTimer(clock.clone()), Duration::from_millis(100));
        let (log, sink) = recorder();

        let first = sink.clone();
        debouncer.schedule(move || first.borrow_mut().push("first".to_string()));
        debouncer.schedule(move || sink.borrow_mut().push("second".to_string()));

        clock.advance(Duration::from_millis(100));
        assert_eq!(*log.borrow(), vec!["second"]);
    }

    #[test]
    fn test_superseded_handles_are_released() {
        /// Handle that counts how many of its kind were dropped.
        struct Counted(Rc<Cell<u32>>);

        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        struct CountingTimer {
            clock: ManualTimer,
            released: Rc<Cell<u32>>,
        }

        impl Timer for CountingTimer {
            type Handle = (Scheduled, Counted);
            fn schedule(&self, delay: Duration, effect: Box<dyn FnOnce()>) -> Self::Handle {
                (self.clock.schedule(delay, effect), Counted(self.released.clone()))
            }
            fn cancel(&self, handle: Self::Handle) {
                self.clock.cancel(handle.0);
            }
        }

        let clock = ManualTimer::new();
        let released = Rc::new(Cell::new(0));
        let debouncer = Debouncer::new(
            CountingTimer {
                clock: clock.clone(),
                released: released.clone(),
            },
            Duration::from_millis(100),
        );

        for _ in 0..5 {
            debouncer.schedule(|| {});
        }
        assert_eq!(released.get(), 4);
        assert_eq!(clock.pending_count(), 1);

        debouncer.cancel();
        assert_eq!(released.get(), 5);
    }

    #[test]
    fn test_drop_cancels() {
        let timer = ManualTimer::new();
        let (log, sink) = recorder();
        {
            let debouncer = Debouncer::new(timer.clone(), Duration::from_millis(100));
            debouncer.schedule(move || sink.borrow_mut().push("apply".to_string()));
        }
        timer.advance(Duration::from_secs(1));
        assert!(log.borrow().is_empty());
        assert_eq!(timer.pending_count(), 0);
    }

    #[test]
    fn test_manual_timer_runs_in_deadline_order() {
        let timer = ManualTimer::new();
        let (log, sink) = recorder();

        let late = sink.clone();
        timer.schedule(
            Duration::from_millis(30),
            Box::new(move || late.borrow_mut().push("late".to_string())),
        );
        timer.schedule(
            Duration::from_millis(10),
            Box::new(move || sink.borrow_mut().push("early".to_string())),
        );

        timer.advance(Duration::from_millis(50));
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(timer.now(), Duration::from_millis(50));
    }
}
