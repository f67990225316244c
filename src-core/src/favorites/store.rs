use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::Config;

use super::notify::{ChangeHub, Listener, Subscription};
use super::storage::KeyValueStorage;
use super::types::FavoriteEntry;

/// Storage key of the favorites blob.
pub const DEFAULT_FAVORITES_KEY: &str = "wanderlens-favorites";

/// The user's favorite activities, persisted as one JSON array under one key.
///
/// The persisted blob is the only source of truth: every operation reads it
/// fresh, and every mutation replaces it whole. Persistence is best-effort.
/// A missing or corrupt blob reads as empty, and a failed write is logged
/// rather than returned, so favoriting never gets in the way of browsing.
///
/// Observers register with [`subscribe`](Self::subscribe) and are told after
/// each local mutation, and whenever the backend reports that another
/// context rewrote the key.
pub struct FavoritesStore<S> {
    storage: S,
    key: String,
    hub: ChangeHub,
}

impl<S: KeyValueStorage> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_FAVORITES_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            hub: ChangeHub::new(),
        }
    }

    pub fn from_config(storage: S, config: &Config) -> Self {
        Self::with_key(storage, config.favorites_key.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current favorites in insertion order. Never fails.
    pub fn list(&self) -> Vec<FavoriteEntry> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<FavoriteEntry>>(&raw) {
            Ok(entries) => dedupe(entries),
            Err(e) => {
                warn!("Ignoring unreadable favorites blob: {}", e);
                Vec::new()
            }
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.list().iter().any(|e| e.id == id)
    }

    /// Append `entry` unless its id is already present.
    pub fn add(&self, entry: FavoriteEntry) {
        let mut entries = self.list();
        if entries.iter().any(|e| e.id == entry.id) {
            return;
        }
        debug!("Adding favorite {}", entry.id);
        entries.push(entry);
        self.commit(&entries);
    }

    /// Remove the entry with `id`, if any.
    pub fn remove(&self, id: &str) {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return;
        }
        debug!("Removing favorite {}", id);
        self.commit(&entries);
    }

    /// Flip the favorite state of `entry`. Returns true if it is now a
    /// favorite. The decision is made against a fresh read of the blob.
    pub fn toggle(&self, entry: FavoriteEntry) -> bool {
        let mut entries = self.list();
        let now_favorite = if entries.iter().any(|e| e.id == entry.id) {
            entries.retain(|e| e.id != entry.id);
            false
        } else {
            entries.push(entry);
            true
        };
        self.commit(&entries);
        now_favorite
    }

    /// Forget every favorite.
    pub fn clear(&self) {
        match self.storage.remove(&self.key) {
            Ok(()) => {
                info!("Cleared favorites");
                self.hub.notify();
            }
            Err(e) => warn!("Failed to clear favorites: {}", e),
        }
    }

    /// Call `listener` whenever the collection may have changed, in this
    /// context or another one. The listener should re-read the store.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let listener: Listener = Rc::new(listener);
        let local = self.hub.subscribe_rc(Rc::clone(&listener));
        match self.storage.watch(&self.key, listener) {
            Some(external) => Subscription::combine(vec![local, external]),
            None => local,
        }
    }

    /// Like `subscribe`, but only for mutations made through this store.
    pub fn subscribe_local(&self, listener: impl Fn() + 'static) -> Subscription {
        self.hub.subscribe(listener)
    }

    /// Number of in-context subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.hub.listener_count()
    }

    /// Persist the whole collection, then notify. A failed write is logged
    /// and leaves observers untouched since nothing they can read changed.
    fn commit(&self, entries: &[FavoriteEntry]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize favorites: {}", e);
                return;
            }
        };

        match self.storage.set(&self.key, &json) {
            Ok(()) => self.hub.notify(),
            Err(e) => warn!(
                "Failed to persist {} favorites: {}",
                entries.len(),
                e
            ),
        }
    }
}

/// Keep the first entry for each id. Another writer may have left duplicates.
fn dedupe(entries: Vec<FavoriteEntry>) -> Vec<FavoriteEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect()
}
