//! Key-value persistence behind the favorites store.
//!
//! The store only needs whole-value get/set/remove on one key plus an
//! optional "another context wrote this key" signal. The browser crate
//! implements this over `window.localStorage`; this module provides an
//! in-memory backend and a file-backed one for native targets.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::{Result, WanderLensError};

use super::notify::{Listener, Subscription};

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the whole value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Invoke `listener` whenever another execution context writes or removes
    /// `key`. Writes made through this handle do not trigger it. Returns None
    /// when the backend cannot observe other contexts.
    fn watch(&self, _key: &str, _listener: Listener) -> Option<Subscription> {
        None
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn watch(&self, key: &str, listener: Listener) -> Option<Subscription> {
        (**self).watch(key, listener)
    }
}

struct Watcher {
    id: u64,
    context: u64,
    key: String,
    listener: Listener,
}

#[derive(Default)]
struct SharedMemory {
    values: HashMap<String, String>,
    watchers: Vec<Watcher>,
    next_id: u64,
    next_context: u64,
    fail_writes: bool,
}

/// In-memory storage shared between handles.
///
/// `clone()` returns a handle in the same execution context;
/// `new_context()` returns one that behaves like another browser tab over the
/// same origin, so writes through it reach watchers registered here and
/// vice versa.
pub struct MemoryStorage {
    shared: Rc<RefCell<SharedMemory>>,
    context: u64,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStorage {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            context: self.context,
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        let shared = SharedMemory {
            next_context: 1,
            ..SharedMemory::default()
        };
        Self {
            shared: Rc::new(RefCell::new(shared)),
            context: 0,
        }
    }

    /// A handle over the same data in a separate execution context.
    pub fn new_context(&self) -> Self {
        let context = {
            let mut shared = self.shared.borrow_mut();
            let context = shared.next_context;
            shared.next_context += 1;
            context
        };
        Self {
            shared: Rc::clone(&self.shared),
            context,
        }
    }

    /// Make every subsequent write fail, as a full storage quota would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.shared.borrow_mut().fail_writes = fail;
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.shared.borrow().fail_writes {
            return Err(WanderLensError::Storage(format!(
                "quota exceeded writing '{}'",
                key
            )));
        }
        Ok(())
    }

    /// Notify watchers of `key` in other contexts. Runs with no borrow held so
    /// listeners can read the storage.
    fn broadcast(&self, key: &str) {
        let listeners: Vec<Listener> = self
            .shared
            .borrow()
            .watchers
            .iter()
            .filter(|w| w.key == key && w.context != self.context)
            .map(|w| Rc::clone(&w.listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.shared.borrow().values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.shared
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        self.broadcast(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        let removed = self.shared.borrow_mut().values.remove(key).is_some();
        if removed {
            self.broadcast(key);
        }
        Ok(())
    }

    fn watch(&self, key: &str, listener: Listener) -> Option<Subscription> {
        let id = {
            let mut shared = self.shared.borrow_mut();
            let id = shared.next_id;
            shared.next_id += 1;
            shared.watchers.push(Watcher {
                id,
                context: self.context,
                key: key.to_string(),
                listener,
            });
            id
        };

        let weak: Weak<RefCell<SharedMemory>> = Rc::downgrade(&self.shared);
        Some(Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.borrow_mut().watchers.retain(|w| w.id != id);
            }
        }))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use self::file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use tempfile::NamedTempFile;
    use tracing::debug;

    use super::KeyValueStorage;
    use crate::error::{Result, WanderLensError};

    /// One file per key in a directory. Writes go to a temp file in the same
    /// directory and are renamed into place, so a reader never sees a
    /// partial value.
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        pub fn new(dir: &Path) -> Result<Self> {
            std::fs::create_dir_all(dir).map_err(|e| {
                WanderLensError::Storage(format!("Failed to create {:?}: {}", dir, e))
            })?;
            Ok(Self {
                dir: dir.to_path_buf(),
            })
        }

        pub fn path_for(&self, key: &str) -> PathBuf {
            let name: String = key
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            self.dir.join(format!("{}.json", name))
        }
    }

    fn write_atomic(dir: &Path, target: &Path, value: &str) -> anyhow::Result<()> {
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(target)?;
        Ok(())
    }

    impl KeyValueStorage for FileStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            match std::fs::read_to_string(self.path_for(key)) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            let path = self.path_for(key);
            write_atomic(&self.dir, &path, value)
                .map_err(|e| WanderLensError::Storage(format!("Failed to write {:?}: {}", path, e)))?;
            debug!("Wrote {} bytes to {:?}", value.len(), path);
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            match std::fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    #[test]
    fn test_memory_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));

        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_contexts_share_data() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.new_context();
        tab_a.set("k", "from a").unwrap();
        assert_eq!(tab_b.get("k").unwrap().as_deref(), Some("from a"));
    }

    #[test]
    fn test_watch_fires_only_for_other_contexts() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.new_context();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let _watch = tab_b.watch("k", Rc::new(move || h.set(h.get() + 1))).unwrap();

        tab_b.set("k", "own write").unwrap();
        assert_eq!(hits.get(), 0);

        tab_a.set("k", "other write").unwrap();
        assert_eq!(hits.get(), 1);

        tab_a.set("other-key", "x").unwrap();
        assert_eq!(hits.get(), 1);

        tab_a.remove("k").unwrap();
        assert_eq!(hits.get(), 2);

        // Removing an absent key changes nothing, so nothing is broadcast.
        tab_a.remove("k").unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_watch_released_on_drop() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.new_context();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let watch = tab_b.watch("k", Rc::new(move || h.set(h.get() + 1))).unwrap();
        drop(watch);

        tab_a.set("k", "v").unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_fail_writes() {
        let storage = MemoryStorage::new();
        storage.set("k", "kept").unwrap();
        storage.set_fail_writes(true);

        let err = storage.set("k", "lost").unwrap_err();
        assert!(matches!(err, WanderLensError::Storage(_)));
        assert!(storage.remove("k").is_err());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(&dir.path().join("nested")).unwrap();

        assert_eq!(storage.get("wanderlens-favorites").unwrap(), None);
        storage.set("wanderlens-favorites", "[]").unwrap();
        assert_eq!(storage.get("wanderlens-favorites").unwrap().as_deref(), Some("[]"));

        storage.remove("wanderlens-favorites").unwrap();
        storage.remove("wanderlens-favorites").unwrap();
        assert_eq!(storage.get("wanderlens-favorites").unwrap(), None);
    }

    #[test]
    fn test_file_storage_sanitizes_key() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let path = storage.path_for("../escape/key");
        assert_eq!(path, dir.path().join("___escape_key.json"));
    }

    #[test]
    fn test_file_storage_has_no_watch() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(storage.watch("k", Rc::new(|| {})).is_none());
    }
}
