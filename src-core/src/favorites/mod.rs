pub mod notify;
pub mod storage;
pub mod store;
pub mod types;

pub use notify::{ChangeHub, Listener, Subscription};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::{FavoritesStore, DEFAULT_FAVORITES_KEY};
pub use types::FavoriteEntry;
