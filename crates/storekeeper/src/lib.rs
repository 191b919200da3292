//! storekeeper library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use storekeeper::{settings, Map};
//!
//! settings::set_config_folder("/etc/myapp");
//! let cfg = storekeeper::open("app", Map::new())?;
//! cfg.set("database.host", "localhost")?;
//! assert_eq!(cfg.get("database.host")?.as_str(), Some("localhost"));
//! cfg.save()?;
//! # Ok::<(), storekeeper::StoreError>(())
//! ```

use std::sync::Arc;

pub mod application;
pub mod infrastructure;

pub use application::registry::Registry;
pub use application::settings::{self, StoreSettings};
pub use application::storage::{Storage, StorageError};
pub use application::store::{Store, StoreError};
pub use infrastructure::storage::{load_settings, FileStorage, MemoryStorage, SettingsError};
pub use storekeeper_core::{Map, PathError, PathExpr, Value};

/// Opens the store named `name` using the process-wide settings, the
/// process-wide [`Registry`], and a [`FileStorage`] rooted at the configured
/// folder.
///
/// # Errors
///
/// Returns [`StoreError::Storage`] if the backing file exists but cannot be
/// read or parsed.
pub fn open(name: &str, overrides: Map) -> Result<Store, StoreError> {
    let settings = settings::current();
    let storage = Arc::new(FileStorage::new(&settings.folder));
    Store::open_in(Registry::global(), storage, settings.separator, name, overrides)
}
