//! Store handle: path-addressed access to one named configuration.
//!
//! A [`Store`] is cheap to construct and holds two views of the configuration:
//!
//! - `origin` – a private snapshot taken when the handle was constructed,
//!   after constructor overrides were merged in.
//! - `current` – the live mapping shared through the [`Registry`] with every
//!   other handle constructed under the same name.
//!
//! # Sharing (for beginners)
//!
//! ```text
//!   Store a ("app") ──┐
//!                     ├──►  Arc<Mutex<Map>>   (registry entry "app")
//!   Store b ("app") ──┘
//! ```
//!
//! `a.set("x", 1)` is immediately visible through `b.get("x")`.  The same is
//! true for `truncate` and `reset`, which replace the shared contents for
//! every handle of that name.

use std::fmt;
use std::sync::Arc;

use storekeeper_core::{navigator, render, Map, PathError, PathExpr, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::registry::{lock, Registry, SharedRoot};
use super::storage::{Storage, StorageError};

/// Errors surfaced by [`Store`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path was empty where one is required.
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// `get` or `unset` addressed a value that does not exist.
    #[error("value '{path}' does not exist")]
    ValueNotFound { path: String },

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Handle to one named configuration.
pub struct Store {
    name: String,
    location: String,
    separator: char,
    origin: Map,
    current: SharedRoot,
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("separator", &self.separator)
            .field("origin_keys", &self.origin.len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Opens `name` through `registry`, loading it from `storage` if the
    /// registry has not seen it yet, and shallow-merging `overrides` into the
    /// shared mapping.
    ///
    /// `separator` is fixed for the lifetime of the handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the stored document exists but
    /// cannot be read or parsed.
    pub fn open_in(
        registry: &Registry,
        storage: Arc<dyn Storage>,
        separator: char,
        name: &str,
        overrides: Map,
    ) -> Result<Self, StoreError> {
        let (current, origin) = registry.get_or_load(name, overrides, storage.as_ref())?;
        let location = storage.location(name);
        debug!(name, %location, "opened store");
        Ok(Self {
            name: name.to_string(),
            location,
            separator,
            origin,
            current,
            storage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing location reported by the storage (a file path for
    /// `FileStorage`).
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// The snapshot captured when this handle was constructed.
    pub fn origin(&self) -> &Map {
        &self.origin
    }

    // ── Path operations ───────────────────────────────────────────────────────

    /// Returns a copy of the value at `path`, or of the whole mapping when
    /// `path` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ValueNotFound`] if any segment of `path` is
    /// missing.
    pub fn get(&self, path: &str) -> Result<Value, StoreError> {
        if path.is_empty() {
            return Ok(Value::Map(self.snapshot()));
        }
        let expr = self.parse(path)?;
        let current = lock(&self.current);
        let value = navigator::read(&current, &expr).map_err(|_| self.not_found(path))?;
        Ok(value.clone())
    }

    /// Stores `value` at `path`, creating intermediate mappings as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if `path` is empty.
    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let expr = self.parse(path)?;
        let value = value.into();
        debug!(name = %self.name, path, kind = value.kind(), "set");
        navigator::write(&mut lock(&self.current), &expr, value);
        Ok(())
    }

    /// Removes the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ValueNotFound`] if nothing is stored at `path`;
    /// the mapping is left unchanged in that case.
    pub fn unset(&self, path: &str) -> Result<(), StoreError> {
        let expr = self.parse(path)?;
        let mut current = lock(&self.current);
        if !navigator::contains(&current, &expr) {
            return Err(self.not_found(path));
        }
        navigator::remove(&mut current, &expr).map_err(|_| self.not_found(path))?;
        debug!(name = %self.name, path, "unset");
        Ok(())
    }

    /// Returns `true` if a value (including null) is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if `path` is empty.
    pub fn contains(&self, path: &str) -> Result<bool, StoreError> {
        let expr = self.parse(path)?;
        Ok(navigator::contains(&lock(&self.current), &expr))
    }

    // ── Whole-mapping operations ──────────────────────────────────────────────

    /// Empties the shared mapping for every handle of this name.
    pub fn truncate(&self) {
        debug!(name = %self.name, "truncate");
        lock(&self.current).clear();
    }

    /// Replaces the shared mapping with a copy of this handle's `origin`.
    pub fn reset(&self) {
        debug!(name = %self.name, "reset to origin");
        *lock(&self.current) = self.origin.clone();
    }

    /// Returns a deep copy of the shared mapping.
    pub fn snapshot(&self) -> Map {
        lock(&self.current).clone()
    }

    /// Returns `true` if the shared mapping has no top-level keys.
    pub fn is_empty(&self) -> bool {
        lock(&self.current).is_empty()
    }

    /// Returns `true` if nothing exists at the backing location.
    pub fn is_missing_from_storage(&self) -> bool {
        !self.storage.exists(&self.name)
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Renders the shared mapping and writes it to storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the write fails.
    pub fn save(&self) -> Result<(), StoreError> {
        let text = render(&lock(&self.current));
        self.storage.write(&self.name, &text)?;
        info!(name = %self.name, location = %self.location, bytes = text.len(), "saved configuration");
        Ok(())
    }

    /// Removes the backing document.  The in-memory mapping is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the removal fails.
    pub fn delete(&self) -> Result<(), StoreError> {
        self.storage.delete(&self.name)?;
        info!(name = %self.name, location = %self.location, "deleted configuration");
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn parse(&self, path: &str) -> Result<PathExpr, StoreError> {
        Ok(PathExpr::parse(path, self.separator)?)
    }

    fn not_found(&self, path: &str) -> StoreError {
        StoreError::ValueNotFound {
            path: path.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
