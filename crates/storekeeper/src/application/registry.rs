//! Named instance registry: the shared-instance cache of loaded configurations.
//!
//! The registry maps a configuration name to the one root mapping that every
//! store handle with that name reads and mutates.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//! get_or_load("app")  ──►  not cached?  ──►  Storage::load("app")  ──►  cache
//!                                │                                        │
//!                                └──────────── cached ◄───────────────────┘
//!                                                │
//!                                   shallow-merge overrides, snapshot origin
//! ```
//!
//! Entries are never evicted.  [`Registry::clear`] drops every entry and is
//! meant for tests and administrative tooling.
//!
//! # Locking
//!
//! The name table has its own mutex, held only long enough to find or insert
//! a name's `Slot`.  Each slot carries its own load lock, so a slow load of
//! one name never blocks opening, inspecting or clearing another.  Two
//! concurrent first constructions of the same name wait on the same slot and
//! load it exactly once.
//!
//! Lock order is always table, then slot, then root.  The table lock is never
//! held while a slot's load lock is taken.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use storekeeper_core::Map;
use tracing::debug;

use super::storage::{Storage, StorageError};

/// A root mapping shared by every handle constructed with the same name.
pub type SharedRoot = Arc<Mutex<Map>>;

/// One name's entry: empty until its first successful load.  A failed load
/// leaves the slot empty, which every query treats as "not registered".
#[derive(Debug, Default)]
struct Slot {
    root: OnceLock<SharedRoot>,
    loading: Mutex<()>,
}

impl Slot {
    fn is_loaded(&self) -> bool {
        self.root.get().is_some()
    }
}

/// Process-wide table of loaded configurations.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<String, Arc<Slot>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.  Starts empty.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Returns the shared root for `name`, loading it from `storage` on first
    /// use, after shallow-merging `overrides` into it.
    ///
    /// The second element is an independent deep copy of the merged mapping,
    /// used by the caller as its `origin` snapshot.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from [`Storage::load`] if the stored
    /// document exists but cannot be read or parsed.  Nothing is registered
    /// in that case.
    pub fn get_or_load(
        &self,
        name: &str,
        overrides: Map,
        storage: &dyn Storage,
    ) -> Result<(SharedRoot, Map), StorageError> {
        let slot = Arc::clone(lock(&self.entries).entry(name.to_string()).or_default());

        let root = load_once(&slot, name, storage)?;

        let origin = {
            let mut current = lock(&root);
            if !overrides.is_empty() {
                debug!(name, keys = overrides.len(), "merging constructor overrides");
            }
            merge_shallow(&mut current, overrides);
            current.clone()
        };

        Ok((root, origin))
    }

    /// Returns `true` if `name` has been loaded.
    pub fn contains(&self, name: &str) -> bool {
        lock(&self.entries)
            .get(name)
            .is_some_and(|slot| slot.is_loaded())
    }

    /// Number of loaded configurations.
    pub fn len(&self) -> usize {
        lock(&self.entries)
            .values()
            .filter(|slot| slot.is_loaded())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the entry for `name`.  Existing handles keep their (now detached)
    /// root; the next construction reloads from storage.
    pub fn forget(&self, name: &str) -> bool {
        lock(&self.entries)
            .remove(name)
            .is_some_and(|slot| slot.is_loaded())
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut entries = lock(&self.entries);
        debug!(count = entries.len(), "clearing configuration registry");
        entries.clear();
    }
}

/// Returns the root held by `slot`, loading it from `storage` if this is the
/// first successful load.  Only callers for the same name wait here.
fn load_once(slot: &Slot, name: &str, storage: &dyn Storage) -> Result<SharedRoot, StorageError> {
    if let Some(root) = slot.root.get() {
        return Ok(Arc::clone(root));
    }

    let _loading = lock(&slot.loading);
    // Another caller may have finished the load while this one waited.
    if let Some(root) = slot.root.get() {
        return Ok(Arc::clone(root));
    }

    let initial = match storage.load(name)? {
        Some(map) => {
            debug!(
                name,
                location = %storage.location(name),
                entries = map.len(),
                "loaded configuration"
            );
            map
        }
        None => {
            debug!(name, "no stored configuration; starting empty");
            Map::new()
        }
    };
    Ok(Arc::clone(
        slot.root.get_or_init(|| Arc::new(Mutex::new(initial))),
    ))
}

/// Overwrites top-level keys of `target` with those of `overrides`.
///
/// Nested mappings are replaced wholesale, never merged recursively.  Existing
/// keys keep their position; new keys are appended in `overrides` order.
pub fn merge_shallow(target: &mut Map, overrides: Map) {
    for (key, value) in overrides {
        target.insert(key, value);
    }
}

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Every mutation of a root mapping is a single in-place map operation, so
/// the data is structurally valid even after a panic.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::storage::MockStorage;
    use crate::infrastructure::storage::MemoryStorage;
    use mockall::predicate::eq;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use storekeeper_core::{parse_document, Value};

    fn map(pairs: &[(&str, Value)]) -> Map {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn stored(text: &'static str) -> MockStorage {
        let mut storage = MockStorage::new();
        storage
            .expect_load()
            .returning(move |_| Ok(Some(parse_document(text).expect("fixture parses"))));
        storage
            .expect_location()
            .returning(|name| format!("mock:{name}"));
        storage
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_first_load_reads_storage_once() {
        // Arrange
        let mut storage = MockStorage::new();
        storage
            .expect_load()
            .with(eq("app"))
            .times(1)
            .returning(|_| Ok(Some(map(&[("k", Value::Int(1))]))));
        storage.expect_location().returning(|n| n.to_string());
        let registry = Registry::new();

        // Act
        let (first, _) = registry.get_or_load("app", Map::new(), &storage).unwrap();
        let (second, _) = registry.get_or_load("app", Map::new(), &storage).unwrap();

        // Assert: same shared instance, storage consulted once
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.contains("app"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_document_starts_empty() {
        let mut storage = MockStorage::new();
        storage.expect_load().returning(|_| Ok(None));
        let registry = Registry::new();

        let (root, origin) = registry.get_or_load("fresh", Map::new(), &storage).unwrap();

        assert!(lock(&root).is_empty());
        assert!(origin.is_empty());
    }

    #[test]
    fn test_load_failure_registers_nothing() {
        // Arrange
        let mut storage = MockStorage::new();
        storage.expect_load().returning(|name| {
            Err(StorageError::NotFound {
                location: name.to_string(),
            })
        });
        let registry = Registry::new();

        // Act
        let result = registry.get_or_load("broken", Map::new(), &storage);

        // Assert
        assert!(result.is_err());
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_failed_load_can_be_retried() {
        // Arrange
        let storage = MemoryStorage::new().with_document("cfg", "return [");
        let registry = Registry::new();
        assert!(registry.get_or_load("cfg", Map::new(), &storage).is_err());

        // Act: the document is fixed and the name opened again
        storage.write("cfg", "return ['a' => 1];").unwrap();
        let (root, _) = registry.get_or_load("cfg", Map::new(), &storage).unwrap();

        // Assert
        assert_eq!(lock(&root).get("a"), Some(&Value::Int(1)));
        assert!(registry.contains("cfg"));
    }

    #[test]
    fn test_concurrent_first_opens_load_once() {
        // Arrange: a slow load, so every thread arrives before it finishes
        let mut storage = MockStorage::new();
        storage.expect_load().with(eq("app")).times(1).returning(|_| {
            thread::sleep(Duration::from_millis(50));
            Ok(Some(map(&[("k", Value::Int(1))])))
        });
        storage.expect_location().returning(|n| n.to_string());
        let registry = Registry::new();

        // Act
        let roots: Vec<SharedRoot> = thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get_or_load("app", Map::new(), &storage).unwrap().0))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        // Assert: one load, one shared instance
        assert!(roots.iter().all(|root| Arc::ptr_eq(root, &roots[0])));
        assert_eq!(registry.len(), 1);
    }

    /// Storage whose load of `"slow"` blocks until the test releases it.
    struct GatedStorage {
        started: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl Storage for GatedStorage {
        fn location(&self, name: &str) -> String {
            format!("gated:{name}")
        }

        fn load(&self, name: &str) -> Result<Option<Map>, StorageError> {
            if name == "slow" {
                let _ = lock(&self.started).send(());
                let _ = lock(&self.release).recv();
            }
            Ok(None)
        }

        fn write(&self, _name: &str, _text: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn exists(&self, _name: &str) -> bool {
            false
        }

        fn delete(&self, _name: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_slow_load_does_not_block_other_names() {
        // Arrange
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let storage = GatedStorage {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        };
        let registry = Registry::new();

        thread::scope(|scope| {
            let slow = scope.spawn(|| registry.get_or_load("slow", Map::new(), &storage));
            started_rx.recv().unwrap();

            // Act: while "slow" is mid-load
            let fast = registry.get_or_load("fast", Map::new(), &storage);

            // Assert
            assert!(fast.is_ok());
            assert!(registry.contains("fast"));
            assert!(!registry.contains("slow"));
            assert_eq!(registry.len(), 1);

            release_tx.send(()).unwrap();
            assert!(slow.join().unwrap().is_ok());
        });

        assert!(registry.contains("slow"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_overrides_are_merged_shallowly() {
        // Arrange
        let storage = stored("return ['a' => 1, 'nested' => ['x' => 1, 'y' => 2], 'z' => 3];");
        let registry = Registry::new();
        let overrides = map(&[
            ("nested", Value::Map(map(&[("x", Value::Int(10))]))),
            ("new", Value::Bool(true)),
        ]);

        // Act
        let (_, origin) = registry.get_or_load("cfg", overrides, &storage).unwrap();

        // Assert: `nested` replaced wholesale (no `y`), `new` appended, order kept
        let keys: Vec<&str> = origin.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "nested", "z", "new"]);
        assert_eq!(
            origin["nested"],
            Value::Map(map(&[("x", Value::Int(10))]))
        );
    }

    #[test]
    fn test_overrides_apply_to_already_cached_entry() {
        let storage = stored("return ['a' => 1];");
        let registry = Registry::new();
        let (root, _) = registry.get_or_load("cfg", Map::new(), &storage).unwrap();

        registry
            .get_or_load("cfg", map(&[("b", Value::Int(2))]), &storage)
            .unwrap();

        assert_eq!(lock(&root).get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_origin_is_independent_of_shared_root() {
        let storage = stored("return ['a' => 1];");
        let registry = Registry::new();

        let (root, origin) = registry.get_or_load("cfg", Map::new(), &storage).unwrap();
        lock(&root).insert("a".to_string(), Value::Int(99));

        assert_eq!(origin["a"], Value::Int(1));
    }

    #[test]
    fn test_clear_and_forget() {
        let mut storage = MockStorage::new();
        storage.expect_load().returning(|_| Ok(None));
        let registry = Registry::new();
        registry.get_or_load("one", Map::new(), &storage).unwrap();
        registry.get_or_load("two", Map::new(), &storage).unwrap();

        assert!(registry.forget("one"));
        assert!(!registry.forget("one"));
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }
}
