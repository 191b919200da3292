//! Storage abstraction consumed by the registry and the store handle.
//!
//! Infrastructure implementations live in `infrastructure::storage`; unit
//! tests use the generated `MockStorage`.

use storekeeper_core::{LiteralError, Map};
use thiserror::Error;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored document could not be parsed.
    #[error("failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: LiteralError,
    },

    /// There is nothing stored at the location.
    #[error("nothing stored at {location}")]
    NotFound { location: String },
}

/// Backing storage for named configuration documents.
///
/// `name` is the configuration name (e.g. `"app"`); each implementation
/// decides how a name maps onto a location.
#[cfg_attr(test, mockall::automock)]
pub trait Storage: Send + Sync {
    /// Human-readable location of the document for `name` (a path, a URI, ...).
    fn location(&self, name: &str) -> String;

    /// Reads and parses the document for `name`.
    ///
    /// Returns `Ok(None)` when nothing is stored for `name`.
    fn load(&self, name: &str) -> Result<Option<Map>, StorageError>;

    /// Persists already-rendered document text for `name`.
    fn write(&self, name: &str, text: &str) -> Result<(), StorageError>;

    /// Returns `true` if a document exists for `name`.
    fn exists(&self, name: &str) -> bool;

    /// Removes the document for `name`.
    fn delete(&self, name: &str) -> Result<(), StorageError>;
}
