//! File-system storage: one literal document per configuration name.
//!
//! The document for `name` lives at `<folder><name>.php`.  The folder is
//! normalized on construction so it always ends with a path separator.
//!
//! ```text
//! FileStorage::new("/etc/myapp")
//!     "app"  ──►  /etc/myapp/app.php
//!     "db"   ──►  /etc/myapp/db.php
//! ```

use std::io::ErrorKind;
use std::path::PathBuf;

use storekeeper_core::{parse_document, Map};
use tracing::debug;

use crate::application::settings::normalize_folder;
use crate::application::storage::{Storage, StorageError};

/// [`Storage`] backed by files in a single folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    folder: String,
}

impl FileStorage {
    pub fn new(folder: &str) -> Self {
        Self {
            folder: normalize_folder(folder),
        }
    }

    /// The normalized folder, always ending with a path separator.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Full path of the document for `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}.php", self.folder, name))
    }

    fn io_error(&self, name: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            location: self.location(name),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn location(&self, name: &str) -> String {
        self.path_for(name).display().to_string()
    }

    fn load(&self, name: &str) -> Result<Option<Map>, StorageError> {
        let path = self.path_for(name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(name, e)),
        };
        debug!(path = %path.display(), bytes = text.len(), "read configuration file");

        parse_document(&text)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                location: self.location(name),
                source,
            })
    }

    fn write(&self, name: &str, text: &str) -> Result<(), StorageError> {
        let path = self.path_for(name);

        // Ensure directory exists before writing.
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                location: dir.display().to_string(),
                source,
            })?;
        }

        std::fs::write(&path, text).map_err(|e| self.io_error(name, e))
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound {
                location: self.location(name),
            }),
            Err(e) => Err(self.io_error(name, e)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
