//! In-memory storage.
//!
//! Keeps rendered document text per name in a `HashMap`.  Loading parses the
//! text with the same reader `FileStorage` uses, so a document that survives
//! a save/load cycle here survives it on disk too.

use std::collections::HashMap;
use std::sync::Mutex;

use storekeeper_core::{parse_document, Map};

use crate::application::registry::lock;
use crate::application::storage::{Storage, StorageError};

/// [`Storage`] holding documents in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that stores `text` under `name`.
    pub fn with_document(self, name: &str, text: &str) -> Self {
        lock(&self.documents).insert(name.to_string(), text.to_string());
        self
    }

    /// Returns a copy of the document text stored under `name`.
    pub fn document(&self, name: &str) -> Option<String> {
        lock(&self.documents).get(name).cloned()
    }
}

impl Storage for MemoryStorage {
    fn location(&self, name: &str) -> String {
        format!("memory:{name}")
    }

    fn load(&self, name: &str) -> Result<Option<Map>, StorageError> {
        let Some(text) = self.document(name) else {
            return Ok(None);
        };
        parse_document(&text)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                location: self.location(name),
                source,
            })
    }

    fn write(&self, name: &str, text: &str) -> Result<(), StorageError> {
        lock(&self.documents).insert(name.to_string(), text.to_string());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        lock(&self.documents).contains_key(name)
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        match lock(&self.documents).remove(name) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound {
                location: self.location(name),
            }),
        }
    }
}
