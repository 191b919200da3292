//! TOML settings file for the `storekeeper` binary and embedding callers.
//!
//! # Format (for beginners)
//!
//! ```toml
//! # Directory holding the <name>.php documents.
//! folder = "/etc/myapp"
//!
//! # Character splitting paths such as database.host
//! separator = "."
//! ```
//!
//! Both keys are optional.  Fields annotated with `#[serde(default = ...)]` on
//! [`StoreSettings`] fall back to their defaults when absent, so an empty file
//! (or no file at all) yields `StoreSettings::default()`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::application::settings::StoreSettings;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads [`StoreSettings`] from `path`, returning the defaults if the file
/// does not exist.  The folder of the result is normalized.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: &Path) -> Result<StoreSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let settings: StoreSettings = toml::from_str(&content)?;
            debug!(path = %path.display(), ?settings, "loaded settings file");
            Ok(settings.normalized())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file; using defaults");
            Ok(StoreSettings::default())
        }
        Err(e) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
