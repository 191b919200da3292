//! Process-wide store settings.
//!
//! Two values are shared by every store handle in the process:
//!
//! | Setting     | Default | Meaning                                          |
//! |-------------|---------|--------------------------------------------------|
//! | `folder`    | `./`    | Directory holding the `<name>.php` files         |
//! | `separator` | `.`     | Character splitting a path into segments         |
//!
//! The folder is always stored with a trailing path separator so a file path
//! is simply `folder + name + ".php"`.
//!
//! Handles read the settings once, when they are constructed.  Changing the
//! separator afterwards does not affect handles that already exist.

use std::sync::{OnceLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use storekeeper_core::DEFAULT_SEPARATOR;

/// Storage folder and path separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Directory holding the backing files.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Character separating path segments.
    #[serde(default = "default_separator")]
    pub separator: char,
}

fn default_folder() -> String {
    normalize_folder(".")
}
fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            separator: default_separator(),
        }
    }
}

impl StoreSettings {
    /// Returns a copy whose folder ends with a path separator.
    pub fn normalized(mut self) -> Self {
        self.folder = normalize_folder(&self.folder);
        self
    }
}

/// Appends the platform path separator to `folder` unless it already ends
/// with one.  An empty folder means the current directory.
pub fn normalize_folder(folder: &str) -> String {
    let mut out = if folder.is_empty() {
        ".".to_string()
    } else {
        folder.to_string()
    };
    if !out.ends_with(std::path::is_separator) {
        out.push(std::path::MAIN_SEPARATOR);
    }
    out
}

// ── Process-wide instance ─────────────────────────────────────────────────────

static SETTINGS: OnceLock<RwLock<StoreSettings>> = OnceLock::new();

fn cell() -> &'static RwLock<StoreSettings> {
    SETTINGS.get_or_init(|| RwLock::new(StoreSettings::default()))
}

/// Returns a copy of the current process-wide settings.
pub fn current() -> StoreSettings {
    cell()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the process-wide settings.
pub fn install(settings: StoreSettings) {
    *cell().write().unwrap_or_else(PoisonError::into_inner) = settings.normalized();
}

/// Sets the process-wide storage folder.
pub fn set_config_folder(folder: &str) {
    cell()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .folder = normalize_folder(folder);
}

/// Sets the process-wide path separator.
pub fn set_separator(separator: char) {
    cell()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .separator = separator;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::MAIN_SEPARATOR;

    #[test]
    fn test_default_separator_is_dot() {
        assert_eq!(StoreSettings::default().separator, '.');
    }

    #[test]
    fn test_default_folder_is_current_directory() {
        assert_eq!(StoreSettings::default().folder, format!(".{MAIN_SEPARATOR}"));
    }

    #[test]
    fn test_normalize_folder_appends_missing_separator() {
        // Arrange
        let bad_end = format!("{MAIN_SEPARATOR}abc{MAIN_SEPARATOR}def");

        // Act
        let normalized = normalize_folder(&bad_end);

        // Assert
        assert_eq!(normalized, format!("{bad_end}{MAIN_SEPARATOR}"));
    }

    #[test]
    fn test_normalize_folder_keeps_existing_separator() {
        let good_end = format!("{MAIN_SEPARATOR}abc{MAIN_SEPARATOR}");
        assert_eq!(normalize_folder(&good_end), good_end);
    }

    #[test]
    fn test_normalize_empty_folder_is_current_directory() {
        assert_eq!(normalize_folder(""), format!(".{MAIN_SEPARATOR}"));
    }

    #[test]
    fn test_normalized_settings_keep_separator() {
        let settings = StoreSettings {
            folder: "conf".to_string(),
            separator: '/',
        }
        .normalized();

        assert_eq!(settings.folder, format!("conf{MAIN_SEPARATOR}"));
        assert_eq!(settings.separator, '/');
    }
}
