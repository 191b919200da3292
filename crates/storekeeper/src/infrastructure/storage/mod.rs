//! Storage infrastructure: where configuration documents live.
//!
//! - `file` – one `<folder><name>.php` file per configuration name.
//! - `memory` – documents held in process memory (tests, embedding callers).
//! - `settings_file` – reads [`crate::StoreSettings`] from a TOML file.
//!
//! Both storage backends hold rendered document *text* and run it through the
//! same literal reader on load, so they behave identically apart from where
//! the bytes are kept.

pub mod file;
pub mod memory;
pub mod settings_file;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use settings_file::{load_settings, SettingsError};
