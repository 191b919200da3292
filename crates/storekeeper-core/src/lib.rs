//! # storekeeper-core
//!
//! Shared library for Storekeeper containing the dynamically-typed value
//! model, the dot-path parser and navigator, and the literal document codec.
//!
//! This crate has zero dependencies on the file system, global state, or any
//! process-wide settings.  Everything here is pure data manipulation and can be
//! unit-tested in isolation.
//!
//! # Architecture overview (for beginners)
//!
//! Storekeeper is a hierarchical key-value configuration store.  A
//! configuration is a nested mapping (think `{"db": {"host": "...", "port": 5432}}`)
//! that is loaded from a file, edited through dot-separated paths such as
//! `db.host`, and written back to the same file.
//!
//! This crate (`storekeeper-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – The [`Value`] sum type, the [`PathExpr`] parser that turns
//!   `"db.host"` into navigation steps, and the [`navigator`] functions that
//!   read, write, and remove nodes inside a nested mapping.
//!
//! - **`literal`** – How a mapping travels to and from disk.  The writer
//!   renders a mapping as an indented literal document; the reader parses that
//!   document back into a mapping.

pub mod domain;
pub mod literal;

// Re-export the most-used types at the crate root so callers can write
// `storekeeper_core::Value` instead of `storekeeper_core::domain::value::Value`.
pub use domain::navigator::{self, NavigationError};
pub use domain::path::{PathError, PathExpr, DEFAULT_SEPARATOR};
pub use domain::value::{Map, Value};
pub use literal::{parse_document, parse_value, render, LiteralError, MAX_DEPTH};
