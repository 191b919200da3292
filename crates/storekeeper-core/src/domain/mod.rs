//! Domain entities for Storekeeper.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What lives here? (for beginners)
//!
//! - [`value`] – the dynamically-typed [`value::Value`] stored at every node of
//!   a configuration tree.
//! - [`path`] – parsing a separator-delimited string such as `array.index1`
//!   into intermediate steps plus a final key.
//! - [`navigator`] – walking a nested mapping along a parsed path to read,
//!   create, or remove nodes.
//!
//! Code in outer layers (the store handle, storage adapters, the CLI) depends
//! on the domain, but the domain never depends on them.

pub mod navigator;
pub mod path;
pub mod value;
