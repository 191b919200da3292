//! Infrastructure layer for the configuration store.
//!
//! Contains the adapters that touch the outside world: the file-system and
//! in-memory implementations of [`crate::Storage`], and the TOML settings
//! file reader.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `storekeeper_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod storage;
