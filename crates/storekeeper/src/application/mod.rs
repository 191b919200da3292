//! Application layer for the configuration store.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The *application* layer sits between the domain (pure value and path logic
//! in `storekeeper-core`) and the infrastructure (files on disk).
//!
//! Code in this layer:
//!
//! - **Orchestrates** domain operations to fulfil a user goal (e.g., "set
//!   `db.port` in the `app` configuration and make every other handle see it").
//! - **Depends on abstractions** (the [`storage::Storage`] trait) rather than
//!   concrete implementations, so the file system can be swapped for memory in
//!   tests without changing this code.
//! - **Contains no file-system calls**.
//!
//! # Sub-modules
//!
//! - **`settings`** – process-wide storage folder and path separator.
//! - **`storage`** – the `Storage` trait and its error type.
//! - **`registry`** – the shared-instance cache keyed by configuration name.
//! - **`store`** – the per-construction handle exposing get/set/unset/...

pub mod registry;
pub mod settings;
pub mod storage;
pub mod store;
