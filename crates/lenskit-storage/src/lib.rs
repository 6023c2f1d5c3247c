//! Lenskit Storage - Record stores for snapshot export
//!
//! This crate provides the record store abstraction, an in-memory backend
//! loaded from fixture files, and the schema-driven relation provider that
//! the closure engine traverses.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod fixture;
pub mod memory;
pub mod provider;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use fixture::{import_fixture, parse_fixture};
pub use memory::MemoryStore;
pub use provider::StoreRelationProvider;
pub use traits::RecordStore;
