//! Storage layer
//!
//! Handles the flat record files that back the in-memory store.
//!
//! ## Architecture
//!
//! - **records**: line codec for books, members and transactions
//! - **persistence**: whole-file load and save per collection
//! - **error**: typed I/O and parse failures
//!
//! Files are read once when the store opens and rewritten in full
//! whenever the store flushes a collection.

pub mod error;
pub mod persistence;
pub(crate) mod records;

pub use error::{StorageError, StorageResult};
pub use persistence::{FlatFilePersistence, StorageStats};
