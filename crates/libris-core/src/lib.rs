//! Libris Core Library
//!
//! This crate provides the core functionality for Libris, a single-user
//! library catalog: books, members and the borrow/return transactions
//! between them.
//!
//! # Architecture
//!
//! - **Store**: owns the three collections in memory
//! - **Flat files**: one comma-delimited line per record, rewritten in full
//!   after every change
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! store.add_book(Book::new("B1", "Dune", "Herbert", "SciFi"))?;
//! store.add_member(Member::new("M1", "Ada", "12 Loop Rd", "0700000000"))?;
//!
//! let txn_id = store.borrow_book("M1", "B1")?;
//! let overdue = store.list_overdue_members();
//! ```
//!
//! # Modules
//!
//! - `store`: Record store (main entry point)
//! - `catalog`: Book and member operations
//! - `circulation`: Borrow, return and loan reports
//! - `models`: Data structures and loan constants
//! - `storage`: Flat file persistence
//! - `config`: Application configuration

pub mod catalog;
pub mod circulation;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use circulation::{BorrowedBook, OverdueLoan};
pub use config::Config;
pub use error::{LibraryError, LibraryResult, RecordKind};
pub use models::{
    Book, Member, Transaction, DAILY_OVERDUE_FEE, FEE_CURRENCY, LOAN_PERIOD_DAYS,
    OVERDUE_REPORT_THRESHOLD_DAYS,
};
pub use storage::{FlatFilePersistence, StorageError, StorageStats};
pub use store::{Collection, Store, StoreStats};
