//! Record store
//!
//! The `Store` owns the three in-memory collections (books, members and
//! transactions) and the files behind them.
//!
//! ## Lifecycle
//!
//! All three files are read once, when the store opens. Every mutating
//! operation then calls [`Store::flush`] for the collections it touched,
//! which rewrites those files in full before the operation returns.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! store.add_book(Book::new("B1", "Dune", "Herbert", "SciFi"))?;
//! store.add_member(Member::new("M1", "Ada", "12 Loop Rd", "0700000000"))?;
//!
//! let txn_id = store.borrow_book("M1", "B1")?;
//! store.return_book("Dune")?;
//! ```

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::models::{Book, Member, Transaction};
use crate::storage::{FlatFilePersistence, StorageResult, StorageStats};

/// A record collection that can be flushed to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Books,
    Members,
    Transactions,
}

/// Counts and sizes for status reporting
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub books: usize,
    pub available_books: usize,
    pub members: usize,
    pub transactions: usize,
    pub open_loans: usize,
    pub storage: StorageStats,
}

/// In-memory record store backed by flat files
pub struct Store {
    pub(crate) books: Vec<Book>,
    pub(crate) members: Vec<Member>,
    pub(crate) transactions: Vec<Transaction>,
    /// Last transaction number handed out
    last_transaction_seq: u64,
    persistence: FlatFilePersistence,
    config: Config,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// Loads every collection from disk. Missing files start empty.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = FlatFilePersistence::new(config.clone());

        let books = persistence.load_books().context("Failed to load books")?;
        let members = persistence
            .load_members()
            .context("Failed to load members")?;
        let transactions = persistence
            .load_transactions()
            .context("Failed to load transactions")?;
        let stored_seq = persistence
            .load_sequence()
            .context("Failed to load transaction counter")?;

        // Never reuse a number already present on disk
        let last_transaction_seq = transactions
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .fold(stored_seq, u64::max);

        debug!(
            "Opened store at {:?}: {} book(s), {} member(s), {} transaction(s)",
            config.data_dir,
            books.len(),
            members.len(),
            transactions.len()
        );

        Ok(Self {
            books,
            members,
            transactions,
            last_transaction_seq,
            persistence,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All books, in storage order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// All members, in storage order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// All transactions, oldest first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Look up a transaction by id
    pub fn find_transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Rewrite the files for the given collections
    ///
    /// Flushing transactions also persists the transaction counter.
    pub fn flush(&self, collections: &[Collection]) -> StorageResult<()> {
        for collection in collections {
            match collection {
                Collection::Books => self.persistence.save_books(&self.books)?,
                Collection::Members => self.persistence.save_members(&self.members)?,
                Collection::Transactions => {
                    self.persistence.save_transactions(&self.transactions)?;
                    self.persistence.save_sequence(self.last_transaction_seq)?;
                }
            }
        }
        Ok(())
    }

    /// Hand out the next transaction id
    pub(crate) fn next_transaction_id(&mut self) -> String {
        self.last_transaction_seq += 1;
        self.last_transaction_seq.to_string()
    }

    /// Counts and on-disk sizes
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            books: self.books.len(),
            available_books: self.books.iter().filter(|b| b.available).count(),
            members: self.members.len(),
            transactions: self.transactions.len(),
            open_loans: self.transactions.iter().filter(|t| t.is_open()).count(),
            storage: self.persistence.stats(),
        }
    }

    /// Check if the store holds no records at all
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.members.is_empty() && self.transactions.is_empty()
    }
}
