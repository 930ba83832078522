//! Record file persistence
//!
//! Handles loading and saving the three record collections to/from the
//! filesystem. Each save rewrites the whole file in place. There is no
//! temp-file-and-rename step, so a crash mid-write can leave a truncated
//! file behind.
//!
//! Storage location: `~/.local/share/libris/` (configurable via `Config`)
//!
//! Files:
//! - `books.txt` - Book records
//! - `members.txt` - Member records
//! - `transactions.txt` - Transaction records
//! - `transactions.seq` - Last transaction number handed out

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::models::{Book, Member, Transaction};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::records::{decode, encode, Record};

/// On-disk size of each record file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub books_size: u64,
    pub members_size: u64,
    pub transactions_size: u64,
}

impl StorageStats {
    /// Combined size in bytes
    pub fn total_size(&self) -> u64 {
        self.books_size + self.members_size + self.transactions_size
    }

    /// Combined size formatted for display
    pub fn total_size_human(&self) -> String {
        let size = self.total_size();
        if size < 1024 {
            format!("{} B", size)
        } else if size < 1024 * 1024 {
            format!("{:.1} KB", size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
        }
    }
}

/// Persistence layer for the flat record files
pub struct FlatFilePersistence {
    config: Config,
}

impl FlatFilePersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn load_books(&self) -> StorageResult<Vec<Book>> {
        load_records(&self.config.books_path())
    }

    pub fn load_members(&self) -> StorageResult<Vec<Member>> {
        load_records(&self.config.members_path())
    }

    pub fn load_transactions(&self) -> StorageResult<Vec<Transaction>> {
        load_records(&self.config.transactions_path())
    }

    pub fn save_books(&self, books: &[Book]) -> StorageResult<()> {
        save_records(&self.config.books_path(), books)
    }

    pub fn save_members(&self, members: &[Member]) -> StorageResult<()> {
        save_records(&self.config.members_path(), members)
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> StorageResult<()> {
        save_records(&self.config.transactions_path(), transactions)
    }

    /// Load the last transaction number handed out
    ///
    /// Returns 0 if the counter file doesn't exist yet.
    pub fn load_sequence(&self) -> StorageResult<u64> {
        let path = self.config.sequence_path();

        if !path.exists() {
            return Ok(0);
        }

        let content =
            fs::read_to_string(&path).map_err(|e| StorageError::from_read(e, path.clone()))?;

        content
            .trim()
            .parse()
            .map_err(|_| StorageError::InvalidRecord {
                path,
                line: 1,
                details: format!("invalid transaction counter: '{}'", content.trim()),
            })
    }

    /// Persist the last transaction number handed out
    pub fn save_sequence(&self, value: u64) -> StorageResult<()> {
        write_file(&self.config.sequence_path(), format!("{}\n", value).as_bytes())
    }

    /// Report the size of each record file
    pub fn stats(&self) -> StorageStats {
        let size = |path: &Path| fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        StorageStats {
            books_size: size(&self.config.books_path()),
            members_size: size(&self.config.members_path()),
            transactions_size: size(&self.config.transactions_path()),
        }
    }
}

/// Read every record from `path`
///
/// A missing file is an empty collection.
fn load_records<R: Record>(path: &Path) -> StorageResult<Vec<R>> {
    if !path.exists() {
        debug!("No record file at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let content =
        fs::read_to_string(path).map_err(|e| StorageError::from_read(e, path.to_path_buf()))?;
    let records = decode(&content, path)?;

    debug!("Loaded {} record(s) from {:?}", records.len(), path);
    Ok(records)
}

/// Rewrite `path` with every record, in order
fn save_records<R: Record>(path: &Path, records: &[R]) -> StorageResult<()> {
    write_file(path, encode(records).as_bytes())?;
    debug!("Saved {} record(s) to {:?}", records.len(), path);
    Ok(())
}

/// Write data to a file, creating parent directories as needed
fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, data).map_err(|e| StorageError::from_write(e, path.to_path_buf()))
}
