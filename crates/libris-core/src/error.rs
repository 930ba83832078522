//! Library operation errors
//!
//! Every catalog and circulation operation reports failure through
//! [`LibraryError`], so callers can match on the kind of failure.

use std::fmt;

use thiserror::Error;

use crate::storage::StorageError;

/// Which collection a keyed lookup ran against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Book,
    Member,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Book => write!(f, "Book"),
            RecordKind::Member => write!(f, "Member"),
        }
    }
}

/// Errors raised by catalog and circulation operations
#[derive(Error, Debug)]
pub enum LibraryError {
    /// A record with this id already exists
    #[error("{kind} with ID '{id}' already exists.")]
    DuplicateKey { kind: RecordKind, id: String },

    /// No record matched the id or title given
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// The book is already out on loan
    #[error("Book '{id}' is not available for borrowing.")]
    Unavailable { id: String },

    /// The book has no open transaction to close
    #[error("No active borrowing found for book '{id}'.")]
    NoActiveLoan { id: String },

    /// A required field was left empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Reading or writing the record files failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LibraryError {
    pub(crate) fn book_not_found(id: &str) -> Self {
        LibraryError::NotFound {
            kind: RecordKind::Book,
            id: id.to_string(),
        }
    }

    pub(crate) fn member_not_found(id: &str) -> Self {
        LibraryError::NotFound {
            kind: RecordKind::Member,
            id: id.to_string(),
        }
    }
}

/// Result type for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_error_messages() {
        let err = LibraryError::DuplicateKey {
            kind: RecordKind::Book,
            id: "B1".to_string(),
        };
        assert_eq!(err.to_string(), "Book with ID 'B1' already exists.");

        assert_eq!(
            LibraryError::member_not_found("M9").to_string(),
            "Member not found: M9"
        );
        assert_eq!(
            LibraryError::NoActiveLoan { id: "B1".into() }.to_string(),
            "No active borrowing found for book 'B1'."
        );
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let storage = StorageError::WriteError {
            path: PathBuf::from("/data/books.txt"),
            source: io::Error::new(io::ErrorKind::Other, "boom"),
        };
        let expected = storage.to_string();

        let err: LibraryError = storage.into();
        assert_eq!(err.to_string(), expected);
    }
}
