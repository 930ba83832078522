//! Flat record codec
//!
//! Each collection is stored as plain text, one record per line, fields
//! separated by commas in a fixed order. There is no header and no
//! escaping, so a comma inside a field shifts the remaining columns.
//!
//! | File               | Fields                                                  |
//! |--------------------|---------------------------------------------------------|
//! | `books.txt`        | id, title, author, genre, status                        |
//! | `members.txt`      | id, name, address, phone                                |
//! | `transactions.txt` | id, member, book, borrowed, returned (0 = open), due    |
//!
//! Timestamps are whole seconds since the Unix epoch.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::{Book, Member, Transaction};
use crate::storage::error::{StorageError, StorageResult};

/// Field separator
pub const DELIMITER: &str = ",";

/// Epoch value marking a loan that has not been returned
const OPEN_SENTINEL: &str = "0";

/// A record that can be written to and read from a delimited line
///
/// Only [`decode`] calls `from_fields`, after checking the field count.
pub trait Record: Sized {
    /// Number of fields a line must carry
    const FIELD_COUNT: usize;

    /// Render the record as a single line (without newline)
    fn to_line(&self) -> String;

    /// Build a record from exactly `FIELD_COUNT` fields
    fn from_fields(fields: &[&str]) -> Result<Self, String>;
}

impl Record for Book {
    const FIELD_COUNT: usize = 5;

    fn to_line(&self) -> String {
        [
            self.id.as_str(),
            self.title.as_str(),
            self.author.as_str(),
            self.genre.as_str(),
            self.status(),
        ]
        .join(DELIMITER)
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let mut book = Book::new(fields[0], fields[1], fields[2], fields[3]);
        book.available = fields[4] == "Available";
        Ok(book)
    }
}

impl Record for Member {
    const FIELD_COUNT: usize = 4;

    fn to_line(&self) -> String {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.address.as_str(),
            self.phone.as_str(),
        ]
        .join(DELIMITER)
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        Ok(Member::new(fields[0], fields[1], fields[2], fields[3]))
    }
}

impl Record for Transaction {
    const FIELD_COUNT: usize = 6;

    fn to_line(&self) -> String {
        let borrowed = self.borrowed_at.timestamp().to_string();
        let returned = match self.returned_at {
            Some(at) => at.timestamp().to_string(),
            None => OPEN_SENTINEL.to_string(),
        };
        let due = self.due_at.timestamp().to_string();
        [
            self.id.as_str(),
            self.member_id.as_str(),
            self.book_id.as_str(),
            borrowed.as_str(),
            returned.as_str(),
            due.as_str(),
        ]
        .join(DELIMITER)
    }

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let returned_at = if fields[4].trim() == OPEN_SENTINEL {
            None
        } else {
            Some(parse_epoch("return date", fields[4])?)
        };

        Ok(Transaction {
            id: fields[0].to_string(),
            member_id: fields[1].to_string(),
            book_id: fields[2].to_string(),
            borrowed_at: parse_epoch("borrow date", fields[3])?,
            returned_at,
            due_at: parse_epoch("expected return date", fields[5])?,
        })
    }
}

/// Parse a field holding whole epoch seconds
fn parse_epoch(name: &str, value: &str) -> Result<DateTime<Utc>, String> {
    let secs: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid {}: '{}'", name, value))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("{} out of range: {}", name, secs))
}

/// Render records as file content, one line each
pub fn encode<R: Record>(records: &[R]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line());
        out.push('\n');
    }
    out
}

/// Parse file content into records
///
/// `path` is only used for error reporting. Blank lines are skipped.
pub fn decode<R: Record>(content: &str, path: &Path) -> StorageResult<Vec<R>> {
    let mut records = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() < R::FIELD_COUNT {
            return Err(StorageError::InvalidRecord {
                path: path.to_path_buf(),
                line: line_no,
                details: format!(
                    "expected {} fields, found {}",
                    R::FIELD_COUNT,
                    fields.len()
                ),
            });
        }
        if fields.len() > R::FIELD_COUNT {
            warn!(
                "{:?} line {}: ignoring {} extra field(s)",
                path,
                line_no,
                fields.len() - R::FIELD_COUNT
            );
        }

        let record = R::from_fields(&fields[..R::FIELD_COUNT]).map_err(|details| {
            StorageError::InvalidRecord {
                path: path.to_path_buf(),
                line: line_no,
                details,
            }
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn path() -> &'static Path {
        Path::new("/data/test.txt")
    }

    #[test]
    fn test_book_line_format() {
        let mut book = Book::new("B1", "Dune", "Herbert", "SciFi");
        assert_eq!(book.to_line(), "B1,Dune,Herbert,SciFi,Available");

        book.available = false;
        assert_eq!(book.to_line(), "B1,Dune,Herbert,SciFi,Borrowed");
    }

    #[test]
    fn test_member_line_format() {
        let member = Member::new("M1", "Ada", "12 Loop Rd", "0700000000");
        assert_eq!(member.to_line(), "M1,Ada,12 Loop Rd,0700000000");
    }

    #[test]
    fn test_transaction_line_format() {
        let borrowed = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut txn = Transaction::open("3", "M1", "B1", borrowed);
        assert_eq!(txn.to_line(), "3,M1,B1,1700000000,0,1701209600");

        txn.close(Utc.timestamp_opt(1_700_500_000, 0).unwrap());
        assert_eq!(txn.to_line(), "3,M1,B1,1700000000,1700500000,1701209600");
    }

    #[test]
    fn test_decode_transactions() {
        let content = "1,M1,B1,1700000000,0,1701209600\n2,M2,B2,1700000000,1700100000,1701209600\n";
        let txns: Vec<Transaction> = decode(content, path()).unwrap();

        assert_eq!(txns.len(), 2);
        assert!(txns[0].is_open());
        assert_eq!(txns[0].due_at.timestamp(), 1_701_209_600);
        assert_eq!(txns[1].returned_at.unwrap().timestamp(), 1_700_100_000);
    }

    #[test]
    fn test_decode_unknown_status_is_borrowed() {
        let books: Vec<Book> = decode("B1,Dune,Herbert,SciFi,Lost\n", path()).unwrap();
        assert!(!books[0].available);
    }

    #[test]
    fn test_decode_skips_blank_lines_and_crlf() {
        let content = "M1,Ada,Addr,123\r\n\r\n\nM2,Bob,Addr,456\r\n";
        let members: Vec<Member> = decode(content, path()).unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].phone, "123");
        assert_eq!(members[1].id, "M2");
    }

    #[test]
    fn test_decode_missing_fields_reports_line() {
        let content = "B1,Dune,Herbert,SciFi,Available\nB2,Short\n";
        let err = decode::<Book>(content, path()).unwrap_err();

        match err {
            StorageError::InvalidRecord { line, details, .. } => {
                assert_eq!(line, 2);
                assert!(details.contains("expected 5 fields"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_extra_fields_are_ignored() {
        // A comma in the title pushes the status out of place
        let books: Vec<Book> =
            decode("B1,Dune, Messiah,Herbert,SciFi,Available\n", path()).unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, " Messiah");
        assert_eq!(books[0].genre, "Herbert");
        assert!(!books[0].available);
    }

    #[test]
    fn test_decode_bad_timestamp() {
        let err = decode::<Transaction>("1,M1,B1,yesterday,0,1701209600\n", path()).unwrap_err();
        assert!(err.to_string().contains("invalid borrow date"));
    }
}
