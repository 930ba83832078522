//! Data models for Libris
//!
//! Defines the core records: Book, Member and Transaction, plus the
//! loan constants that drive overdue calculation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of a loan
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Fee charged per overdue day
pub const DAILY_OVERDUE_FEE: f64 = 100.0;

/// Currency label for fees
pub const FEE_CURRENCY: &str = "KSH";

/// Open loans more than this many days overdue appear in the overdue report
pub const OVERDUE_REPORT_THRESHOLD_DAYS: i64 = 14;

/// A book in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique identifier
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// False while an open transaction references this book
    pub available: bool,
}

impl Book {
    /// Create a new, available book
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            available: true,
        }
    }

    /// Human-readable availability, as stored on disk
    pub fn status(&self) -> &'static str {
        if self.available {
            "Available"
        } else {
            "Borrowed"
        }
    }
}

/// A library member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    /// Unique identifier
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Member {
    /// Create a new member
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }
}

/// A borrow record linking a member to a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Unique identifier
    pub id: String,
    pub member_id: String,
    pub book_id: String,
    /// When the book was borrowed
    pub borrowed_at: DateTime<Utc>,
    /// When the book came back; `None` while the loan is open
    pub returned_at: Option<DateTime<Utc>>,
    /// Fixed at creation to `borrowed_at` plus the loan period
    pub due_at: DateTime<Utc>,
}

impl Transaction {
    /// Open a new loan starting at `borrowed_at`
    pub fn open(
        id: impl Into<String>,
        member_id: impl Into<String>,
        book_id: impl Into<String>,
        borrowed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            member_id: member_id.into(),
            book_id: book_id.into(),
            borrowed_at,
            returned_at: None,
            due_at: borrowed_at + Duration::days(LOAN_PERIOD_DAYS),
        }
    }

    /// Whether the book has not been returned yet
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Close the loan
    pub fn close(&mut self, returned_at: DateTime<Utc>) {
        self.returned_at = Some(returned_at);
    }

    /// Whole days past the due date, never negative
    ///
    /// Open loans are measured against `now`, returned loans against the
    /// return date.
    pub fn overdue_days_at(&self, now: DateTime<Utc>) -> i64 {
        let end = self.returned_at.unwrap_or(now);
        (end - self.due_at).num_days().max(0)
    }

    /// Overdue fee as of `now`
    pub fn overdue_fee_at(&self, now: DateTime<Utc>) -> f64 {
        self.overdue_days_at(now) as f64 * DAILY_OVERDUE_FEE
    }

    /// Whole days past the due date as of the current time
    pub fn overdue_days(&self) -> i64 {
        self.overdue_days_at(Utc::now())
    }

    /// Overdue fee as of the current time
    pub fn overdue_fee(&self) -> f64 {
        self.overdue_fee_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_book_new_is_available() {
        let book = Book::new("B1", "Dune", "Herbert", "SciFi");
        assert_eq!(book.id, "B1");
        assert_eq!(book.title, "Dune");
        assert!(book.available);
        assert_eq!(book.status(), "Available");
    }

    #[test]
    fn test_book_status_borrowed() {
        let mut book = Book::new("B1", "Dune", "Herbert", "SciFi");
        book.available = false;
        assert_eq!(book.status(), "Borrowed");
    }

    #[test]
    fn test_transaction_due_date() {
        let borrowed = at(1_700_000_000);
        let txn = Transaction::open("1", "M1", "B1", borrowed);
        assert!(txn.is_open());
        assert_eq!(
            txn.due_at.timestamp() - txn.borrowed_at.timestamp(),
            14 * 86_400
        );
    }

    #[test]
    fn test_overdue_days_open_loan() {
        let now = at(1_700_000_000);
        let txn = Transaction::open("1", "M1", "B1", now - Duration::days(20));

        assert_eq!(txn.overdue_days_at(now), 6);
        assert_eq!(txn.overdue_fee_at(now), 600.0);
    }

    #[test]
    fn test_overdue_days_never_negative() {
        let now = at(1_700_000_000);
        let txn = Transaction::open("1", "M1", "B1", now);

        assert_eq!(txn.overdue_days_at(now), 0);
        assert_eq!(txn.overdue_fee_at(now), 0.0);
    }

    #[test]
    fn test_overdue_days_floors_partial_days() {
        let now = at(1_700_000_000);
        let txn = Transaction::open(
            "1",
            "M1",
            "B1",
            now - Duration::days(17) - Duration::hours(23),
        );

        assert_eq!(txn.overdue_days_at(now), 3);
    }

    #[test]
    fn test_overdue_days_returned_loan_uses_return_date() {
        let borrowed = at(1_700_000_000);
        let mut txn = Transaction::open("1", "M1", "B1", borrowed);
        txn.close(borrowed + Duration::days(16));

        assert!(!txn.is_open());
        // Later clock readings do not change a closed loan
        let much_later = borrowed + Duration::days(400);
        assert_eq!(txn.overdue_days_at(much_later), 2);
        assert_eq!(txn.overdue_fee_at(much_later), 200.0);
    }

    #[test]
    fn test_transaction_serialization() {
        let txn = Transaction::open("7", "M1", "B1", at(1_700_000_000));
        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, deserialized);
    }
}
