//! Circulation workflow
//!
//! Borrowing and returning books, plus the loan reports built on top of
//! the transaction history.
//!
//! A book moves Available -> Borrowed on borrow and back to Available on
//! return. At most one transaction per book is open at a time; when
//! several exist, the newest open one is the active loan.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{LibraryError, LibraryResult};
use crate::models::{Book, Member, Transaction, OVERDUE_REPORT_THRESHOLD_DAYS};
use crate::store::{Collection, Store};

/// A book currently out on loan, with its active transaction
#[derive(Debug, Clone, Serialize)]
pub struct BorrowedBook {
    pub book: Book,
    pub transaction: Transaction,
}

/// An open loan past the report threshold, with its borrower
#[derive(Debug, Clone, Serialize)]
pub struct OverdueLoan {
    pub member: Member,
    pub transaction: Transaction,
    pub overdue_days: i64,
    pub fee: f64,
}

impl Store {
    /// Lend a book to a member, returning the new transaction id
    pub fn borrow_book(&mut self, member_id: &str, book_id: &str) -> LibraryResult<String> {
        self.borrow_book_at(member_id, book_id, Utc::now())
    }

    /// Lend a book to a member as of `now`
    pub fn borrow_book_at(
        &mut self,
        member_id: &str,
        book_id: &str,
        now: DateTime<Utc>,
    ) -> LibraryResult<String> {
        let book_index = self
            .books
            .iter()
            .position(|b| b.id == book_id)
            .ok_or_else(|| LibraryError::book_not_found(book_id))?;
        if self.find_member(member_id).is_none() {
            return Err(LibraryError::member_not_found(member_id));
        }
        if !self.books[book_index].available {
            return Err(LibraryError::Unavailable {
                id: book_id.to_string(),
            });
        }

        self.books[book_index].available = false;
        let id = self.next_transaction_id();
        self.transactions
            .push(Transaction::open(id.clone(), member_id, book_id, now));

        info!("Book {} borrowed by {} (transaction {})", book_id, member_id, id);
        self.flush(&[Collection::Books, Collection::Transactions])?;
        Ok(id)
    }

    /// Take a book back, returning the closed transaction
    ///
    /// `identifier` is matched against book ids first, then as a title
    /// substring (first match wins).
    pub fn return_book(&mut self, identifier: &str) -> LibraryResult<Transaction> {
        self.return_book_at(identifier, Utc::now())
    }

    /// Take a book back as of `now`
    pub fn return_book_at(
        &mut self,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> LibraryResult<Transaction> {
        let book_index = self
            .resolve_book(identifier)
            .ok_or_else(|| LibraryError::book_not_found(identifier))?;
        let book_id = self.books[book_index].id.clone();

        let txn_index = self
            .open_transaction_index(&book_id)
            .ok_or(LibraryError::NoActiveLoan { id: book_id.clone() })?;

        self.transactions[txn_index].close(now);
        self.books[book_index].available = true;

        let txn = self.transactions[txn_index].clone();
        info!("Book {} returned (transaction {})", book_id, txn.id);
        self.flush(&[Collection::Books, Collection::Transactions])?;
        Ok(txn)
    }

    /// The active loan for a book, if any
    pub fn open_transaction_for(&self, book_id: &str) -> Option<&Transaction> {
        self.open_transaction_index(book_id)
            .map(|i| &self.transactions[i])
    }

    /// Every unavailable book paired with its active loan
    ///
    /// Books marked borrowed without an open transaction are skipped.
    pub fn list_borrowed_with_transactions(&self) -> Vec<BorrowedBook> {
        self.books
            .iter()
            .filter(|b| !b.available)
            .filter_map(|book| match self.open_transaction_for(&book.id) {
                Some(txn) => Some(BorrowedBook {
                    book: book.clone(),
                    transaction: txn.clone(),
                }),
                None => {
                    warn!("Book {} is marked borrowed but has no open loan", book.id);
                    None
                }
            })
            .collect()
    }

    /// Open loans more than two weeks overdue, as of the current time
    pub fn list_overdue_members(&self) -> Vec<OverdueLoan> {
        self.list_overdue_members_at(Utc::now())
    }

    /// Open loans more than two weeks overdue, as of `now`
    ///
    /// A member appears once per overdue loan. Loans whose member record
    /// is gone are left out.
    pub fn list_overdue_members_at(&self, now: DateTime<Utc>) -> Vec<OverdueLoan> {
        self.transactions
            .iter()
            .filter(|t| t.is_open() && t.overdue_days_at(now) > OVERDUE_REPORT_THRESHOLD_DAYS)
            .filter_map(|txn| {
                let member = self.find_member(&txn.member_id)?;
                Some(OverdueLoan {
                    member: member.clone(),
                    transaction: txn.clone(),
                    overdue_days: txn.overdue_days_at(now),
                    fee: txn.overdue_fee_at(now),
                })
            })
            .collect()
    }

    /// Index of a book by exact id, else by first title containing `identifier`
    fn resolve_book(&self, identifier: &str) -> Option<usize> {
        self.books
            .iter()
            .position(|b| b.id == identifier)
            .or_else(|| self.books.iter().position(|b| b.title.contains(identifier)))
    }

    /// Index of the newest open transaction for a book
    fn open_transaction_index(&self, book_id: &str) -> Option<usize> {
        self.transactions
            .iter()
            .rposition(|t| t.book_id == book_id && t.is_open())
    }
}
