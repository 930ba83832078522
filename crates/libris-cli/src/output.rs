//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! The line formatters are shared with the interactive menu.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use libris_core::{Book, BorrowedBook, Member, OverdueLoan, Transaction, FEE_CURRENCY};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print a single book, with its active loan if any
    pub fn print_book(&self, book: &Book, loan: Option<&Transaction>) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", book.id);
                println!("Title:   {}", book.title);
                println!("Author:  {}", book.author);
                println!("Genre:   {}", book.genre);
                println!("Status:  {}", book.status());
                if let Some(txn) = loan {
                    println!();
                    println!("── Active loan ──");
                    println!("{}", loan_summary(txn, Utc::now()));
                }
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({ "book": book, "loan": loan }));
            }
            OutputFormat::Quiet => println!("{}", book.id),
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    println!("{}", book_row(book));
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => print_json(books),
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print a single member, with their open loans
    pub fn print_member(&self, member: &Member, loans: &[&Transaction]) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", member.id);
                println!("Name:    {}", member.name);
                println!("Address: {}", member.address);
                println!("Phone:   {}", member.phone);
                if !loans.is_empty() {
                    println!();
                    println!("── Open loans ({}) ──", loans.len());
                    let now = Utc::now();
                    for txn in loans {
                        println!("{}", loan_summary(txn, now));
                    }
                }
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({ "member": member, "loans": loans }));
            }
            OutputFormat::Quiet => println!("{}", member.id),
        }
    }

    /// Print a list of members
    pub fn print_members(&self, members: &[Member]) {
        match self.format {
            OutputFormat::Human => {
                if members.is_empty() {
                    println!("No members found.");
                    return;
                }
                for member in members {
                    println!("{}", member_row(member));
                }
                println!("\n{} member(s)", members.len());
            }
            OutputFormat::Json => print_json(members),
            OutputFormat::Quiet => {
                for member in members {
                    println!("{}", member.id);
                }
            }
        }
    }

    /// Print books on loan with their transactions
    pub fn print_borrowed(&self, borrowed: &[BorrowedBook]) {
        match self.format {
            OutputFormat::Human => {
                if borrowed.is_empty() {
                    println!("No books are currently borrowed.");
                    return;
                }
                println!("Borrowed Books:");
                let now = Utc::now();
                for entry in borrowed {
                    println!("{}", borrowed_block(entry, now));
                }
            }
            OutputFormat::Json => print_json(borrowed),
            OutputFormat::Quiet => {
                for entry in borrowed {
                    println!("{}", entry.book.id);
                }
            }
        }
    }

    /// Print members holding overdue loans
    pub fn print_overdue(&self, overdue: &[OverdueLoan]) {
        match self.format {
            OutputFormat::Human => {
                if overdue.is_empty() {
                    println!("No overdue loans.");
                    return;
                }
                for entry in overdue {
                    println!("{}", overdue_line(entry));
                }
            }
            OutputFormat::Json => print_json(overdue),
            OutputFormat::Quiet => {
                for entry in overdue {
                    println!("{}", entry.member.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

/// Full book record on one line
pub fn book_line(book: &Book) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        book.id,
        book.title,
        book.author,
        book.genre,
        book.status()
    )
}

/// Full member record on one line
pub fn member_line(member: &Member) -> String {
    format!(
        "{} | {} | {} | {}",
        member.id, member.name, member.address, member.phone
    )
}

/// Book list row with long text cut to fit
fn book_row(book: &Book) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        book.id,
        truncate(&book.title, 35),
        truncate(&book.author, 25),
        book.genre,
        book.status()
    )
}

/// Member list row with long text cut to fit
fn member_row(member: &Member) -> String {
    format!(
        "{} | {} | {} | {}",
        member.id,
        truncate(&member.name, 30),
        truncate(&member.address, 35),
        member.phone
    )
}

/// Detail block for a borrowed book
pub fn borrowed_block(entry: &BorrowedBook, now: DateTime<Utc>) -> String {
    let txn = &entry.transaction;
    format!(
        "Book: {} (ID: {})\n  Borrowed by Member ID: {}\n  Transaction ID: {}\n  Borrow Date: {}\n  Expected Return Date: {}\n  Days Overdue: {}\n  Overdue Fee: {} {:.2}\n",
        entry.book.title,
        entry.book.id,
        txn.member_id,
        txn.id,
        format_date(txn.borrowed_at),
        format_date(txn.due_at),
        txn.overdue_days_at(now),
        FEE_CURRENCY,
        txn.overdue_fee_at(now)
    )
}

/// One-line overdue report entry
pub fn overdue_line(entry: &OverdueLoan) -> String {
    format!(
        "{} | Book: {} | {} day(s) overdue | Overdue Fee: {} {:.2}",
        member_line(&entry.member),
        entry.transaction.book_id,
        entry.overdue_days,
        FEE_CURRENCY,
        entry.fee
    )
}

/// Short description of an open loan
fn loan_summary(txn: &Transaction, now: DateTime<Utc>) -> String {
    let days = txn.overdue_days_at(now);
    let mut line = format!(
        "Transaction {}: book {} to member {}, due {}",
        txn.id,
        txn.book_id,
        txn.member_id,
        format_date(txn.due_at)
    );
    if days > 0 {
        line.push_str(&format!(
            " ({} day(s) overdue, {} {:.2})",
            days,
            FEE_CURRENCY,
            txn.overdue_fee_at(now)
        ));
    }
    line
}

/// Render a timestamp as a local calendar date
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
