//! Borrow and return command handlers

use anyhow::{Context, Result};

use libris_core::{Store, FEE_CURRENCY};

use crate::output::{format_date, Output};

/// Lend a book to a member
pub fn borrow(
    store: &mut Store,
    member_id: String,
    book_id: String,
    output: &Output,
) -> Result<()> {
    let txn_id = store
        .borrow_book(&member_id, &book_id)
        .context("Failed to borrow book")?;

    if output.is_quiet() {
        println!("{}", txn_id);
        return Ok(());
    }

    output.success(&format!("Book borrowed. Transaction ID: {}", txn_id));
    if let Some(txn) = store.find_transaction(&txn_id) {
        output.message(&format!("Due back on {}", format_date(txn.due_at)));
    }

    Ok(())
}

/// Return a book by id or title
pub fn return_book(store: &mut Store, identifier: String, output: &Output) -> Result<()> {
    let txn = store
        .return_book(&identifier)
        .context("Failed to return book")?;

    output.success(&format!(
        "Returned book {} (transaction {})",
        txn.book_id, txn.id
    ));

    let days = txn.overdue_days();
    if days > 0 {
        output.message(&format!(
            "Returned {} day(s) late. Overdue Fee: {} {:.2}",
            days,
            FEE_CURRENCY,
            txn.overdue_fee()
        ));
    }

    Ok(())
}

/// Report members holding overdue books
pub fn overdue(store: &Store, output: &Output) -> Result<()> {
    output.print_overdue(&store.list_overdue_members());
    Ok(())
}
