//! Status command handler

use anyhow::Result;

use libris_core::Store;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let stats = store.stats();
    let config = store.config();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "storage": {
                        "books_size": stats.storage.books_size,
                        "members_size": stats.storage.members_size,
                        "transactions_size": stats.storage.transactions_size,
                        "total_size": stats.storage.total_size()
                    },
                    "counts": {
                        "books": stats.books,
                        "available_books": stats.available_books,
                        "members": stats.members,
                        "transactions": stats.transactions,
                        "open_loans": stats.open_loans
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Libris Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {}", stats.storage.total_size_human());
            println!();
            println!("Contents:");
            println!(
                "  Books:        {} ({} available)",
                stats.books, stats.available_books
            );
            println!("  Members:      {}", stats.members);
            println!("  Transactions: {}", stats.transactions);
            println!("  Open loans:   {}", stats.open_loans);
            if store.is_empty() {
                println!();
                println!("No records yet. Run `libris` to open the menu.");
            }
        }
    }

    Ok(())
}
