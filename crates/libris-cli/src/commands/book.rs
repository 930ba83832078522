//! Book command handlers

use anyhow::{anyhow, Context, Result};

use libris_core::{Book, Store};

use crate::output::Output;
use crate::prompt::{confirm, prompt_with_default};

/// Add a new book
pub fn add(
    store: &mut Store,
    id: String,
    title: String,
    author: String,
    genre: String,
    output: &Output,
) -> Result<()> {
    let book = Book::new(id, title, author, genre);
    store.add_book(book.clone()).context("Failed to add book")?;

    output.success(&format!("Added book: {}", book.id));
    output.print_book(&book, None);

    Ok(())
}

/// Edit a book's title, author and genre
///
/// With no field flags and an interactive output, prompts for each field.
pub fn edit(
    store: &mut Store,
    id: String,
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut book = store
        .find_book(&id)
        .cloned()
        .ok_or_else(|| anyhow!("Book not found: {}", id))?;

    if title.is_none() && author.is_none() && genre.is_none() && output.should_prompt() {
        println!("Editing book: {}", book.id);
        println!("Press Enter to keep current value, or type new value.\n");

        if let Some(new_title) = prompt_with_default("Title", &book.title)? {
            book.title = new_title;
        }
        if let Some(new_author) = prompt_with_default("Author", &book.author)? {
            book.author = new_author;
        }
        if let Some(new_genre) = prompt_with_default("Genre", &book.genre)? {
            book.genre = new_genre;
        }
    } else {
        if let Some(title) = title {
            book.title = title;
        }
        if let Some(author) = author {
            book.author = author;
        }
        if let Some(genre) = genre {
            book.genre = genre;
        }
    }

    store.edit_book(&id, &book).context("Failed to update book")?;

    output.success("Book updated");
    output.print_book(&book, store.open_transaction_for(&id));

    Ok(())
}

/// Delete a book
pub fn delete(store: &mut Store, id: String, yes: bool, output: &Output) -> Result<()> {
    let book = store
        .find_book(&id)
        .ok_or_else(|| anyhow!("Book not found: {}", id))?;

    if output.should_prompt() && !yes {
        println!("Delete book: {} - {}", book.id, book.title);
        if !book.available {
            println!("This book is currently on loan.");
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_book(&id).context("Failed to delete book")?;

    output.success(&format!("Deleted book: {}", id));

    Ok(())
}

/// List books, optionally only those on the shelf or those on loan
pub fn list(store: &Store, available: bool, borrowed: bool, output: &Output) -> Result<()> {
    if borrowed {
        output.print_borrowed(&store.list_borrowed_with_transactions());
    } else if available {
        output.print_books(&store.list_available_books());
    } else {
        output.print_books(&store.list_all_books());
    }
    Ok(())
}

/// Search books by id or title
pub fn search(store: &Store, query: String, output: &Output) -> Result<()> {
    output.print_books(&store.search_books(&query));
    Ok(())
}

/// Show a single book
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let book = store
        .find_book(&id)
        .ok_or_else(|| anyhow!("Book not found: {}", id))?;

    output.print_book(book, store.open_transaction_for(&id));
    Ok(())
}
