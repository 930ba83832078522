//! Catalog operations
//!
//! Add, edit, delete, look up and list books and members. Ids are unique
//! within each collection. Every successful mutation flushes the
//! collection it changed.

use tracing::{debug, warn};

use crate::error::{LibraryError, LibraryResult, RecordKind};
use crate::models::{Book, Member};
use crate::store::{Collection, Store};

impl Store {
    // ==================== Book Operations ====================

    /// Add a new book
    pub fn add_book(&mut self, book: Book) -> LibraryResult<()> {
        if book.id.is_empty() {
            return Err(LibraryError::MissingField("id"));
        }
        if self.find_book(&book.id).is_some() {
            return Err(LibraryError::DuplicateKey {
                kind: RecordKind::Book,
                id: book.id,
            });
        }

        debug!("Adding book {}", book.id);
        self.books.push(book);
        self.flush(&[Collection::Books])?;
        Ok(())
    }

    /// Replace a book's title, author and genre
    ///
    /// The id and availability of the stored record are kept.
    pub fn edit_book(&mut self, id: &str, updated: &Book) -> LibraryResult<()> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| LibraryError::book_not_found(id))?;

        book.title = updated.title.clone();
        book.author = updated.author.clone();
        book.genre = updated.genre.clone();

        debug!("Edited book {}", id);
        self.flush(&[Collection::Books])?;
        Ok(())
    }

    /// Delete a book, returning the removed record
    ///
    /// Borrowed books can be deleted; their open transaction stays behind.
    pub fn delete_book(&mut self, id: &str) -> LibraryResult<Book> {
        let pos = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| LibraryError::book_not_found(id))?;

        let book = self.books.remove(pos);
        if !book.available {
            warn!("Deleted book {} while it is on loan", id);
        }

        self.flush(&[Collection::Books])?;
        Ok(book)
    }

    /// Find a book by exact id
    pub fn find_book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Books whose id equals `query` or whose title contains it
    ///
    /// Matching is case-sensitive.
    pub fn search_books(&self, query: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.id == query || b.title.contains(query))
            .cloned()
            .collect()
    }

    /// Copy of every book, in storage order
    pub fn list_all_books(&self) -> Vec<Book> {
        self.books.clone()
    }

    /// Books that are not out on loan
    pub fn list_available_books(&self) -> Vec<Book> {
        self.books.iter().filter(|b| b.available).cloned().collect()
    }

    // ==================== Member Operations ====================

    /// Add a new member
    pub fn add_member(&mut self, member: Member) -> LibraryResult<()> {
        if member.id.is_empty() {
            return Err(LibraryError::MissingField("id"));
        }
        if self.find_member(&member.id).is_some() {
            return Err(LibraryError::DuplicateKey {
                kind: RecordKind::Member,
                id: member.id,
            });
        }

        debug!("Adding member {}", member.id);
        self.members.push(member);
        self.flush(&[Collection::Members])?;
        Ok(())
    }

    /// Replace a member's name, address and phone
    pub fn edit_member(&mut self, id: &str, updated: &Member) -> LibraryResult<()> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| LibraryError::member_not_found(id))?;

        member.name = updated.name.clone();
        member.address = updated.address.clone();
        member.phone = updated.phone.clone();

        debug!("Edited member {}", id);
        self.flush(&[Collection::Members])?;
        Ok(())
    }

    /// Delete a member, returning the removed record
    ///
    /// Transactions that reference the member are left untouched.
    pub fn delete_member(&mut self, id: &str) -> LibraryResult<Member> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| LibraryError::member_not_found(id))?;

        let member = self.members.remove(pos);
        if self
            .transactions
            .iter()
            .any(|t| t.member_id == id && t.is_open())
        {
            warn!("Deleted member {} with books still on loan", id);
        }

        self.flush(&[Collection::Members])?;
        Ok(member)
    }

    /// Find a member by exact id
    pub fn find_member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Members whose id equals `query` or whose name contains it
    pub fn search_members(&self, query: &str) -> Vec<Member> {
        self.members
            .iter()
            .filter(|m| m.id == query || m.name.contains(query))
            .cloned()
            .collect()
    }

    /// Copy of every member, in storage order
    pub fn list_all_members(&self) -> Vec<Member> {
        self.members.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    fn open_store(temp_dir: &TempDir) -> Store {
        Store::open_with_config(Config {
            data_dir: temp_dir.path().to_path_buf(),
            log_file: None,
        })
        .unwrap()
    }

    fn dune() -> Book {
        Book::new("B1", "Dune", "Herbert", "SciFi")
    }

    #[test]
    fn test_add_book_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        store.add_book(dune()).unwrap();

        let books = store.list_all_books();
        assert_eq!(books, vec![dune()]);
        assert!(books[0].available);
    }

    #[test]
    fn test_add_book_persists() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        store.add_book(dune()).unwrap();

        let content = fs::read_to_string(temp_dir.path().join("books.txt")).unwrap();
        assert_eq!(content, "B1,Dune,Herbert,SciFi,Available\n");
    }

    #[test]
    fn test_add_duplicate_book_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        store.add_book(dune()).unwrap();

        let err = store
            .add_book(Book::new("B1", "Other", "Someone", "Drama"))
            .unwrap_err();

        assert!(matches!(
            err,
            LibraryError::DuplicateKey {
                kind: RecordKind::Book,
                ..
            }
        ));
        assert_eq!(store.list_all_books(), vec![dune()]);
    }

    #[test]
    fn test_add_book_requires_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let err = store.add_book(Book::new("", "Untitled", "", "")).unwrap_err();
        assert!(matches!(err, LibraryError::MissingField("id")));
        assert!(store.books().is_empty());
    }

    #[test]
    fn test_edit_book() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        store.add_book(dune()).unwrap();

        store
            .edit_book("B1", &Book::new("B1", "Dune Messiah", "F. Herbert", "SF"))
            .unwrap();

        let book = store.find_book("B1").unwrap();
        assert_eq!(book.title, "Dune Messiah");
        assert_eq!(book.author, "F. Herbert");
        assert_eq!(book.genre, "SF");
    }

    #[test]
    fn test_edit_book_keeps_availability() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let mut book = dune();
        book.available = false;
        store.add_book(book).unwrap();

        store
            .edit_book("B1", &Book::new("B1", "Dune", "Herbert", "Classic"))
            .unwrap();

        assert!(!store.find_book("B1").unwrap().available);
    }

    #[test]
    fn test_edit_missing_book_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let err = store.edit_book("B9", &dune()).unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[test]
    fn test_delete_book() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        store.add_book(dune()).unwrap();

        let removed = store.delete_book("B1").unwrap();
        assert_eq!(removed.id, "B1");
        assert!(store.find_book("B1").is_none());

        let content = fs::read_to_string(temp_dir.path().join("books.txt")).unwrap();
        assert!(content.is_empty());

        let err = store.delete_book("B1").unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[test]
    fn test_search_books() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        store.add_book(dune()).unwrap();
        store
            .add_book(Book::new("B2", "Emma", "Austen", "Classic"))
            .unwrap();

        let results = store.search_books("Dun");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "B1");

        assert!(store.search_books("Z9").is_empty());
        // Exact id match
        assert_eq!(store.search_books("B2")[0].title, "Emma");
        // Case-sensitive
        assert!(store.search_books("dune").is_empty());
    }

    #[test]
    fn test_search_books_multiple_matches() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        store.add_book(dune()).unwrap();
        store
            .add_book(Book::new("B2", "Dune Messiah", "Herbert", "SciFi"))
            .unwrap();

        let ids: Vec<_> = store
            .search_books("Dune")
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["B1", "B2"]);
    }

    #[test]
    fn test_list_available_books() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let mut borrowed = Book::new("B2", "Emma", "Austen", "Classic");
        borrowed.available = false;
        store.add_book(dune()).unwrap();
        store.add_book(borrowed).unwrap();

        let available = store.list_available_books();
        assert_eq!(available, vec![dune()]);
    }

    #[test]
    fn test_member_crud() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        store
            .add_member(Member::new("M1", "Ada Lovelace", "12 Loop Rd", "0700"))
            .unwrap();
        let err = store
            .add_member(Member::new("M1", "Someone", "", ""))
            .unwrap_err();
        assert!(matches!(
            err,
            LibraryError::DuplicateKey {
                kind: RecordKind::Member,
                ..
            }
        ));

        store
            .edit_member("M1", &Member::new("M1", "Ada King", "1 New St", "0711"))
            .unwrap();
        let member = store.find_member("M1").unwrap();
        assert_eq!(member.name, "Ada King");
        assert_eq!(member.address, "1 New St");
        assert_eq!(member.phone, "0711");

        let content = fs::read_to_string(temp_dir.path().join("members.txt")).unwrap();
        assert_eq!(content, "M1,Ada King,1 New St,0711\n");

        store.delete_member("M1").unwrap();
        assert!(store.list_all_members().is_empty());
        assert!(matches!(
            store.delete_member("M1").unwrap_err(),
            LibraryError::NotFound { .. }
        ));
    }

    #[test]
    fn test_edit_missing_member_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        store
            .add_member(Member::new("M1", "Ada", "12 Loop Rd", "0700"))
            .unwrap();

        let err = store
            .edit_member("M9", &Member::new("M9", "Nobody", "", ""))
            .unwrap_err();
        assert!(matches!(
            err,
            LibraryError::NotFound {
                kind: RecordKind::Member,
                ref id,
            } if id == "M9"
        ));
        assert_eq!(store.find_member("M1").unwrap().name, "Ada");
        assert!(store.find_member("M9").is_none());
    }

    #[test]
    fn test_search_members() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        store
            .add_member(Member::new("M1", "Ada Lovelace", "Addr", "1"))
            .unwrap();
        store
            .add_member(Member::new("M2", "Alan Turing", "Addr", "2"))
            .unwrap();

        assert_eq!(store.search_members("Love")[0].id, "M1");
        assert_eq!(store.search_members("M2")[0].name, "Alan Turing");
        assert_eq!(store.search_members("A").len(), 2);
        assert!(store.search_members("Grace").is_empty());
    }

    #[test]
    fn test_catalog_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&temp_dir);
            store.add_book(dune()).unwrap();
            store
                .add_member(Member::new("M1", "Ada", "Addr", "1"))
                .unwrap();
        }

        let store = open_store(&temp_dir);
        assert_eq!(store.list_all_books(), vec![dune()]);
        assert_eq!(store.find_member("M1").unwrap().name, "Ada");
    }
}
