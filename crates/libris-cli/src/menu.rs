//! Interactive numbered menu
//!
//! Runs until the user picks Exit or input ends. Any operation failure is
//! printed as a single `Error: ...` line and the loop carries on.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use crossterm::{
    cursor::MoveTo,
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use libris_core::{Book, Member, Store};

use crate::output::{book_line, borrowed_block, member_line, overdue_line};

/// Run the menu on stdin/stdout
pub fn run(store: &mut Store) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(store, stdin.lock(), stdout.lock()).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuCommand {
    AddBook,
    EditBook,
    DeleteBook,
    ViewBooks,
    AddMember,
    EditMember,
    DeleteMember,
    ViewMembers,
    BorrowBook,
    ReturnBook,
    SearchBooks,
    SearchMembers,
    ViewAvailable,
    ViewBorrowed,
    ViewOverdue,
    ClearScreen,
    Exit,
}

impl MenuCommand {
    /// Display order
    const ALL: [MenuCommand; 17] = [
        MenuCommand::AddBook,
        MenuCommand::EditBook,
        MenuCommand::DeleteBook,
        MenuCommand::ViewBooks,
        MenuCommand::AddMember,
        MenuCommand::EditMember,
        MenuCommand::DeleteMember,
        MenuCommand::ViewMembers,
        MenuCommand::BorrowBook,
        MenuCommand::ReturnBook,
        MenuCommand::SearchBooks,
        MenuCommand::SearchMembers,
        MenuCommand::ViewAvailable,
        MenuCommand::ViewBorrowed,
        MenuCommand::ViewOverdue,
        MenuCommand::ClearScreen,
        MenuCommand::Exit,
    ];

    fn number(self) -> u8 {
        match self {
            MenuCommand::Exit => 0,
            MenuCommand::AddBook => 1,
            MenuCommand::EditBook => 2,
            MenuCommand::DeleteBook => 3,
            MenuCommand::ViewBooks => 4,
            MenuCommand::AddMember => 5,
            MenuCommand::EditMember => 6,
            MenuCommand::DeleteMember => 7,
            MenuCommand::ViewMembers => 8,
            MenuCommand::BorrowBook => 9,
            MenuCommand::ReturnBook => 10,
            MenuCommand::SearchBooks => 11,
            MenuCommand::SearchMembers => 12,
            MenuCommand::ViewAvailable => 13,
            MenuCommand::ViewBorrowed => 14,
            MenuCommand::ViewOverdue => 15,
            MenuCommand::ClearScreen => 16,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuCommand::AddBook => "Add Book",
            MenuCommand::EditBook => "Edit Book",
            MenuCommand::DeleteBook => "Delete Book",
            MenuCommand::ViewBooks => "View All Books",
            MenuCommand::AddMember => "Add Member",
            MenuCommand::EditMember => "Edit Member",
            MenuCommand::DeleteMember => "Delete Member",
            MenuCommand::ViewMembers => "View All Members",
            MenuCommand::BorrowBook => "Borrow Book",
            MenuCommand::ReturnBook => "Return Book",
            MenuCommand::SearchBooks => "Search Books",
            MenuCommand::SearchMembers => "Search Members",
            MenuCommand::ViewAvailable => "View Available Books",
            MenuCommand::ViewBorrowed => "View Borrowed Books",
            MenuCommand::ViewOverdue => "View Overdue Members",
            MenuCommand::ClearScreen => "Clear Screen",
            MenuCommand::Exit => "Exit",
        }
    }

    fn parse(input: &str) -> Option<Self> {
        let number: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|c| c.number() == number)
    }
}

/// Menu session over any line source and sink
pub struct Menu<'a, R, W> {
    store: &'a mut Store,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut Store, input: R, out: W) -> Self {
        Self { store, input, out }
    }

    /// Process commands until Exit or end of input
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.display_menu()?;

            let choice = match self.read_line() {
                Ok(Some(choice)) => choice,
                Ok(None) => {
                    writeln!(self.out, "\nExiting...")?;
                    return Ok(());
                }
                Err(e) => {
                    if !self.report_read_error(e)? {
                        return Ok(());
                    }
                    continue;
                }
            };

            match MenuCommand::parse(&choice) {
                Some(MenuCommand::Exit) => {
                    writeln!(self.out, "Exiting...")?;
                    return Ok(());
                }
                Some(MenuCommand::ClearScreen) => {
                    clear_screen(&mut self.out)?;
                    continue;
                }
                Some(command) => {
                    if let Err(e) = self.execute(command) {
                        writeln!(self.out, "Error: {}", e)?;
                    }
                }
                None => writeln!(self.out, "Invalid choice. Please try again.")?,
            }

            write!(self.out, "Press Enter to continue...")?;
            self.out.flush()?;
            if let Err(e) = self.read_line() {
                if !self.report_read_error(e)? {
                    return Ok(());
                }
            }
        }
    }

    /// Print a failed read; returns whether the session can go on
    ///
    /// A line that is not valid UTF-8 has already been consumed, so the
    /// next read sees fresh input. Any other I/O failure ends the session.
    fn report_read_error(&mut self, e: io::Error) -> Result<bool> {
        writeln!(self.out, "\nError: {}", e)?;
        if e.kind() == io::ErrorKind::InvalidData {
            return Ok(true);
        }
        writeln!(self.out, "Exiting...")?;
        Ok(false)
    }

    fn display_menu(&mut self) -> Result<()> {
        writeln!(self.out, "\nLibrary Management System")?;
        for command in MenuCommand::ALL {
            writeln!(self.out, "{}. {}", command.number(), command.label())?;
        }
        write!(self.out, "Enter your choice: ")?;
        self.out.flush()?;
        Ok(())
    }

    fn execute(&mut self, command: MenuCommand) -> Result<()> {
        match command {
            MenuCommand::AddBook => {
                let id = self.ask("Enter Book ID: ")?;
                let title = self.ask("Enter Title: ")?;
                let author = self.ask("Enter Author: ")?;
                let genre = self.ask("Enter Genre: ")?;
                self.store.add_book(Book::new(id, title, author, genre))?;
                writeln!(self.out, "Book added successfully.")?;
            }
            MenuCommand::EditBook => {
                let id = self.ask("Enter Book ID to edit: ")?;
                let title = self.ask("Enter new Title: ")?;
                let author = self.ask("Enter new Author: ")?;
                let genre = self.ask("Enter new Genre: ")?;
                let updated = Book::new(id.clone(), title, author, genre);
                self.store.edit_book(&id, &updated)?;
                writeln!(self.out, "Book edited successfully.")?;
            }
            MenuCommand::DeleteBook => {
                let id = self.ask("Enter Book ID to delete: ")?;
                self.store.delete_book(&id)?;
                writeln!(self.out, "Book deleted successfully.")?;
            }
            MenuCommand::ViewBooks => {
                let books = self.store.list_all_books();
                self.write_books(&books)?;
            }
            MenuCommand::AddMember => {
                let id = self.ask("Enter Member ID: ")?;
                let name = self.ask("Enter Name: ")?;
                let address = self.ask("Enter Address: ")?;
                let phone = self.ask("Enter Phone Number: ")?;
                self.store
                    .add_member(Member::new(id, name, address, phone))?;
                writeln!(self.out, "Member added successfully.")?;
            }
            MenuCommand::EditMember => {
                let id = self.ask("Enter Member ID to edit: ")?;
                let name = self.ask("Enter new Name: ")?;
                let address = self.ask("Enter new Address: ")?;
                let phone = self.ask("Enter new Phone Number: ")?;
                let updated = Member::new(id.clone(), name, address, phone);
                self.store.edit_member(&id, &updated)?;
                writeln!(self.out, "Member edited successfully.")?;
            }
            MenuCommand::DeleteMember => {
                let id = self.ask("Enter Member ID to delete: ")?;
                self.store.delete_member(&id)?;
                writeln!(self.out, "Member deleted successfully.")?;
            }
            MenuCommand::ViewMembers => {
                let members = self.store.list_all_members();
                self.write_members(&members)?;
            }
            MenuCommand::BorrowBook => {
                let member_id = self.ask("Enter Member ID: ")?;
                let book_id = self.ask("Enter Book ID: ")?;
                let txn_id = self.store.borrow_book(&member_id, &book_id)?;
                writeln!(
                    self.out,
                    "Book borrowed successfully. Transaction ID: {}",
                    txn_id
                )?;
            }
            MenuCommand::ReturnBook => {
                let identifier = self.ask("Enter Book ID or Title to return: ")?;
                self.store.return_book(&identifier)?;
                writeln!(self.out, "Book returned successfully.")?;
            }
            MenuCommand::SearchBooks => {
                let query = self.ask("Enter search query for books (ID or Title): ")?;
                let books = self.store.search_books(&query);
                self.write_books(&books)?;
            }
            MenuCommand::SearchMembers => {
                let query = self.ask("Enter search query for members (ID or Name): ")?;
                let members = self.store.search_members(&query);
                self.write_members(&members)?;
            }
            MenuCommand::ViewAvailable => {
                let books = self.store.list_available_books();
                self.write_books(&books)?;
            }
            MenuCommand::ViewBorrowed => {
                let borrowed = self.store.list_borrowed_with_transactions();
                if borrowed.is_empty() {
                    writeln!(self.out, "No books are currently borrowed.")?;
                } else {
                    writeln!(self.out, "Borrowed Books:")?;
                    let now = chrono::Utc::now();
                    for entry in &borrowed {
                        writeln!(self.out, "{}", borrowed_block(entry, now))?;
                    }
                }
            }
            MenuCommand::ViewOverdue => {
                let overdue = self.store.list_overdue_members();
                if overdue.is_empty() {
                    writeln!(self.out, "No overdue loans.")?;
                }
                for entry in &overdue {
                    writeln!(self.out, "{}", overdue_line(entry))?;
                }
            }
            MenuCommand::ClearScreen | MenuCommand::Exit => {}
        }
        Ok(())
    }

    fn write_books(&mut self, books: &[Book]) -> Result<()> {
        if books.is_empty() {
            writeln!(self.out, "No books found.")?;
        }
        for book in books {
            writeln!(self.out, "{}", book_line(book))?;
        }
        Ok(())
    }

    fn write_members(&mut self, members: &[Member]) -> Result<()> {
        if members.is_empty() {
            writeln!(self.out, "No members found.")?;
        }
        for member in members {
            writeln!(self.out, "{}", member_line(member))?;
        }
        Ok(())
    }

    /// Prompt for one field
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        match self.read_line()? {
            Some(answer) => Ok(answer),
            None => bail!("Input ended before all fields were entered."),
        }
    }

    /// Next input line without its line ending; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn clear_screen(out: &mut impl Write) -> Result<()> {
    out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}
