//! Libris CLI
//!
//! Command-line interface for Libris - library catalog and circulation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use libris_core::{Config, LibraryError, StorageError, Store};

mod commands;
mod logging;
mod menu;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "libris")]
#[command(about = "Libris - Library catalog, members and loans")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Menu,
    /// Manage books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Manage members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Lend a book to a member
    Borrow {
        /// Member ID
        member_id: String,
        /// Book ID
        book_id: String,
    },
    /// Return a borrowed book
    Return {
        /// Book ID or part of its title
        identifier: String,
    },
    /// List members with overdue books
    Overdue,
    /// Show record counts and storage usage
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookCommands {
    /// Add a book
    Add {
        /// Book ID
        id: String,
        /// Title
        #[arg(short = 'T', long)]
        title: String,
        /// Author
        #[arg(short, long)]
        author: String,
        /// Genre
        #[arg(short, long)]
        genre: String,
    },
    /// Edit a book (prompts when no field is given)
    Edit {
        /// Book ID
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New author
        #[arg(short, long)]
        author: Option<String>,
        /// New genre
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List books
    #[command(alias = "ls")]
    List {
        /// Only books on the shelf
        #[arg(long, conflicts_with = "borrowed")]
        available: bool,
        /// Only books on loan, with their transactions
        #[arg(long)]
        borrowed: bool,
    },
    /// Search books by ID or title
    Search {
        /// Search query
        query: String,
    },
    /// Show book details
    Show {
        /// Book ID
        id: String,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Register a member
    Add {
        /// Member ID
        id: String,
        /// Name
        #[arg(short, long)]
        name: String,
        /// Address
        #[arg(short, long)]
        address: String,
        /// Phone number
        #[arg(short, long)]
        phone: String,
    },
    /// Edit a member (prompts when no field is given)
    Edit {
        /// Member ID
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New address
        #[arg(short, long)]
        address: Option<String>,
        /// New phone number
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Delete a member
    #[command(alias = "rm")]
    Delete {
        /// Member ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List all members
    #[command(alias = "ls")]
    List,
    /// Search members by ID or name
    Search {
        /// Search query
        query: String,
    },
    /// Show member details and open loans
    Show {
        /// Member ID
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output);
    if let Err(ref e) = result {
        if let Some(hint) = recovery_hint(e) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init(&config);

    let mut store = Store::open_with_config(config)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => menu::run(&mut store),
        Commands::Book { command } => handle_book_command(command, &mut store, output),
        Commands::Member { command } => handle_member_command(command, &mut store, output),
        Commands::Borrow { member_id, book_id } => {
            commands::loan::borrow(&mut store, member_id, book_id, output)
        }
        Commands::Return { identifier } => {
            commands::loan::return_book(&mut store, identifier, output)
        }
        Commands::Overdue => commands::loan::overdue(&store, output),
        Commands::Status => commands::status::show(&store, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_book_command(command: BookCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        BookCommands::Add {
            id,
            title,
            author,
            genre,
        } => commands::book::add(store, id, title, author, genre, output),
        BookCommands::Edit {
            id,
            title,
            author,
            genre,
        } => commands::book::edit(store, id, title, author, genre, output),
        BookCommands::Delete { id, yes } => commands::book::delete(store, id, yes, output),
        BookCommands::List {
            available,
            borrowed,
        } => commands::book::list(store, available, borrowed, output),
        BookCommands::Search { query } => commands::book::search(store, query, output),
        BookCommands::Show { id } => commands::book::show(store, id, output),
    }
}

fn handle_member_command(
    command: MemberCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        MemberCommands::Add {
            id,
            name,
            address,
            phone,
        } => commands::member::add(store, id, name, address, phone, output),
        MemberCommands::Edit {
            id,
            name,
            address,
            phone,
        } => commands::member::edit(store, id, name, address, phone, output),
        MemberCommands::Delete { id, yes } => commands::member::delete(store, id, yes, output),
        MemberCommands::List => commands::member::list(store, output),
        MemberCommands::Search { query } => commands::member::search(store, query, output),
        MemberCommands::Show { id } => commands::member::show(store, id, output),
    }
}

/// Recovery advice for storage failures anywhere in the error chain
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(LibraryError::Storage(storage)) = cause.downcast_ref::<LibraryError>() {
            return storage.recovery_suggestion();
        }
        cause
            .downcast_ref::<StorageError>()
            .and_then(StorageError::recovery_suggestion)
    })
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_recovery_hint_found_through_context() {
        let storage = StorageError::InvalidRecord {
            path: PathBuf::from("/data/books.txt"),
            line: 2,
            details: "expected 5 fields, found 1".to_string(),
        };
        let err = Err::<(), _>(LibraryError::from(storage))
            .context("Failed to add book")
            .unwrap_err();
        assert!(recovery_hint(&err).is_some());

        let plain = anyhow::anyhow!("Book not found: B1");
        assert!(recovery_hint(&plain).is_none());
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["libris"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_flags_conflict() {
        let result = Cli::try_parse_from(["libris", "book", "list", "--available", "--borrowed"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "libris", "borrow", "M1", "B1", "--json", "--config", "/tmp/libris.toml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/libris.toml")));
        match cli.command {
            Some(Commands::Borrow { member_id, book_id }) => {
                assert_eq!(member_id, "M1");
                assert_eq!(book_id, "B1");
            }
            _ => panic!("expected borrow command"),
        }
    }
}
