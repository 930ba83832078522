//! CLI command handlers

pub mod book;
pub mod config;
pub mod loan;
pub mod member;
pub mod status;
