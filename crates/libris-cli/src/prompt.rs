//! Interactive prompts for one-shot commands
//!
//! Reads answers from stdin. The menu has its own reader so it can be
//! driven from any input source.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Prompt with a default value, returns None if user keeps default
pub fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    if default.is_empty() {
        print!("{}: ", prompt);
    } else {
        print!("{} [{}]: ", prompt, default);
    }
    io::stdout().flush()?;

    let stdin = io::stdin();
    Ok(keep_or_replace(&read_answer(&mut stdin.lock())?))
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let stdin = io::stdin();
    Ok(is_yes(&read_answer(&mut stdin.lock())?))
}

fn read_answer(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// An empty answer keeps the current value
fn keep_or_replace(answer: &str) -> Option<String> {
    if answer.is_empty() {
        None
    } else {
        Some(answer.to_string())
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.to_lowercase();
    answer == "y" || answer == "yes"
}
