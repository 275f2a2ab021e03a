//! Output handling for CLI
//!
//! Results go to stdout; logs and errors go to stderr.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write a value as pretty JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}
