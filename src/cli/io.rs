//! Event I/O for the `invoke` command
//!
//! - Input: one JSON event from a file or stdin
//! - Output: one JSON line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use super::errors::{CliError, CliResult};

/// Read the event text from `path`, or all of stdin when absent
pub fn read_event(path: Option<&Path>) -> CliResult<String> {
    let text = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CliError::io_error(format!("Failed to read event {}: {}", path.display(), e))
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(text)
}

/// Write a raw JSON string to stdout
pub fn write_json(json_str: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json_str)?;
    stdout.flush()?;

    Ok(())
}
