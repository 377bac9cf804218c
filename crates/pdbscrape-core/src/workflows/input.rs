use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read identifier list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Identifier list {0} contains no identifiers")]
    Empty(PathBuf),
}

/// Splits an identifier list into trimmed, lower-cased identifiers, skipping blank lines.
pub fn parse_identifiers(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Reads an identifier list from a file.
///
/// # Errors
///
/// Returns [`InputError::Empty`] when the file holds no identifiers, so that a run never
/// starts on nothing.
pub fn read_identifiers(path: &Path) -> Result<Vec<String>, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let identifiers = parse_identifiers(&text);
    if identifiers.is_empty() {
        return Err(InputError::Empty(path.to_path_buf()));
    }
    Ok(identifiers)
}
