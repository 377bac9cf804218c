use crate::engine::layout::is_intermediate;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Deletes every raw `_rcsb` download in `dir`.
///
/// # Return
///
/// The number of files removed.
pub fn purge_intermediates(dir: &Path) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if entry.file_type()?.is_file() && is_intermediate(&name.to_string_lossy()) {
            fs::remove_file(entry.path())?;
            debug!("Removed {}", entry.path().display());
            removed += 1;
        }
    }
    info!("Removed {} intermediate file(s) from {}", removed, dir.display());
    Ok(removed)
}

/// Removes the files directly inside `dir`. Subdirectories and their contents are left alone.
///
/// # Return
///
/// The number of files removed.
pub fn clear_directory(dir: &Path) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            debug!("Keeping subdirectory {}", entry.path().display());
            continue;
        }
        fs::remove_file(entry.path())?;
        removed += 1;
    }
    debug!("Cleared {} file(s) from {}", removed, dir.display());
    Ok(removed)
}
