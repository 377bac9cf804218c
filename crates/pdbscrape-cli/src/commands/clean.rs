use crate::error::{CliError, Result};
use pdbscrape::workflows::cleanup;
use std::path::Path;
use tracing::info;

/// Removes the raw `_rcsb` downloads left in an existing output directory.
pub fn run(output_dir: &Path) -> Result<()> {
    if !output_dir.is_dir() {
        return Err(CliError::Argument(format!(
            "output directory {} does not exist",
            output_dir.display()
        )));
    }

    info!("Cleaning intermediates in {}", output_dir.display());
    let removed = cleanup::purge_intermediates(output_dir)?;
    println!("Removed {} intermediate file(s)", removed);
    Ok(())
}
