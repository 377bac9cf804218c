use crate::archive;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::retrieval::HttpRetriever;
use crate::utils::progress::CliProgressHandler;
use pdbscrape::engine::outcome::OutcomeKind;
use pdbscrape::engine::progress::ProgressReporter;
use pdbscrape::workflows::{batch, cleanup, input};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(config: AppConfig) -> Result<()> {
    let input_path = config
        .input_path
        .as_deref()
        .ok_or_else(|| CliError::Argument("an identifier list is required".to_string()))?;

    info!("Reading identifiers from {}", input_path.display());
    let identifiers = input::read_identifiers(input_path)?;
    info!("Read {} identifier(s)", identifiers.len());

    prepare_output_dir(&config.pipeline.output_dir, config.force)?;

    let retriever = HttpRetriever::new(config.endpoints.clone(), config.timeout)?;
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the batch workflow...");
    let report = tokio::task::block_in_place(|| {
        batch::run(&identifiers, &config.pipeline, &retriever, &reporter)
    })?;

    println!("{}", report.summary());
    let failed = report.count(OutcomeKind::Failed);
    if failed > 0 {
        warn!("{} record(s) failed; see the log for causes", failed);
    }

    if config.archive {
        let archive_path = archive::archive_directory(&config.pipeline.output_dir)?;
        println!("Archive written to {}", archive_path.display());
    }

    Ok(())
}

/// Makes sure `dir` exists and holds no stale output.
///
/// A non-empty directory is only accepted when `force` is set, in which case its files are
/// removed. Subdirectories are never touched.
fn prepare_output_dir(dir: &Path, force: bool) -> Result<()> {
    if dir.is_dir() && fs::read_dir(dir)?.next().is_some() {
        if !force {
            return Err(CliError::Argument(format!(
                "output directory {} is not empty; pass --force to overwrite it",
                dir.display()
            )));
        }
        let removed = cleanup::clear_directory(dir)?;
        warn!("Removed {} existing file(s) from {}", removed, dir.display());
    }
    fs::create_dir_all(dir)?;
    Ok(())
}
