use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::retrieval::Endpoints;
use pdbscrape::core::utils::identifiers::parse_code_list;
use pdbscrape::engine::config::PipelineConfigBuilder;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Merges command-line flags over the optional config file over built-in defaults.
pub fn build_config(cli: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let output_dir = cli
        .output
        .clone()
        .or_else(|| file_config.output_dir.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(defaults.output_dir));

    let remove_residues = cli
        .remove
        .clone()
        .or(file_config.remove_residues)
        .unwrap_or(defaults.remove_residues);
    let ignore_codes = cli
        .ignore
        .clone()
        .or(file_config.ignore_codes)
        .unwrap_or(defaults.ignore_codes);

    let fetch_reflections = !cli.no_reflections
        && file_config
            .fetch_reflections
            .unwrap_or(defaults.fetch_reflections);
    let clean = cli.clean || file_config.clean.unwrap_or(false);
    let archive = cli.archive || file_config.archive.unwrap_or(false);

    let timeout_secs = cli
        .timeout
        .or(file_config.network.and_then(|n| n.timeout_secs))
        .unwrap_or(defaults.timeout_secs);
    if timeout_secs == 0 {
        return Err(CliError::Argument(
            "the network timeout must be at least one second".to_string(),
        ));
    }

    let endpoints_file = file_config.endpoints.unwrap_or_default();
    let endpoints = Endpoints {
        pdb: endpoints_file.pdb.unwrap_or(defaults.pdb_url),
        mmcif: endpoints_file.mmcif.unwrap_or(defaults.mmcif_url),
        reflections: endpoints_file
            .reflections
            .unwrap_or(defaults.reflections_url),
        ligand: endpoints_file.ligand.unwrap_or(defaults.ligand_url),
    };

    let pipeline = PipelineConfigBuilder::new()
        .output_dir(output_dir)
        .removal_codes(parse_code_list(&remove_residues))
        .ignore_codes(parse_code_list(&ignore_codes))
        .fetch_reflections(fetch_reflections)
        .purge_intermediates(clean)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!("Final pipeline configuration: {:?}", pipeline);

    Ok(AppConfig {
        input_path: cli.input.clone(),
        pipeline,
        endpoints,
        timeout: Duration::from_secs(timeout_secs),
        force: cli.force,
        archive,
        clean_only: cli.clean_only,
    })
}
