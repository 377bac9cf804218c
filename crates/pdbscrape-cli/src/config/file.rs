use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileEndpointsConfig {
    pub pdb: Option<String>,
    pub mmcif: Option<String>,
    pub reflections: Option<String>,
    pub ligand: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileNetworkConfig {
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

/// On-disk shape of the TOML configuration; every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(rename = "output-dir")]
    pub output_dir: Option<String>,
    #[serde(rename = "remove-residues")]
    pub remove_residues: Option<String>,
    #[serde(rename = "ignore-codes")]
    pub ignore_codes: Option<String>,
    #[serde(rename = "fetch-reflections")]
    pub fetch_reflections: Option<bool>,
    pub clean: Option<bool>,
    pub archive: Option<bool>,
    pub endpoints: Option<FileEndpointsConfig>,
    pub network: Option<FileNetworkConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
