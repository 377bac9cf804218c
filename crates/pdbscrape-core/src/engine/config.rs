use crate::core::utils::identifiers::{
    DEFAULT_IGNORE_CODES, DEFAULT_REMOVE_RESIDUES, parse_code_list,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Immutable settings shared by every stage of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    /// Codes never considered as the ligand of interest (crystallization additives, ions).
    pub ignore_codes: BTreeSet<String>,
    /// Residues stripped from the normalized coordinates before renaming.
    pub removal_codes: BTreeSet<String>,
    pub fetch_reflections: bool,
    /// Delete raw `_rcsb` downloads once the batch has finished.
    pub purge_intermediates: bool,
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    output_dir: Option<PathBuf>,
    ignore_codes: Option<BTreeSet<String>>,
    removal_codes: Option<BTreeSet<String>>,
    fetch_reflections: Option<bool>,
    purge_intermediates: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn ignore_codes(mut self, codes: BTreeSet<String>) -> Self {
        self.ignore_codes = Some(codes);
        self
    }
    pub fn removal_codes(mut self, codes: BTreeSet<String>) -> Self {
        self.removal_codes = Some(codes);
        self
    }
    pub fn fetch_reflections(mut self, enabled: bool) -> Self {
        self.fetch_reflections = Some(enabled);
        self
    }
    pub fn purge_intermediates(mut self, enabled: bool) -> Self {
        self.purge_intermediates = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// Only the output directory is mandatory. Unset lists fall back to
    /// [`DEFAULT_IGNORE_CODES`] and [`DEFAULT_REMOVE_RESIDUES`]; reflections are fetched and
    /// intermediates kept unless stated otherwise.
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        Ok(PipelineConfig {
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            ignore_codes: self
                .ignore_codes
                .unwrap_or_else(|| parse_code_list(DEFAULT_IGNORE_CODES)),
            removal_codes: self
                .removal_codes
                .unwrap_or_else(|| parse_code_list(DEFAULT_REMOVE_RESIDUES)),
            fetch_reflections: self.fetch_reflections.unwrap_or(true),
            purge_intermediates: self.purge_intermediates.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_output_dir() {
        assert_eq!(
            PipelineConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("output_dir"))
        );
    }

    #[test]
    fn build_applies_defaults() {
        let config = PipelineConfigBuilder::new()
            .output_dir(PathBuf::from("out"))
            .build()
            .unwrap();
        assert!(config.ignore_codes.contains("EDO"));
        assert!(config.ignore_codes.contains("SO4"));
        assert_eq!(config.removal_codes.len(), 6);
        assert!(config.fetch_reflections);
        assert!(!config.purge_intermediates);
    }

    #[test]
    fn build_keeps_explicit_values() {
        let config = PipelineConfigBuilder::new()
            .output_dir(PathBuf::from("out"))
            .ignore_codes(parse_code_list("abc"))
            .removal_codes(BTreeSet::new())
            .fetch_reflections(false)
            .purge_intermediates(true)
            .build()
            .unwrap();
        assert_eq!(config.ignore_codes, parse_code_list("ABC"));
        assert!(config.removal_codes.is_empty());
        assert!(!config.fetch_reflections);
        assert!(config.purge_intermediates);
    }
}
