use crate::retrieval::Endpoints;
use pdbscrape::engine::config::PipelineConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs, after CLI flags, the config file and defaults are merged.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Identifier list; absent only for `--clean-only`.
    pub input_path: Option<PathBuf>,
    pub pipeline: PipelineConfig,
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub force: bool,
    pub archive: bool,
    pub clean_only: bool,
}
