use super::retrieval::RetrievalError;
use crate::core::io::cif::CifError;
use crate::core::io::mmcif::MmcifError;
use crate::core::io::pdb::PdbError;
use std::io;
use thiserror::Error;

/// Everything that can end the processing of a single record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("No usable ligand: {0}")]
    Resolution(String),

    #[error("Found {found} distinct ligand codes, at most {limit} are supported")]
    Capacity { found: usize, limit: usize },

    #[error("Invalid ligand definition: {0}")]
    DefinitionParse(String),

    #[error("Unusable observed ligand: {0}")]
    Observation(String),

    #[error("Retrieval failed: {source}")]
    Retrieval {
        #[from]
        source: RetrievalError,
    },

    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RecordError {
    /// Short name of the error kind, used in status lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Resolution(_) => "ResolutionError",
            Self::Capacity { .. } => "CapacityError",
            Self::DefinitionParse(_) => "DefinitionParseError",
            Self::Observation(_) => "ObservationError",
            Self::Retrieval { .. } => "RetrievalError",
            Self::Validation(_) => "ValidationError",
            Self::Io(_) => "IoError",
        }
    }
}

impl From<PdbError> for RecordError {
    fn from(error: PdbError) -> Self {
        match error {
            PdbError::Io(e) => Self::Io(e),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<MmcifError> for RecordError {
    fn from(error: MmcifError) -> Self {
        match error {
            MmcifError::Io(e) | MmcifError::Cif(CifError::Io(e)) => Self::Io(e),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<CifError> for RecordError {
    fn from(error: CifError) -> Self {
        match error {
            CifError::Io(e) => Self::Io(e),
            other => Self::DefinitionParse(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_errors_map_to_record_kinds() {
        let pdb: RecordError = PdbError::MissingRecord("ATOM".into()).into();
        assert_eq!(pdb.kind_name(), "ValidationError");

        let cif: RecordError = CifError::NoDataBlock.into();
        assert_eq!(cif.kind_name(), "DefinitionParseError");

        let io: RecordError = MmcifError::Cif(CifError::Io(io::Error::other("disk"))).into();
        assert_eq!(io.kind_name(), "IoError");

        let retrieval: RecordError = RetrievalError::Transport("timeout".into()).into();
        assert!(retrieval.to_string().contains("timeout"));
    }
}
