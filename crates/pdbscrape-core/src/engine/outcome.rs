use super::error::RecordError;
use super::normalizer::CodeMap;
use std::fmt;
use std::path::PathBuf;

/// The pipeline stage a record was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Retrieval,
    Resolution,
    Normalization,
    Rewriting,
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Retrieval => "retrieval",
            Self::Resolution => "resolution",
            Self::Normalization => "normalization",
            Self::Rewriting => "rewriting",
            Self::Validation => "validation",
        })
    }
}

/// Terminal classification of one record.
#[derive(Debug)]
pub enum Outcome {
    Success,
    SuccessMultiLigand { code_map: CodeMap },
    /// Declared and observed topologies disagree. `repaired` points at the `_mod`
    /// definition when an automatic repair was written.
    Mismatch { repaired: Option<PathBuf> },
    Skipped { reason: String },
    Failed { stage: Stage, error: RecordError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    SuccessMultiLigand,
    Mismatch,
    Skipped,
    Failed,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "OK",
            Self::SuccessMultiLigand => "OK (combi-soak)",
            Self::Mismatch => "MISMATCH",
            Self::Skipped => "SKIPPED",
            Self::Failed => "FAILED",
        })
    }
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success => OutcomeKind::Success,
            Self::SuccessMultiLigand { .. } => OutcomeKind::SuccessMultiLigand,
            Self::Mismatch { .. } => OutcomeKind::Mismatch,
            Self::Skipped { .. } => OutcomeKind::Skipped,
            Self::Failed { .. } => OutcomeKind::Failed,
        }
    }

    /// Human-readable detail for the status line; empty for a plain success.
    pub fn detail(&self) -> String {
        match self {
            Self::Success => String::new(),
            Self::SuccessMultiLigand { code_map } => code_map.to_string(),
            Self::Mismatch { repaired: Some(path) } => format!("repaired -> {}", path.display()),
            Self::Mismatch { repaired: None } => "not repaired".to_string(),
            Self::Skipped { reason } => reason.clone(),
            Self::Failed { stage, error } => {
                format!("{} during {}: {}", error.kind_name(), stage, error)
            }
        }
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<(String, Outcome)>,
}

impl BatchReport {
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.records
            .iter()
            .filter(|(_, outcome)| outcome.kind() == kind)
            .count()
    }

    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.records
            .iter()
            .find(|(record_id, _)| record_id == id)
            .map(|(_, outcome)| outcome)
    }

    /// One-line tally such as `3 records: 1 ok, 1 combi-soak, 0 mismatched, 0 skipped, 1 failed`.
    pub fn summary(&self) -> String {
        format!(
            "{} records: {} ok, {} combi-soak, {} mismatched, {} skipped, {} failed",
            self.records.len(),
            self.count(OutcomeKind::Success),
            self.count(OutcomeKind::SuccessMultiLigand),
            self.count(OutcomeKind::Mismatch),
            self.count(OutcomeKind::Skipped),
            self.count(OutcomeKind::Failed),
        )
    }
}
