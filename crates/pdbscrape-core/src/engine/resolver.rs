use super::error::RecordError;
use crate::core::models::structure::StructuralModel;
use crate::core::utils::identifiers::{is_standard_polymer_residue, is_water_residue};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The ligand code(s) a record is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LigandSelection {
    Single(String),
    /// Several distinct codes (a combi-soak), in first-encounter order.
    Multi(Vec<String>),
}

impl LigandSelection {
    pub fn codes(&self) -> &[String] {
        match self {
            Self::Single(code) => std::slice::from_ref(code),
            Self::Multi(codes) => codes,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }
}

/// Candidate ligand codes of a model, in first-encounter order and without duplicates.
///
/// `HETNAM` header records are authoritative when present (the het identifier occupies
/// columns 12-14; continuation lines repeat it), except for modified polymer residues and
/// water, which HETNAM also lists. Without them, the names of residues typed as ligands are
/// used instead.
pub fn candidate_codes(model: &StructuralModel) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for line in model.header_lines() {
        if !line.starts_with("HETNAM") {
            continue;
        }
        let code = line.get(11..14).unwrap_or("").trim().to_ascii_uppercase();
        if code.is_empty() || codes.contains(&code) {
            continue;
        }
        if is_standard_polymer_residue(&code) || is_water_residue(&code) {
            debug!("HETNAM {} names a polymer residue or water, not a ligand", code);
            continue;
        }
        codes.push(code);
    }

    if codes.is_empty() {
        debug!("No HETNAM records, inferring ligand codes from hetero residues");
        for (_, residue) in model.residues() {
            if residue.is_ligand() && !codes.contains(&residue.name) {
                codes.push(residue.name.clone());
            }
        }
    }

    codes
}

/// Applies the ignore-list and the ambiguity policy to a candidate list.
///
/// # Errors
///
/// Returns [`RecordError::Resolution`] when no candidate survives the ignore-list.
pub fn select(
    candidates: Vec<String>,
    ignore: &BTreeSet<String>,
) -> Result<LigandSelection, RecordError> {
    if candidates.is_empty() {
        return Err(RecordError::Resolution("no hetero groups in record".into()));
    }

    let (mut kept, ignored): (Vec<String>, Vec<String>) =
        candidates.into_iter().partition(|code| !ignore.contains(code));
    if !ignored.is_empty() {
        debug!("Ignoring candidate codes: {}", ignored.join(" "));
    }

    match kept.len() {
        0 => Err(RecordError::Resolution(format!(
            "every candidate is ignored ({})",
            ignored.join(" ")
        ))),
        1 => Ok(LigandSelection::Single(kept.remove(0))),
        _ => {
            warn!(
                "Multiple ligand codes ({}), treating record as a combi-soak",
                kept.join(" ")
            );
            Ok(LigandSelection::Multi(kept))
        }
    }
}

/// Determines the ligand(s) of interest of a model.
pub fn resolve(
    model: &StructuralModel,
    ignore: &BTreeSet<String>,
) -> Result<LigandSelection, RecordError> {
    select(candidate_codes(model), ignore)
}
