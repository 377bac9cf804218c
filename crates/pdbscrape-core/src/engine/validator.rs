use super::error::RecordError;
use super::layout::repaired_definition_path;
use super::normalizer::SINGLE_PLACEHOLDER;
use crate::core::chem::element::Element;
use crate::core::chem::graph::{ChemicalGraph, TypeDifference};
use crate::core::io::cif::{CifBlock, CifDocument};
use crate::core::models::structure::StructuralModel;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Comparison of the definition with one observed `LIG` residue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueCheck {
    pub residue: String,
    pub definition_atoms: usize,
    pub observed_atoms: usize,
    pub difference: TypeDifference,
}

impl ResidueCheck {
    pub fn is_match(&self) -> bool {
        self.definition_atoms == self.observed_atoms
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub residues: Vec<ResidueCheck>,
    /// The repaired definition, when one was written.
    pub repaired: Option<PathBuf>,
}

impl ValidationReport {
    pub fn is_match(&self) -> bool {
        self.residues.iter().all(ResidueCheck::is_match)
    }
}

/// Compares the heavy-atom topology declared by a definition with every `LIG` residue of a
/// normalized model.
///
/// On an atom-count mismatch the element types missing on either side decide what happens.
/// When only the definition has extra types and the model has exactly one `LIG` residue,
/// those types (and the bonds touching them) are stripped and the result is written next to
/// the definition as `<stem>_mod.cif`. Every other mismatch is only logged. A failed repair
/// is logged and leaves `repaired` empty.
///
/// # Errors
///
/// [`RecordError::DefinitionParse`] when the definition cannot be read as a chemical graph,
/// [`RecordError::Observation`] when there is no `LIG` residue or one of them is unusable.
pub fn validate(
    definition_path: &Path,
    model: &StructuralModel,
) -> Result<ValidationReport, RecordError> {
    let document = CifDocument::read_from_path(definition_path)?;
    let block = document
        .blocks
        .first()
        .ok_or_else(|| RecordError::DefinitionParse("no data block".into()))?;
    let declared = ChemicalGraph::from_definition(block)
        .map_err(|e| RecordError::DefinitionParse(format!("{}: {}", definition_path.display(), e)))?;

    let ligand_ids = model.residue_ids_named(SINGLE_PLACEHOLDER);
    if ligand_ids.is_empty() {
        return Err(RecordError::Observation(format!(
            "no {} residue in the coordinates",
            SINGLE_PLACEHOLDER
        )));
    }

    let mut report = ValidationReport {
        residues: Vec::with_capacity(ligand_ids.len()),
        repaired: None,
    };

    for &residue_id in &ligand_ids {
        let label = model
            .residue(residue_id)
            .map(|r| r.label())
            .unwrap_or_default();
        let observed = ChemicalGraph::from_residue(model, residue_id)
            .map_err(|e| RecordError::Observation(format!("{}: {}", label, e)))?;

        let check = ResidueCheck {
            residue: label,
            definition_atoms: declared.atom_count(),
            observed_atoms: observed.atom_count(),
            difference: declared.type_difference(&observed),
        };

        if check.is_match() {
            if declared.bond_count() != observed.bond_count() {
                debug!(
                    "{}: bond counts differ (definition {}, observed {})",
                    check.residue,
                    declared.bond_count(),
                    observed.bond_count()
                );
            }
        } else {
            warn!(
                "{}: definition has {} heavy atoms ({}), coordinates have {} ({})",
                check.residue,
                check.definition_atoms,
                declared.formula(),
                check.observed_atoms,
                observed.formula()
            );
        }
        report.residues.push(check);
    }

    if report.is_match() {
        return Ok(report);
    }

    if report.residues.len() > 1 {
        warn!(
            "{} {} residues present, not attempting an automatic repair",
            report.residues.len(),
            SINGLE_PLACEHOLDER
        );
        return Ok(report);
    }

    let difference = &report.residues[0].difference;
    if !difference.only_in_right.is_empty() {
        error!(
            "Coordinates contain element types absent from the definition ({}), not repairing",
            join_symbols(&difference.only_in_right)
        );
    } else if difference.only_in_left.is_empty() {
        warn!("Element types agree but their counts differ, not repairing");
    } else {
        let strip = difference.only_in_left.clone();
        let destination = repaired_definition_path(definition_path);
        match write_repaired(block.clone(), &strip, &destination) {
            Ok(stripped) => {
                info!(
                    "Stripped {} atom(s) of type {} into {}",
                    stripped,
                    join_symbols(&strip),
                    destination.display()
                );
                report.repaired = Some(destination);
            }
            Err(e) => error!("Automatic repair of {} failed: {}", definition_path.display(), e),
        }
    }

    Ok(report)
}

/// Removes every atom whose element is in `strip`, and every bond touching one of them.
///
/// # Return
///
/// The number of atoms removed.
pub fn strip_element_types(block: &mut CifBlock, strip: &BTreeSet<Element>) -> usize {
    let mut stripped_names = BTreeSet::new();
    let removed = block.retain_category_rows("_chem_comp_atom", |table, row| {
        let element = table
            .value(row, "type_symbol")
            .and_then(Element::from_symbol);
        let doomed = element.is_some_and(|e| strip.contains(&e));
        if doomed {
            if let Some(name) = table.value(row, "atom_id") {
                stripped_names.insert(name.to_string());
            }
        }
        !doomed
    });

    block.retain_category_rows("_chem_comp_bond", |table, row| {
        ["atom_id_1", "atom_id_2"]
            .iter()
            .all(|field| table.value(row, field).is_none_or(|n| !stripped_names.contains(n)))
    });

    removed
}

fn write_repaired(
    mut block: CifBlock,
    strip: &BTreeSet<Element>,
    destination: &Path,
) -> Result<usize, RecordError> {
    let stripped = strip_element_types(&mut block, strip);
    let document = CifDocument {
        blocks: vec![block],
    };
    document.write_to_path(destination)?;
    Ok(stripped)
}

fn join_symbols(elements: &BTreeSet<Element>) -> String {
    elements
        .iter()
        .map(Element::symbol)
        .collect::<Vec<_>>()
        .join(" ")
}
