use super::error::RecordError;
use super::resolver::LigandSelection;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureWriter;
use crate::core::models::structure::StructuralModel;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Residue name given to the ligand of a single-ligand record.
pub const SINGLE_PLACEHOLDER: &str = "LIG";
/// Placeholders are `LG1`..`LG9`, so a record can carry at most nine distinct codes.
pub const MAX_SIMULTANEOUS_LIGANDS: usize = 9;

/// Ordered mapping from original ligand code to placeholder code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeMap {
    entries: Vec<(String, String)>,
}

impl CodeMap {
    /// Assigns placeholders to a selection: `LIG` for a single code, `LG1`, `LG2`, ... in
    /// encounter order for a set of codes.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Capacity`] for more than [`MAX_SIMULTANEOUS_LIGANDS`] codes.
    pub fn for_selection(selection: &LigandSelection) -> Result<Self, RecordError> {
        match selection {
            LigandSelection::Single(code) => Ok(Self {
                entries: vec![(code.clone(), SINGLE_PLACEHOLDER.to_string())],
            }),
            LigandSelection::Multi(codes) => {
                let mut map = Self::default();
                for code in codes {
                    if map.get(code).is_none() {
                        let placeholder = format!("LG{}", map.entries.len() + 1);
                        map.entries.push((code.clone(), placeholder));
                    }
                }
                if map.entries.len() > MAX_SIMULTANEOUS_LIGANDS {
                    return Err(RecordError::Capacity {
                        found: map.entries.len(),
                        limit: MAX_SIMULTANEOUS_LIGANDS,
                    });
                }
                Ok(map)
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(original, _)| original == code)
            .map(|(_, placeholder)| placeholder.as_str())
    }

    /// `(code, placeholder)` pairs in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, p)| (c.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for CodeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (code, placeholder)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}->{}", code, placeholder)?;
        }
        Ok(())
    }
}

/// Removes the listed residues, then renames the selected ligand residues to their
/// placeholders.
pub fn normalize(
    model: &mut StructuralModel,
    selection: &LigandSelection,
    removal: &BTreeSet<String>,
) -> Result<CodeMap, RecordError> {
    let code_map = CodeMap::for_selection(selection)?;

    let removed = model.remove_residues_named(removal);
    if removed > 0 {
        debug!("Removed {} residues from the removal list", removed);
    }

    for (code, placeholder) in code_map.iter() {
        let renamed = model.rename_residues(code, placeholder);
        if renamed == 0 {
            warn!("Ligand code {} matches no residue in the coordinates", code);
        } else {
            debug!("Renamed {} residue(s) {} -> {}", renamed, code, placeholder);
        }
    }

    Ok(code_map)
}

/// Normalizes a model and writes it, header records included, as PDB to `path`.
pub fn normalize_to_path(
    model: &mut StructuralModel,
    selection: &LigandSelection,
    removal: &BTreeSet<String>,
    path: &Path,
) -> Result<CodeMap, RecordError> {
    let code_map = normalize(model, selection, removal)?;
    PdbFile::write_to_path(model, path)?;
    info!("Wrote normalized coordinates to {}", path.display());
    Ok(code_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::traits::StructureReader;
    use crate::core::models::atom::Atom;
    use crate::core::models::residue::Residue;
    use crate::core::utils::identifiers::parse_code_list;
    use crate::engine::resolver::resolve;
    use nalgebra::Point3;

    fn model_with(names: &[&str]) -> StructuralModel {
        let mut model = StructuralModel::new();
        for (index, name) in names.iter().enumerate() {
            let residue_id = model.add_residue(Residue::new(name, index as isize + 1, 'A', true));
            let atom = Atom::new(index + 1, "C1", residue_id, Point3::new(index as f64, 0.0, 0.0))
                .with_element("C");
            model.add_atom(residue_id, atom).unwrap();
        }
        model
    }

    fn names(model: &StructuralModel) -> Vec<String> {
        model.residues().map(|(_, r)| r.name.clone()).collect()
    }

    #[test]
    fn single_code_renames_only_matching_residues() {
        let mut model = model_with(&["LZA", "SO4", "LZA", "GOL"]);
        let map = normalize(
            &mut model,
            &LigandSelection::Single("LZA".into()),
            &BTreeSet::new(),
        )
        .unwrap();
        assert_eq!(names(&model), vec!["LIG", "SO4", "LIG", "GOL"]);
        assert_eq!(map.get("LZA"), Some("LIG"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn removal_list_is_applied_before_renaming() {
        let mut model = model_with(&["EDO", "LZA", "PO4"]);
        normalize(
            &mut model,
            &LigandSelection::Single("LZA".into()),
            &parse_code_list("EDO PO4"),
        )
        .unwrap();
        assert_eq!(names(&model), vec!["LIG"]);
        assert_eq!(model.atom_count(), 1);
    }

    #[test]
    fn code_set_gets_sequential_placeholders_in_encounter_order() {
        let selection = LigandSelection::Multi(vec!["AAA".into(), "BBB".into()]);
        let mut model = model_with(&["BBB", "AAA"]);
        let map = normalize(&mut model, &selection, &BTreeSet::new()).unwrap();
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![("AAA", "LG1"), ("BBB", "LG2")]);
        assert_eq!(names(&model), vec!["LG2", "LG1"]);
        assert_eq!(map.to_string(), "AAA->LG1, BBB->LG2");
    }

    #[test]
    fn more_than_nine_codes_is_a_capacity_error() {
        let nine: Vec<String> = (1..=9).map(|i| format!("L{:02}", i)).collect();
        let map = CodeMap::for_selection(&LigandSelection::Multi(nine.clone())).unwrap();
        assert_eq!(map.get("L09"), Some("LG9"));

        let mut ten = nine;
        ten.push("L10".into());
        assert!(matches!(
            CodeMap::for_selection(&LigandSelection::Multi(ten)),
            Err(RecordError::Capacity {
                found: 10,
                limit: 9
            })
        ));
    }

    #[test]
    fn normalize_to_path_writes_renamed_pdb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1abc.pdb");
        let mut model = model_with(&["LZA"]);
        model.push_header_line("HETNAM     LZA 2-CHLORO-ETHANOLAMINE");
        normalize_to_path(
            &mut model,
            &LigandSelection::Single("LZA".into()),
            &BTreeSet::new(),
            &path,
        )
        .unwrap();

        let reread = PdbFile::read_from_path(&path).unwrap();
        assert_eq!(names(&reread), vec!["LIG"]);
        assert_eq!(reread.header_lines().len(), 1);
    }

    #[test]
    fn ligand_in_a_later_conformer_is_resolved_and_renamed() {
        let text = "\
HETNAM     LZA 2-CHLORO-ETHANOLAMINE
ATOM      1  CA AALA A   1      11.639   6.071  -5.147  0.50 20.00           C
ATOM      2  CA BALA A   1      11.839   6.071  -5.147  0.50 20.00           C
HETATM    3  C1 BLZA A 401       0.000   0.000   0.000  0.50 30.00           C
HETATM    4 CL1 BLZA A 401       1.760   0.000   0.000  0.50 30.00          CL
END
";
        let mut model = PdbFile::read_from(&mut std::io::Cursor::new(text)).unwrap();
        let selection = resolve(&model, &BTreeSet::new()).unwrap();
        assert_eq!(selection, LigandSelection::Single("LZA".into()));

        normalize(&mut model, &selection, &BTreeSet::new()).unwrap();
        assert_eq!(names(&model), vec!["ALA", "LIG"]);
        let lig_id = model.residue_ids_named("LIG")[0];
        let alt_locs: Vec<_> = model.residue_atoms(lig_id).map(|(_, a)| a.alt_loc).collect();
        assert_eq!(alt_locs, vec![Some('B'), Some('B')]);
    }
}
