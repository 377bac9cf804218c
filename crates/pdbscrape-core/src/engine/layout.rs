use super::retrieval::CoordinateFormat;
use std::path::{Path, PathBuf};

/// Marks raw downloads; every file name containing it is an intermediate artifact.
pub const INTERMEDIATE_MARKER: &str = "_rcsb";

/// Deterministic file names of a record inside the output directory.
///
/// | file | content |
/// |------|---------|
/// | `<id>_rcsb.pdb`, `<id>_rcsb.cif` | raw coordinates |
/// | `<id>_<CODE>_rcsb.cif` | raw ligand definition |
/// | `<id>.mtz` | reflection coefficients |
/// | `<id>.pdb` | normalized coordinates |
/// | `<id>.cif` | rewritten (or merged) ligand definition |
/// | `<id>_LG<n>.cif` | per-ligand definition of a combi-soak |
/// | `<id>_mod.cif` | automatically repaired definition |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_coordinates(&self, id: &str, format: CoordinateFormat) -> PathBuf {
        self.root
            .join(format!("{}{}.{}", id, INTERMEDIATE_MARKER, format.extension()))
    }

    pub fn raw_definition(&self, id: &str, code: &str) -> PathBuf {
        self.root
            .join(format!("{}_{}{}.cif", id, code, INTERMEDIATE_MARKER))
    }

    pub fn reflections(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.mtz", id))
    }

    pub fn normalized_coordinates(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.pdb", id))
    }

    pub fn definition(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.cif", id))
    }

    pub fn ligand_definition(&self, id: &str, placeholder: &str) -> PathBuf {
        self.root.join(format!("{}_{}.cif", id, placeholder))
    }
}

/// `<dir>/<stem>.cif` becomes `<dir>/<stem>_mod.cif`.
pub fn repaired_definition_path(definition: &Path) -> PathBuf {
    let stem = definition
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    definition.with_file_name(format!("{}_mod.cif", stem))
}

pub fn is_intermediate(file_name: &str) -> bool {
    file_name.contains(INTERMEDIATE_MARKER)
}
