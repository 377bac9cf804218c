use super::ids::AtomId;
use crate::core::utils::identifiers::{is_standard_polymer_residue, is_water_residue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Chemical component code (e.g., "ALA", "HOH", "LIG").
    pub name: String,
    /// Residue sequence number from the source file.
    pub number: isize,
    pub insertion_code: Option<char>,
    pub chain_id: char,
    /// Whether the residue was written as HETATM.
    pub is_hetero: bool,
    pub(crate) atoms: Vec<AtomId>, // file order
}

impl Residue {
    pub fn new(name: &str, number: isize, chain_id: char, is_hetero: bool) -> Self {
        Self {
            name: name.trim().to_string(),
            number,
            insertion_code: None,
            chain_id,
            is_hetero,
            atoms: Vec::new(),
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn is_water(&self) -> bool {
        is_water_residue(&self.name)
    }

    /// A residue is typed as a ligand when it is a hetero group that is neither water
    /// nor one of the standard polymer building blocks.
    pub fn is_ligand(&self) -> bool {
        self.is_hetero && !self.is_water() && !is_standard_polymer_residue(&self.name)
    }

    /// Short human-readable locator, e.g. `LIG A401` or `LIG A401B`.
    pub fn label(&self) -> String {
        match self.insertion_code {
            Some(code) => format!("{} {}{}{}", self.name, self.chain_id, self.number, code),
            None => format!("{} {}{}", self.name, self.chain_id, self.number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let residue = Residue::new(" LZA", 401, 'A', true);
        assert_eq!(residue.name, "LZA");
        assert_eq!(residue.number, 401);
        assert_eq!(residue.chain_id, 'A');
        assert!(residue.is_hetero);
        assert_eq!(residue.insertion_code, None);
        assert!(residue.atoms().is_empty());
    }

    #[test]
    fn hetero_non_water_non_polymer_residue_is_a_ligand() {
        assert!(Residue::new("LZA", 1, 'A', true).is_ligand());
        assert!(Residue::new("EDO", 2, 'A', true).is_ligand());
    }

    #[test]
    fn water_and_polymer_residues_are_not_ligands() {
        assert!(!Residue::new("HOH", 1, 'A', true).is_ligand());
        assert!(Residue::new("HOH", 1, 'A', true).is_water());
        assert!(!Residue::new("MSE", 2, 'A', true).is_ligand());
        assert!(!Residue::new("LZA", 3, 'A', false).is_ligand());
    }

    #[test]
    fn label_includes_insertion_code_when_present() {
        let mut residue = Residue::new("LIG", 401, 'B', true);
        assert_eq!(residue.label(), "LIG B401");
        residue.insertion_code = Some('A');
        assert_eq!(residue.label(), "LIG B401A");
    }
}
