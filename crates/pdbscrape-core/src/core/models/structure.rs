use super::atom::Atom;
use super::ids::{AtomId, ResidueId};
use super::residue::Residue;
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::BTreeSet;

/// A parsed coordinate record: residues in file order, their atoms, explicit bonds and the
/// raw header records of the source file.
///
/// The model owns all of its data. Residues can be removed or renamed in place, which is
/// how crystallization additives are stripped and ligands are given placeholder codes.
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Residues in the order they appear in the source file.
    residue_order: Vec<ResidueId>,
    /// Explicit bonds, typically from `CONECT` records.
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
    /// Raw header records (everything outside the coordinate section).
    header_lines: Vec<String>,
}

impl StructuralModel {
    /// Creates a new, empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw header records kept from the source file.
    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    /// Appends a raw header record.
    pub fn push_header_line(&mut self, line: impl Into<String>) {
        self.header_lines.push(line.into());
    }

    /// Retrieves an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all residues in file order.
    pub fn residues(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residue_order
            .iter()
            .filter_map(|&id| self.residues.get(id).map(|residue| (id, residue)))
    }

    /// Returns an iterator over the atoms of a residue, in file order.
    ///
    /// Yields nothing if the residue does not exist.
    pub fn residue_atoms(&self, residue_id: ResidueId) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.residues
            .get(residue_id)
            .map(|residue| residue.atoms.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.atoms.get(id).map(|atom| (id, atom)))
    }

    /// Returns a slice of all bonds in the model.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residue_order.len()
    }

    /// Appends a residue at the end of the model.
    pub fn add_residue(&mut self, residue: Residue) -> ResidueId {
        let id = self.residues.insert(residue);
        self.residue_order.push(id);
        id
    }

    /// Adds an atom to a residue.
    ///
    /// The atom's `residue_id` is overwritten with `residue_id`.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (the residue doesn't exist).
    pub fn add_atom(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        atom.residue_id = residue_id;
        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        self.residues[residue_id].atoms.push(atom_id);
        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Adding an existing bond (in either direction) succeeds without creating a duplicate.
    /// Self-bonds are rejected.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (e.g., if atoms don't exist).
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        if self
            .bond_adjacency
            .get(atom1_id)
            .is_some_and(|neighbors| neighbors.contains(&atom2_id))
        {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    /// Returns the IDs of every residue with the given name, in file order.
    pub fn residue_ids_named(&self, name: &str) -> Vec<ResidueId> {
        self.residues()
            .filter(|(_, residue)| residue.name == name)
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the bonds whose two atoms both belong to `residue_id`.
    pub fn intra_residue_bonds(&self, residue_id: ResidueId) -> Vec<&Bond> {
        self.bonds
            .iter()
            .filter(|bond| {
                let in_residue = |id: AtomId| {
                    self.atoms
                        .get(id)
                        .is_some_and(|atom| atom.residue_id == residue_id)
                };
                in_residue(bond.atom1_id) && in_residue(bond.atom2_id)
            })
            .collect()
    }

    /// Removes a residue together with its atoms and every bond touching them.
    ///
    /// # Return
    ///
    /// Returns `Some(Residue)` if the residue existed and was removed, otherwise `None`.
    pub fn remove_residue(&mut self, residue_id: ResidueId) -> Option<Residue> {
        let residue = self.residues.remove(residue_id)?;
        self.residue_order.retain(|&id| id != residue_id);

        for &atom_id in &residue.atoms {
            self.atoms.remove(atom_id);
            let neighbors = self.bond_adjacency.remove(atom_id).unwrap_or_default();
            for neighbor_id in neighbors {
                if let Some(adjacency) = self.bond_adjacency.get_mut(neighbor_id) {
                    adjacency.retain(|&id| id != atom_id);
                }
            }
        }

        let atoms = &self.atoms;
        self.bonds
            .retain(|bond| atoms.contains_key(bond.atom1_id) && atoms.contains_key(bond.atom2_id));

        Some(residue)
    }

    /// Removes every residue whose name is in `names`.
    ///
    /// # Return
    ///
    /// The number of residues removed.
    pub fn remove_residues_named(&mut self, names: &BTreeSet<String>) -> usize {
        let doomed: Vec<ResidueId> = self
            .residues()
            .filter(|(_, residue)| names.contains(&residue.name))
            .map(|(id, _)| id)
            .collect();
        doomed
            .into_iter()
            .filter_map(|id| self.remove_residue(id))
            .count()
    }

    /// Renames every residue called `from` to `to`.
    ///
    /// # Return
    ///
    /// The number of residues renamed.
    pub fn rename_residues(&mut self, from: &str, to: &str) -> usize {
        let mut renamed = 0;
        for (_, residue) in self.residues.iter_mut() {
            if residue.name == from {
                residue.name = to.to_string();
                renamed += 1;
            }
        }
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    struct TestRefs {
        ala_id: ResidueId,
        lig_id: ResidueId,
        edo_id: ResidueId,
        lig_c1: AtomId,
        lig_c2: AtomId,
        edo_o1: AtomId,
    }

    fn create_test_model() -> (StructuralModel, TestRefs) {
        let mut model = StructuralModel::new();
        model.push_header_line("HETNAM     LZA TEST LIGAND");

        let ala_id = model.add_residue(Residue::new("ALA", 1, 'A', false));
        model
            .add_atom(ala_id, Atom::new(1, "CA", ala_id, Point3::origin()))
            .unwrap();

        let lig_id = model.add_residue(Residue::new("LZA", 401, 'A', true));
        let lig_c1 = model
            .add_atom(lig_id, Atom::new(2, "C1", lig_id, Point3::new(5.0, 0.0, 0.0)))
            .unwrap();
        let lig_c2 = model
            .add_atom(lig_id, Atom::new(3, "C2", lig_id, Point3::new(6.5, 0.0, 0.0)))
            .unwrap();

        let edo_id = model.add_residue(Residue::new("EDO", 501, 'A', true));
        let edo_o1 = model
            .add_atom(edo_id, Atom::new(4, "O1", edo_id, Point3::new(8.0, 0.0, 0.0)))
            .unwrap();

        model.add_bond(lig_c1, lig_c2, BondOrder::Single).unwrap();
        model.add_bond(lig_c2, edo_o1, BondOrder::Single).unwrap();

        let refs = TestRefs {
            ala_id,
            lig_id,
            edo_id,
            lig_c1,
            lig_c2,
            edo_o1,
        };
        (model, refs)
    }

    #[test]
    fn residues_are_iterated_in_file_order() {
        let (model, refs) = create_test_model();
        let ids: Vec<_> = model.residues().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![refs.ala_id, refs.lig_id, refs.edo_id]);
        assert_eq!(model.residue_count(), 3);
        assert_eq!(model.atom_count(), 4);
        assert_eq!(model.header_lines(), &["HETNAM     LZA TEST LIGAND"]);
    }

    #[test]
    fn add_atom_rejects_unknown_residue() {
        let (mut model, refs) = create_test_model();
        model.remove_residue(refs.ala_id).unwrap();
        let orphan = Atom::new(99, "X", refs.ala_id, Point3::origin());
        assert!(model.add_atom(refs.ala_id, orphan).is_none());
    }

    #[test]
    fn add_bond_is_idempotent_and_rejects_self_bonds() {
        let (mut model, refs) = create_test_model();
        assert_eq!(model.bonds().len(), 2);
        model.add_bond(refs.lig_c2, refs.lig_c1, BondOrder::Double).unwrap();
        assert_eq!(model.bonds().len(), 2);
        assert!(model.add_bond(refs.lig_c1, refs.lig_c1, BondOrder::Single).is_none());
    }

    #[test]
    fn intra_residue_bonds_excludes_bonds_leaving_the_residue() {
        let (model, refs) = create_test_model();
        let bonds = model.intra_residue_bonds(refs.lig_id);
        assert_eq!(bonds.len(), 1);
        assert!(bonds[0].contains(refs.lig_c1));
        assert!(bonds[0].contains(refs.lig_c2));
    }

    #[test]
    fn remove_residue_drops_atoms_bonds_and_adjacency() {
        let (mut model, refs) = create_test_model();
        let removed = model.remove_residue(refs.edo_id).unwrap();

        assert_eq!(removed.name, "EDO");
        assert!(model.atom(refs.edo_o1).is_none());
        assert_eq!(model.bonds().len(), 1);
        assert!(model.add_bond(refs.lig_c2, refs.edo_o1, BondOrder::Single).is_none());
        model.add_bond(refs.lig_c2, refs.lig_c1, BondOrder::Single).unwrap();
        assert_eq!(model.bonds().len(), 1);
        assert_eq!(model.residue_count(), 2);
        assert!(model.remove_residue(refs.edo_id).is_none());
    }

    #[test]
    fn remove_residues_named_removes_every_match() {
        let (mut model, _) = create_test_model();
        let names: BTreeSet<String> = ["EDO".to_string(), "PEG".to_string()].into();
        assert_eq!(model.remove_residues_named(&names), 1);
        assert!(model.residue_ids_named("EDO").is_empty());
        assert_eq!(model.remove_residues_named(&names), 0);
    }

    #[test]
    fn rename_residues_touches_only_matching_residues() {
        let (mut model, refs) = create_test_model();
        assert_eq!(model.rename_residues("LZA", "LIG"), 1);
        assert_eq!(model.residue(refs.lig_id).unwrap().name, "LIG");
        assert_eq!(model.residue(refs.ala_id).unwrap().name, "ALA");
        assert_eq!(model.residue(refs.edo_id).unwrap().name, "EDO");
        assert_eq!(model.residue_ids_named("LIG"), vec![refs.lig_id]);
    }

    #[test]
    fn residue_atoms_yields_atoms_in_insertion_order() {
        let (model, refs) = create_test_model();
        let names: Vec<_> = model
            .residue_atoms(refs.lig_id)
            .map(|(_, atom)| atom.name.as_str())
            .collect();
        assert_eq!(names, vec!["C1", "C2"]);
    }

    #[test]
    fn atom_mut_edits_in_place() {
        let (mut model, refs) = create_test_model();
        model.atom_mut(refs.lig_c1).unwrap().b_factor = 42.0;
        assert_eq!(model.atom(refs.lig_c1).unwrap().b_factor, 42.0);
        model.remove_residue(refs.lig_id).unwrap();
        assert!(model.atom_mut(refs.lig_c1).is_none());
    }
}
