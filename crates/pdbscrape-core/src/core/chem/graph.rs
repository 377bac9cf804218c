use super::element::Element;
use crate::core::io::cif::CifBlock;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::structure::StructuralModel;
use crate::core::models::topology::BondOrder;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use thiserror::Error;
use tracing::trace;

/// Added to the sum of two covalent radii when inferring a bond from geometry.
pub const BOND_TOLERANCE: f64 = 0.45;
/// Closer pairs are treated as overlapping positions rather than bonds.
const MIN_BOND_DISTANCE: f64 = 0.4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Missing category {0}")]
    MissingCategory(&'static str),
    #[error("Missing field {field} in {category}")]
    MissingField {
        category: &'static str,
        field: &'static str,
    },
    #[error("Atom '{atom}' has unknown element '{symbol}'")]
    UnknownElement { atom: String, symbol: String },
    #[error("Bond references unknown atom '{0}'")]
    UnknownBondAtom(String),
    #[error("Duplicate atom name '{0}'")]
    DuplicateAtomName(String),
    #[error("Atom '{0}' has non-finite coordinates")]
    NonFiniteCoordinates(String),
    #[error("No heavy atoms")]
    NoHeavyAtoms,
    #[error("Residue not found in model")]
    ResidueNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphAtom {
    pub name: String,
    pub element: Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphBond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

/// Element types present on only one side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDifference {
    pub only_in_left: BTreeSet<Element>,
    pub only_in_right: BTreeSet<Element>,
}

impl TypeDifference {
    pub fn is_empty(&self) -> bool {
        self.only_in_left.is_empty() && self.only_in_right.is_empty()
    }
}

/// Heavy-atom topology of a single chemical species.
///
/// Hydrogen and deuterium are dropped on construction, together with every bond that
/// touches them, so that a definition (which lists all hydrogens) and a crystallographic
/// residue (which rarely resolves them) describe the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChemicalGraph {
    atoms: Vec<GraphAtom>,
    bonds: Vec<GraphBond>,
}

impl ChemicalGraph {
    /// Builds the graph declared by a ligand definition block.
    ///
    /// Atoms come from `_chem_comp_atom` (`atom_id`, `type_symbol`) and bonds from the
    /// optional `_chem_comp_bond` category (`atom_id_1`, `atom_id_2`, `value_order`).
    pub fn from_definition(block: &CifBlock) -> Result<Self, GraphError> {
        const ATOMS: &str = "_chem_comp_atom";
        const BONDS: &str = "_chem_comp_bond";

        let atom_table = block
            .category(ATOMS)
            .ok_or(GraphError::MissingCategory(ATOMS))?;
        let missing = |field| GraphError::MissingField {
            category: ATOMS,
            field,
        };
        let name_col = atom_table.column("atom_id").ok_or_else(|| missing("atom_id"))?;
        let type_col = atom_table
            .column("type_symbol")
            .ok_or_else(|| missing("type_symbol"))?;

        let mut atoms = Vec::new();
        let mut index_by_name = HashMap::new();
        let mut hydrogens = BTreeSet::new();

        for row in &atom_table.rows {
            let name = row[name_col].as_str();
            let symbol = row[type_col].as_str();
            let element = Element::from_symbol(symbol).ok_or_else(|| GraphError::UnknownElement {
                atom: name.to_string(),
                symbol: symbol.to_string(),
            })?;
            if element.is_hydrogen() {
                hydrogens.insert(name.to_string());
                continue;
            }
            if index_by_name.insert(name.to_string(), atoms.len()).is_some() {
                return Err(GraphError::DuplicateAtomName(name.to_string()));
            }
            atoms.push(GraphAtom {
                name: name.to_string(),
                element,
            });
        }

        let mut graph = Self {
            atoms,
            bonds: Vec::new(),
        };

        if let Some(bond_table) = block.category(BONDS) {
            let missing = |field| GraphError::MissingField {
                category: BONDS,
                field,
            };
            let first = bond_table.column("atom_id_1").ok_or_else(|| missing("atom_id_1"))?;
            let second = bond_table.column("atom_id_2").ok_or_else(|| missing("atom_id_2"))?;
            let order_col = bond_table.column("value_order");

            for row in &bond_table.rows {
                let (name1, name2) = (row[first].as_str(), row[second].as_str());
                if hydrogens.contains(name1) || hydrogens.contains(name2) {
                    continue;
                }
                let lookup = |name: &str| {
                    index_by_name
                        .get(name)
                        .copied()
                        .ok_or_else(|| GraphError::UnknownBondAtom(name.to_string()))
                };
                let (atom1, atom2) = (lookup(name1)?, lookup(name2)?);
                let order = order_col
                    .and_then(|c| row[c].parse().ok())
                    .unwrap_or_default();
                graph.push_bond(atom1, atom2, order);
            }
        }

        graph.ensure_heavy_atoms()?;
        Ok(graph)
    }

    /// Builds the graph observed for one residue of a structural model.
    ///
    /// Elements come from the element column, falling back to the atom name. Explicit
    /// bonds inside the residue are used when the model has any; otherwise bonds are
    /// inferred from covalent radii plus [`BOND_TOLERANCE`].
    ///
    /// Of a residue modelled in several conformers only the first alternate location it
    /// carries counts, together with the atoms that have no alternate location.
    pub fn from_residue(model: &StructuralModel, residue_id: ResidueId) -> Result<Self, GraphError> {
        model.residue(residue_id).ok_or(GraphError::ResidueNotFound)?;

        let conformer = model
            .residue_atoms(residue_id)
            .find_map(|(_, atom)| atom.alt_loc);

        let mut atoms = Vec::new();
        let mut positions = Vec::new();
        let mut index_by_id: HashMap<AtomId, usize> = HashMap::new();

        for (atom_id, atom) in model.residue_atoms(residue_id) {
            if atom.alt_loc.is_some() && atom.alt_loc != conformer {
                continue;
            }
            let element = if atom.element.is_empty() {
                Element::infer_from_atom_name(&atom.name)
            } else {
                Element::from_symbol(&atom.element)
            }
            .ok_or_else(|| GraphError::UnknownElement {
                atom: atom.name.clone(),
                symbol: atom.element.clone(),
            })?;
            if element.is_hydrogen() {
                continue;
            }
            if !atom.position.coords.iter().all(|c| c.is_finite()) {
                return Err(GraphError::NonFiniteCoordinates(atom.name.clone()));
            }
            index_by_id.insert(atom_id, atoms.len());
            positions.push(atom.position);
            atoms.push(GraphAtom {
                name: atom.name.clone(),
                element,
            });
        }

        let mut graph = Self {
            atoms,
            bonds: Vec::new(),
        };
        graph.ensure_heavy_atoms()?;

        for bond in model.intra_residue_bonds(residue_id) {
            if let (Some(&a), Some(&b)) = (
                index_by_id.get(&bond.atom1_id),
                index_by_id.get(&bond.atom2_id),
            ) {
                graph.push_bond(a, b, bond.order);
            }
        }

        if graph.bonds.is_empty() {
            for i in 0..graph.atoms.len() {
                for j in (i + 1)..graph.atoms.len() {
                    let distance = nalgebra::distance(&positions[i], &positions[j]);
                    let limit = graph.atoms[i].element.covalent_radius()
                        + graph.atoms[j].element.covalent_radius()
                        + BOND_TOLERANCE;
                    if distance > MIN_BOND_DISTANCE && distance <= limit {
                        trace!(
                            "Inferred bond {}-{} at {:.3} A",
                            graph.atoms[i].name, graph.atoms[j].name, distance
                        );
                        graph.push_bond(i, j, BondOrder::Single);
                    }
                }
            }
        }

        Ok(graph)
    }

    pub fn atoms(&self) -> &[GraphAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[GraphBond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn element_counts(&self) -> BTreeMap<Element, usize> {
        let mut counts = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element).or_insert(0) += 1;
        }
        counts
    }

    pub fn element_types(&self) -> BTreeSet<Element> {
        self.atoms.iter().map(|atom| atom.element).collect()
    }

    /// Element types present in `self` but not in `other`, and vice versa.
    pub fn type_difference(&self, other: &ChemicalGraph) -> TypeDifference {
        let left = self.element_types();
        let right = other.element_types();
        TypeDifference {
            only_in_left: left.difference(&right).copied().collect(),
            only_in_right: right.difference(&left).copied().collect(),
        }
    }

    /// Compact composition string such as `C2 Cl N O`.
    pub fn formula(&self) -> String {
        let mut out = String::new();
        for (element, count) in self.element_counts() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(element.symbol());
            if count > 1 {
                let _ = write!(out, "{}", count);
            }
        }
        out
    }

    fn push_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) {
        let (atom1, atom2) = (atom1.min(atom2), atom1.max(atom2));
        if atom1 == atom2 || self.bonds.iter().any(|b| b.atom1 == atom1 && b.atom2 == atom2) {
            return;
        }
        self.bonds.push(GraphBond {
            atom1,
            atom2,
            order,
        });
    }

    fn ensure_heavy_atoms(&self) -> Result<(), GraphError> {
        if self.atoms.is_empty() {
            Err(GraphError::NoHeavyAtoms)
        } else {
            Ok(())
        }
    }
}
