use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents a single atom of a coordinate record.
///
/// Besides the identity and position of the atom, the struct keeps the
/// crystallographic columns of the source file (occupancy, B-factor, formal charge)
/// so that a normalized model can be written back without losing information.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "C1", "CL2", "O").
    pub name: String,
    /// Alternate location indicator, if any.
    pub alt_loc: Option<char>,
    /// Element symbol as written in the source file; empty when the column was blank.
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Crystallographic occupancy.
    pub occupancy: f64,
    /// Isotropic temperature factor.
    pub b_factor: f64,
    /// Formal charge text (e.g., "1-"), empty when absent.
    pub charge: String,
    /// Anisotropic displacement (U11, U22, U33, U12, U13, U23) in units of 1e-4 Å², from an
    /// `ANISOU` record.
    pub anisou: Option<[i32; 6]>,
}

impl Atom {
    /// Creates a new `Atom` with full occupancy and no element, charge or alternate location.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(serial: usize, name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            alt_loc: None,
            element: String::new(),
            residue_id,
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            charge: String::new(),
            anisou: None,
        }
    }

    /// Sets the element symbol, consuming and returning the atom.
    pub fn with_element(mut self, element: &str) -> Self {
        self.element = element.trim().to_string();
        self
    }
}
