//! Provides input/output functionality for the file formats a record is made of.
//!
//! Coordinate files are read into a [`StructuralModel`](crate::core::models::structure::StructuralModel)
//! through the [`traits::StructureReader`] interface: [`pdb`] handles the primary
//! fixed-column format (and writes normalized models back), [`mmcif`] handles the alternate
//! format used when a structure is not distributed as PDB. Ligand definitions are CIF
//! documents handled by [`cif`], which keeps enough structure to filter rows and merge blocks.

pub mod cif;
pub mod hybrid36;
pub mod mmcif;
pub mod pdb;
pub mod traits;
