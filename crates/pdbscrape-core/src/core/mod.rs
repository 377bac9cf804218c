//! # Core Module
//!
//! Stateless building blocks shared by every stage of the pipeline.
//!
//! - **Structural model** ([`models`]) - atoms, residues and bonds of one coordinate record
//! - **File I/O** ([`io`]) - PDB and mmCIF coordinates, CIF ligand definitions
//! - **Chemistry** ([`chem`]) - element data and heavy-atom chemical graphs
//! - **Utilities** ([`utils`]) - residue code lists and classification

pub mod chem;
pub mod io;
pub mod models;
pub mod utils;
