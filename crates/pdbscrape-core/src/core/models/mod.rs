//! # Core Models Module
//!
//! Data structures describing a parsed coordinate record: atoms, residues, bonds and the
//! [`structure::StructuralModel`] that owns them.
//!
//! ## Overview
//!
//! A structural model is an ordered collection of residues. Each residue carries its
//! chemical code (the residue name), sequence number, chain and insertion code, and the
//! atoms that belong to it. The model also keeps the raw header records of the source file,
//! which act as curator-supplied metadata (for example `HETNAM` lines naming the ligands).
//!
//! Atoms and residues live in [`slotmap`] arenas so that removing crystallization additives
//! or renaming ligands never invalidates the identifiers held elsewhere.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with coordinates, element and crystallographic fields
//! - [`residue`] - Residue identity and classification (water, polymer, ligand)
//! - [`structure`] - The complete model with header metadata and bonds
//! - [`topology`] - Bond and bond order definitions
//! - [`ids`] - Stable arena keys for atoms and residues

pub mod atom;
pub mod ids;
pub mod residue;
pub mod structure;
pub mod topology;
