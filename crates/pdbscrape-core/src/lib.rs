//! # pdbscrape
//!
//! Turns a list of Protein Data Bank identifiers into a ligand-ready dataset: for every
//! entry the coordinates, reflection data and ligand definitions are retrieved, ligand
//! residues are renamed to canonical placeholders, and the declared ligand topology is
//! checked against the observed one.
//!
//! ## Layers
//!
//! - **[`core`]** holds the stateless pieces: the structural model, the PDB/CIF/mmCIF
//!   codecs, the element table and chemical graphs.
//! - **[`engine`]** holds the per-record stages (resolve, normalize, rewrite, validate)
//!   and the types they share, including the [`engine::retrieval::Retriever`] seam through
//!   which all data enters the pipeline.
//! - **[`workflows`]** ties the stages into a batch run that isolates failures and
//!   classifies every record.

pub mod core;
pub mod engine;
pub mod workflows;
