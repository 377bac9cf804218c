//! Chemistry needed to compare a ligand definition with an observed ligand.
//!
//! [`element`] holds the element table used to classify atoms and to infer bonds from
//! geometry. [`graph`] builds the heavy-atom chemical graphs that the topology check
//! compares, either from a definition block or from a residue of a structural model.

pub mod element;
pub mod graph;
