//! # Workflows Module
//!
//! Entry points that tie the engine stages into complete runs.
//!
//! - [`batch`] processes a list of identifiers end to end and classifies every record.
//! - [`input`] reads the identifier list a batch starts from.
//! - [`cleanup`] removes intermediate downloads, or everything, from an output directory.

pub mod batch;
pub mod cleanup;
pub mod input;
