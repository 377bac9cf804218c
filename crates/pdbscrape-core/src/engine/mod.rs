//! # Engine Module
//!
//! The per-record stages of the pipeline and the vocabulary they share.
//!
//! - **Stages**: [`resolver`] picks the ligand code(s) of a record, [`normalizer`] renames
//!   them to placeholders, [`rewriter`] applies the same renaming to the ligand definitions
//!   and merges them, and [`validator`] compares the declared topology with the observed one.
//! - **Shared types**: [`config`] for the immutable pipeline settings, [`layout`] for the
//!   file naming scheme, [`retrieval`] for the download seam, [`outcome`] for per-record
//!   results, [`error`] for the failures that end a record and [`progress`] for event
//!   reporting.

pub mod config;
pub mod error;
pub mod layout;
pub mod normalizer;
pub mod outcome;
pub mod progress;
pub mod resolver;
pub mod retrieval;
pub mod rewriter;
pub mod validator;
