//! The seam between the pipeline and wherever records come from.
//!
//! The pipeline never talks to the network itself: it asks a [`Retriever`] to place a
//! named [`Resource`] of a record at a destination path. The command-line tool provides an
//! HTTP implementation; tests provide in-memory ones.

use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateFormat {
    /// Fixed-column PDB, the primary format.
    Pdb,
    /// Macromolecular CIF, used when no PDB file is distributed.
    Mmcif,
}

impl CoordinateFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
            Self::Mmcif => "cif",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Coordinates(CoordinateFormat),
    Reflections,
    /// Chemical component definition of a ligand code.
    LigandDefinition(String),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(CoordinateFormat::Pdb) => f.write_str("PDB coordinates"),
            Self::Coordinates(CoordinateFormat::Mmcif) => f.write_str("mmCIF coordinates"),
            Self::Reflections => f.write_str("reflection data"),
            Self::LigandDefinition(code) => write!(f, "ligand definition {}", code),
        }
    }
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("{resource} not found for {id}")]
    NotFound { id: String, resource: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RetrievalError {
    pub fn not_found(id: &str, resource: &Resource) -> Self {
        Self::NotFound {
            id: id.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// Places one resource of a record at `dest`.
///
/// Implementations must either write the complete resource to `dest` or return an error;
/// a partially written file left behind on error is overwritten by the next attempt.
pub trait Retriever {
    fn fetch(&self, id: &str, resource: &Resource, dest: &Path) -> Result<(), RetrievalError>;
}

impl<R: Retriever + ?Sized> Retriever for &R {
    fn fetch(&self, id: &str, resource: &Resource, dest: &Path) -> Result<(), RetrievalError> {
        (**self).fetch(id, resource, dest)
    }
}
