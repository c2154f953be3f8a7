use std::path::PathBuf;
use std::time::Duration;

use mimizuku_formats::FormatError;
use thiserror::Error;
use uuid::Uuid;

/// Engine-side failures; the gateway turns every one into a failure result
#[derive(Error, Debug)]
pub enum ReasonerError {
    #[error("Ontology is inconsistent: {0}")]
    Inconsistent(String),

    #[error("Reasoner did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Reasoner is unavailable: {0}")]
    Unavailable(String),

    #[error("Reasoner failed: {0}")]
    Internal(String),

    #[error("Reasoner I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Cannot infer an ontology format from {}", path.display())]
    UnknownFormat { path: PathBuf },

    #[error(transparent)]
    Load(#[from] FormatError),

    #[error("Ontology {id} is unusable: a previous holder panicked")]
    Poisoned { id: Uuid },
}

impl OntologyError {
    /// The file could not be read at all
    pub fn is_io_error(&self) -> bool {
        matches!(self, OntologyError::Load(err) if err.is_io_error())
    }
}
