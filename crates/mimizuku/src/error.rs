use thiserror::Error;

use crate::config::ConfigError;

/// Any failure surfaced by the facade.
///
/// Reasoning failures are not here: they come back as a `ReasoningResult`.
#[derive(Error, Debug)]
pub enum MimizukuError {
    #[error(transparent)]
    Format(#[from] mimizuku_formats::FormatError),

    #[error(transparent)]
    Compare(#[from] mimizuku_compare::CompareError),

    #[error(transparent)]
    Ontology(#[from] mimizuku_reasoning::OntologyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, MimizukuError>;
