use serde::{Deserialize, Serialize};

use crate::error::ReasonerError;
use crate::ontology::OntologyContext;

/// What an engine is asked to infer beyond classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningOptions {
    /// Object property assertions implied by the ontology
    pub infer_property_values: bool,
    /// Data property assertions implied by the ontology
    pub infer_data_property_values: bool,
}

impl ReasoningOptions {
    pub fn all() -> Self {
        Self {
            infer_property_values: true,
            infer_data_property_values: true,
        }
    }
}

/// A consistency checker the gateway can drive.
///
/// Implementations return `Err` for an inconsistent ontology as well as for
/// their own failures, and may add inferred triples through `context`.
pub trait ReasoningEngine: Send + Sync {
    fn name(&self) -> &str;

    fn reason(
        &self,
        context: &mut OntologyContext<'_>,
        options: &ReasoningOptions,
    ) -> Result<(), ReasonerError>;
}
