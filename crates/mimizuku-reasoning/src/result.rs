use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningStatus {
    Success,
    Failure,
}

/// Outcome of one consistency check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult {
    pub status: ReasoningStatus,
    pub message: String,
    /// Name of the engine that ran, empty when none did
    pub engine: String,
    pub ontology_id: Option<Uuid>,
    pub inferred_triples: usize,
    pub checked_at: DateTime<Utc>,
}

impl ReasoningResult {
    pub fn success<E: Into<String>>(engine: E, ontology_id: Uuid, inferred_triples: usize) -> Self {
        Self {
            status: ReasoningStatus::Success,
            message: "Ontology is consistent".to_string(),
            engine: engine.into(),
            ontology_id: Some(ontology_id),
            inferred_triples,
            checked_at: Utc::now(),
        }
    }

    pub fn failure<E: Into<String>, M: Into<String>>(engine: E, message: M) -> Self {
        Self {
            status: ReasoningStatus::Failure,
            message: message.into(),
            engine: engine.into(),
            ontology_id: None,
            inferred_triples: 0,
            checked_at: Utc::now(),
        }
    }

    pub fn for_ontology(mut self, id: Uuid) -> Self {
        self.ontology_id = Some(id);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ReasoningStatus::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == ReasoningStatus::Failure
    }
}
