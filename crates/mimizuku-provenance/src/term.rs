use std::fmt;

use mimizuku_core::vocab::prov;
use mimizuku_core::Iri;
use serde::{Deserialize, Serialize};

/// PROV-O terms whose presence marks a graph as carrying provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProvenanceTerm {
    Agent,
    Entity,
    Activity,
    Used,
    WasGeneratedBy,
    WasDerivedFrom,
    WasAttributedTo,
    WasAssociatedWith,
}

impl ProvenanceTerm {
    pub const ALL: [ProvenanceTerm; 8] = [
        ProvenanceTerm::Agent,
        ProvenanceTerm::Entity,
        ProvenanceTerm::Activity,
        ProvenanceTerm::Used,
        ProvenanceTerm::WasGeneratedBy,
        ProvenanceTerm::WasDerivedFrom,
        ProvenanceTerm::WasAttributedTo,
        ProvenanceTerm::WasAssociatedWith,
    ];

    pub fn iri(&self) -> &'static str {
        match self {
            ProvenanceTerm::Agent => prov::AGENT,
            ProvenanceTerm::Entity => prov::ENTITY,
            ProvenanceTerm::Activity => prov::ACTIVITY,
            ProvenanceTerm::Used => prov::USED,
            ProvenanceTerm::WasGeneratedBy => prov::WAS_GENERATED_BY,
            ProvenanceTerm::WasDerivedFrom => prov::WAS_DERIVED_FROM,
            ProvenanceTerm::WasAttributedTo => prov::WAS_ATTRIBUTED_TO,
            ProvenanceTerm::WasAssociatedWith => prov::WAS_ASSOCIATED_WITH,
        }
    }

    /// Local name under the `prov:` namespace
    pub fn local_name(&self) -> &'static str {
        &self.iri()[prov::NAMESPACE.len()..]
    }

    pub fn from_iri(iri: &Iri) -> Option<Self> {
        Self::ALL.into_iter().find(|term| term.iri() == iri.as_str())
    }

    /// Classes as opposed to relations
    pub fn is_class(&self) -> bool {
        matches!(
            self,
            ProvenanceTerm::Agent | ProvenanceTerm::Entity | ProvenanceTerm::Activity
        )
    }
}

impl fmt::Display for ProvenanceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prov:{}", self.local_name())
    }
}
