use std::collections::BTreeSet;

use mimizuku_core::{Graph, Iri, Subject, Term, Triple};
use mimizuku_formats::builtin_registry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::term::ProvenanceTerm;

/// What a provenance scan found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceReport {
    pub terms_found: BTreeSet<ProvenanceTerm>,
    /// Triples mentioning at least one PROV term
    pub matching_triples: usize,
    pub total_triples: usize,
}

impl ProvenanceReport {
    pub fn has_provenance(&self) -> bool {
        !self.terms_found.is_empty()
    }

    pub fn missing_terms(&self) -> Vec<ProvenanceTerm> {
        ProvenanceTerm::ALL
            .into_iter()
            .filter(|term| !self.terms_found.contains(term))
            .collect()
    }
}

/// Searches graphs for PROV terms in subject, predicate or object position
#[derive(Debug, Clone)]
pub struct ProvenanceMatcher {
    terms: Vec<ProvenanceTerm>,
}

impl ProvenanceMatcher {
    pub fn new() -> Self {
        Self {
            terms: ProvenanceTerm::ALL.to_vec(),
        }
    }

    /// Matcher restricted to `terms`
    pub fn with_terms<I: IntoIterator<Item = ProvenanceTerm>>(terms: I) -> Self {
        Self {
            terms: terms.into_iter().collect(),
        }
    }

    fn lookup(&self, iri: &Iri) -> Option<ProvenanceTerm> {
        ProvenanceTerm::from_iri(iri).filter(|term| self.terms.contains(term))
    }

    fn terms_in<'t>(&'t self, triple: &'t Triple) -> impl Iterator<Item = ProvenanceTerm> + 't {
        let subject = match &triple.subject {
            Subject::Iri(iri) => Some(iri),
            Subject::BlankNode(_) => None,
        };
        let object = match &triple.object {
            Term::Iri(iri) => Some(iri),
            _ => None,
        };
        subject
            .into_iter()
            .chain(std::iter::once(&triple.predicate))
            .chain(object)
            .filter_map(|iri| self.lookup(iri))
    }

    /// Stops at the first matching triple
    pub fn matches(&self, graph: &Graph) -> bool {
        graph.iter().any(|triple| self.terms_in(triple).next().is_some())
    }

    pub fn scan(&self, graph: &Graph) -> ProvenanceReport {
        let mut report = ProvenanceReport {
            total_triples: graph.len(),
            ..ProvenanceReport::default()
        };
        for triple in graph.iter() {
            let before = report.terms_found.len();
            let mut matched = false;
            for term in self.terms_in(triple) {
                matched = true;
                report.terms_found.insert(term);
            }
            if matched {
                report.matching_triples += 1;
            }
            if report.terms_found.len() > before {
                debug!("Found provenance term(s) in {}", triple);
            }
        }
        report
    }
}

impl Default for ProvenanceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// True when any triple uses one of the eight PROV terms
pub fn has_provenance(graph: &Graph) -> bool {
    ProvenanceMatcher::new().matches(graph)
}

/// Parse `input` first; input that does not parse has no provenance.
pub fn has_provenance_in(input: &str, format: &str) -> bool {
    match builtin_registry().parse(input, format) {
        Ok(graph) => has_provenance(&graph),
        Err(err) => {
            warn!("Provenance check on unparsable input: {}", err);
            false
        }
    }
}
