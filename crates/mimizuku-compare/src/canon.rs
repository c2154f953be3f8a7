//! Blank node signatures by iterative neighbourhood refinement

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use mimizuku_core::{BlankNode, Graph, Subject, Term, Triple};
use smallvec::SmallVec;
use tracing::debug;

pub(crate) type Signature = u64;
pub(crate) type Signatures<'g> = HashMap<&'g BlankNode, Signature>;

/// Triples split by groundness, with the triples incident to each blank node
pub(crate) struct IndexedGraph<'g> {
    pub graph: &'g Graph,
    pub blank_nodes: Vec<&'g BlankNode>,
    pub ground: Vec<&'g Triple>,
    pub non_ground: Vec<&'g Triple>,
    pub incident: HashMap<&'g BlankNode, SmallVec<[&'g Triple; 4]>>,
}

impl<'g> IndexedGraph<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let mut ground = Vec::new();
        let mut non_ground = Vec::new();
        let mut incident: HashMap<&BlankNode, SmallVec<[&Triple; 4]>> = HashMap::new();

        for triple in graph.iter() {
            if triple.is_ground() {
                ground.push(triple);
                continue;
            }
            non_ground.push(triple);
            let mut seen: SmallVec<[&BlankNode; 2]> = SmallVec::new();
            for node in triple.blank_nodes() {
                if !seen.contains(&node) {
                    seen.push(node);
                    incident.entry(node).or_default().push(triple);
                }
            }
        }

        Self {
            graph,
            blank_nodes: graph.blank_nodes().into_iter().collect(),
            ground,
            non_ground,
            incident,
        }
    }

    pub fn incident(&self, node: &BlankNode) -> &[&'g Triple] {
        self.incident.get(node).map(|t| t.as_slice()).unwrap_or(&[])
    }
}

#[derive(Hash, Clone, Copy)]
enum Role {
    Subject,
    Object,
}

#[derive(Hash)]
enum Neighbour<'a> {
    Iri(&'a str),
    Literal(&'a Term),
    Blank(Signature),
    Itself,
}

fn hash_of<T: Hash>(value: &T) -> Signature {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn blank_neighbour(
    node: &BlankNode,
    other: &BlankNode,
    previous: Option<&Signatures<'_>>,
) -> Neighbour<'static> {
    if other == node {
        Neighbour::Itself
    } else {
        Neighbour::Blank(previous.and_then(|p| p.get(other).copied()).unwrap_or(0))
    }
}

/// One signature for `node`, built from its incident triples.
///
/// Without `previous`, blank neighbours are indistinguishable; with it, they
/// contribute their signature from the previous round.
fn neighbourhood(
    graph: &IndexedGraph<'_>,
    node: &BlankNode,
    previous: Option<&Signatures<'_>>,
) -> Signature {
    let mut entries: SmallVec<[Signature; 8]> = SmallVec::new();
    for triple in graph.incident(node) {
        let predicate = triple.predicate.as_str();
        if triple.subject.as_blank_node() == Some(node) {
            let other = match &triple.object {
                Term::Iri(iri) => Neighbour::Iri(iri.as_str()),
                Term::BlankNode(b) => blank_neighbour(node, b, previous),
                literal => Neighbour::Literal(literal),
            };
            entries.push(hash_of(&(Role::Subject, predicate, other)));
        }
        if triple.object.as_blank_node() == Some(node) {
            let other = match &triple.subject {
                Subject::Iri(iri) => Neighbour::Iri(iri.as_str()),
                Subject::BlankNode(b) => blank_neighbour(node, b, previous),
            };
            entries.push(hash_of(&(Role::Object, predicate, other)));
        }
    }
    entries.sort_unstable();

    let seed = previous.and_then(|p| p.get(node).copied()).unwrap_or(0);
    hash_of(&(seed, entries.as_slice()))
}

fn signatures<'g>(graph: &IndexedGraph<'g>, previous: Option<&Signatures<'g>>) -> Signatures<'g> {
    graph
        .blank_nodes
        .iter()
        .map(|&node| (node, neighbourhood(graph, node, previous)))
        .collect()
}

fn class_count(signatures: &Signatures<'_>) -> usize {
    signatures.values().collect::<HashSet<_>>().len()
}

/// Refine both graphs in lock step so equal structure gets equal signatures.
///
/// Stops once neither partition splits further, or after `max_rounds`.
pub(crate) fn refine_pair<'a, 'b>(
    a: &IndexedGraph<'a>,
    b: &IndexedGraph<'b>,
    max_rounds: usize,
) -> (Signatures<'a>, Signatures<'b>) {
    let mut sig_a = signatures(a, None);
    let mut sig_b = signatures(b, None);
    let mut classes = (class_count(&sig_a), class_count(&sig_b));

    for round in 0..max_rounds {
        let next_a = signatures(a, Some(&sig_a));
        let next_b = signatures(b, Some(&sig_b));
        let next_classes = (class_count(&next_a), class_count(&next_b));
        sig_a = next_a;
        sig_b = next_b;
        if next_classes == classes {
            debug!("Refinement stable after {} rounds ({:?} classes)", round + 1, classes);
            break;
        }
        classes = next_classes;
    }
    (sig_a, sig_b)
}

/// `triple` with every blank node replaced by a label derived from its signature
pub(crate) fn canonical_form(triple: &Triple, signatures: &Signatures<'_>) -> Triple {
    let label = |node: &BlankNode| {
        let signature = signatures.get(node).copied().unwrap_or_default();
        BlankNode::new(format!("c{:016x}", signature))
    };
    let subject = match &triple.subject {
        Subject::BlankNode(node) => Subject::BlankNode(label(node)),
        iri => iri.clone(),
    };
    let object = match &triple.object {
        Term::BlankNode(node) => Term::BlankNode(label(node)),
        other => other.clone(),
    };
    Triple {
        subject,
        predicate: triple.predicate.clone(),
        object,
    }
}
