//! Per-document blank node allocation

use mimizuku_core::vocab::rdf;
use mimizuku_core::{BlankNode, Graph, Iri, Subject, Term, Triple};
use std::collections::{HashMap, HashSet};

/// Allocates blank nodes for one parse.
///
/// Document labels are kept when possible so that serializing and
/// re-parsing preserves them; anonymous nodes get `genid{n}` labels that
/// never collide with anything already issued.
#[derive(Debug, Default)]
pub struct BlankNodeScope {
    labels: HashMap<String, BlankNode>,
    issued: HashSet<String>,
    counter: usize,
}

impl BlankNodeScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node for a document label; the same label always maps to the same node
    pub fn labeled(&mut self, label: &str) -> BlankNode {
        if let Some(node) = self.labels.get(label) {
            return node.clone();
        }
        let node = if self.issued.contains(label) {
            self.fresh()
        } else {
            self.issued.insert(label.to_string());
            BlankNode::new(label)
        };
        self.labels.insert(label.to_string(), node.clone());
        node
    }

    /// Node for an anonymous construct (`[]`, collections, nested objects)
    pub fn fresh(&mut self) -> BlankNode {
        loop {
            let candidate = format!("genid{}", self.counter);
            self.counter += 1;
            if self.issued.insert(candidate.clone()) {
                return BlankNode::new(candidate);
            }
        }
    }

    /// Insert an `rdf:first` / `rdf:rest` chain and return its head
    pub fn list(&mut self, graph: &mut Graph, items: Vec<Term>) -> Term {
        if items.is_empty() {
            return Term::iri(rdf::NIL);
        }

        let nodes: Vec<BlankNode> = items.iter().map(|_| self.fresh()).collect();
        for (i, item) in items.into_iter().enumerate() {
            let node = Subject::BlankNode(nodes[i].clone());
            graph.insert(Triple::new(node.clone(), Iri::new(rdf::FIRST), item));
            let rest = match nodes.get(i + 1) {
                Some(next) => Term::BlankNode(next.clone()),
                None => Term::iri(rdf::NIL),
            };
            graph.insert(Triple::new(node, Iri::new(rdf::REST), rest));
        }
        Term::BlankNode(nodes[0].clone())
    }
}

/// Writer-side blank node labels.
///
/// Labels that are legal in the target syntax are written unchanged; the
/// others get unused `b{n}` labels.
pub(crate) struct BlankLabels<'g> {
    labels: HashMap<&'g BlankNode, String>,
}

impl<'g> BlankLabels<'g> {
    pub(crate) fn new(graph: &'g Graph, is_valid: fn(&str) -> bool) -> Self {
        let nodes = graph.blank_nodes();
        let taken: HashSet<String> = nodes
            .iter()
            .map(|node| node.id().to_string())
            .filter(|id| is_valid(id))
            .collect();

        let mut counter = 0;
        let mut labels = HashMap::new();
        for node in nodes {
            let label = if is_valid(node.id()) {
                node.id().to_string()
            } else {
                loop {
                    let candidate = format!("b{}", counter);
                    counter += 1;
                    if !taken.contains(candidate.as_str()) {
                        break candidate;
                    }
                }
            };
            labels.insert(node, label);
        }
        Self { labels }
    }

    pub(crate) fn label<'a>(&'a self, node: &'a BlankNode) -> &'a str {
        self.labels
            .get(node)
            .map(String::as_str)
            .unwrap_or_else(|| node.id())
    }
}
