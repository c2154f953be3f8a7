//! Graph container and namespace prefixes

use crate::model::{BlankNode, Iri, Subject, Term, Triple};
use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Namespace prefix table, used only for human-readable serialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixMap {
    prefixes: BTreeMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`, replacing any previous binding
    pub fn bind<P: Into<String>, N: Into<String>>(&mut self, prefix: P, namespace: N) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn remove(&mut self, prefix: &str) -> Option<String> {
        self.prefixes.remove(prefix)
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.prefixes.values().any(|ns| ns == namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Expand `prefix:local`, `None` when the prefix is unbound
    pub fn expand(&self, prefix: &str, local: &str) -> Option<String> {
        self.get(prefix).map(|ns| format!("{}{}", ns, local))
    }

    /// Find the longest bound namespace that is a prefix of `iri`.
    ///
    /// Returns `(prefix, local)`; the caller decides whether the local part is
    /// legal in its syntax.
    pub fn shrink<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| (prefix.as_str(), &iri[ns.len()..]))
    }
}

/// RDF graph: an unordered set of triples plus serialization prefixes.
///
/// Iteration order is deterministic (sorted) so that serializers produce
/// stable output, but it carries no meaning. There is intentionally no
/// `PartialEq`: graphs are compared up to blank node renaming by the
/// comparator crate.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: BTreeSet<Triple>,
    prefixes: PrefixMap,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple, returns `false` when it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Remove a triple, returns `false` when it was not present
    pub fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.remove(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Triple> {
        self.triples.iter()
    }

    pub fn clear(&mut self) {
        self.triples.clear();
    }

    /// Find triples matching a pattern, `None` matches anything
    pub fn triples_matching(
        &self,
        subject: Option<&Subject>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&Triple> {
        self.triples
            .iter()
            .filter(|t| subject.map_or(true, |s| &t.subject == s))
            .filter(|t| predicate.map_or(true, |p| &t.predicate == p))
            .filter(|t| object.map_or(true, |o| &t.object == o))
            .collect()
    }

    /// All blank nodes occurring in the graph
    pub fn blank_nodes(&self) -> BTreeSet<&BlankNode> {
        self.triples.iter().flat_map(Triple::blank_nodes).collect()
    }

    /// `true` when no triple mentions a blank node
    pub fn is_ground(&self) -> bool {
        self.triples.iter().all(Triple::is_ground)
    }

    /// A blank node whose label is not used anywhere in this graph
    pub fn fresh_blank_node(&self) -> BlankNode {
        let used: HashSet<&str> = self
            .triples
            .iter()
            .flat_map(Triple::blank_nodes)
            .map(BlankNode::id)
            .collect();
        let mut counter = used.len();
        loop {
            let candidate = format!("b{}", counter);
            if !used.contains(candidate.as_str()) {
                return BlankNode(candidate);
            }
            counter += 1;
        }
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    pub fn prefixes_mut(&mut self) -> &mut PrefixMap {
        &mut self.prefixes
    }

    pub fn bind_prefix<P: Into<String>, N: Into<String>>(&mut self, prefix: P, namespace: N) {
        self.prefixes.bind(prefix, namespace);
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
            prefixes: PrefixMap::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = btree_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}
