use std::collections::{BTreeMap, HashSet};

use mimizuku_core::{BlankNode, Graph, Triple};
use tracing::debug;

use crate::canon::{canonical_form, refine_pair, IndexedGraph};
use crate::config::ComparatorConfig;
use crate::diff::GraphDiff;
use crate::error::Result;
use crate::search::BijectionSearch;

/// Graph equality up to blank node renaming
#[derive(Debug, Clone, Default)]
pub struct GraphComparator {
    config: ComparatorConfig,
}

impl GraphComparator {
    pub fn new(config: ComparatorConfig) -> Self {
        Self { config }
    }

    /// Default limits with a different step budget
    pub fn with_budget(search_budget: u64) -> Self {
        Self::new(ComparatorConfig {
            search_budget,
            ..ComparatorConfig::default()
        })
    }

    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    pub fn is_isomorphic(&self, a: &Graph, b: &Graph) -> Result<bool> {
        Ok(self.find_bijection(a, b)?.is_some())
    }

    /// Blank node mapping from A's labels to B's under which A equals B.
    ///
    /// `Ok(None)` when the graphs are not isomorphic; a search that runs past
    /// `search_budget` steps is [`crate::CompareError::ComparisonTimeout`].
    pub fn find_bijection(
        &self,
        a: &Graph,
        b: &Graph,
    ) -> Result<Option<BTreeMap<BlankNode, BlankNode>>> {
        if a.len() != b.len() {
            return Ok(None);
        }
        let ia = IndexedGraph::new(a);
        let ib = IndexedGraph::new(b);
        if ia.non_ground.len() != ib.non_ground.len()
            || ia.blank_nodes.len() != ib.blank_nodes.len()
            || !ia.ground.iter().all(|triple| b.contains(triple))
        {
            return Ok(None);
        }
        if ia.blank_nodes.is_empty() {
            return Ok(Some(BTreeMap::new()));
        }

        let (sig_a, sig_b) = refine_pair(&ia, &ib, self.config.max_refinement_rounds);
        let search = BijectionSearch::new(&ia, &ib, &sig_a, &sig_b, self.config.search_budget);
        let found = search.run()?;
        Ok(found.map(|mapping| {
            mapping
                .into_iter()
                .map(|(from, to)| (from.clone(), to.clone()))
                .collect()
        }))
    }

    /// Triples only in A, only in B, and in both.
    ///
    /// Isomorphic graphs put everything in `in_both`. Otherwise blank node
    /// triples are paired through their canonical forms.
    pub fn diff(&self, a: &Graph, b: &Graph) -> Result<GraphDiff> {
        if self.find_bijection(a, b)?.is_some() {
            return Ok(GraphDiff {
                in_both: a.iter().cloned().collect(),
                ..GraphDiff::default()
            });
        }

        let ia = IndexedGraph::new(a);
        let ib = IndexedGraph::new(b);
        let (sig_a, sig_b) = refine_pair(&ia, &ib, self.config.max_refinement_rounds);

        let canonical_a: HashSet<Triple> =
            a.iter().map(|triple| canonical_form(triple, &sig_a)).collect();
        let canonical_b: HashSet<Triple> =
            b.iter().map(|triple| canonical_form(triple, &sig_b)).collect();

        let mut diff = GraphDiff::default();
        for triple in a.iter() {
            if canonical_b.contains(&canonical_form(triple, &sig_a)) {
                diff.in_both.insert(triple.clone());
            } else {
                diff.only_in_a.insert(triple.clone());
            }
        }
        for triple in b.iter() {
            if !canonical_a.contains(&canonical_form(triple, &sig_b)) {
                diff.only_in_b.insert(triple.clone());
            }
        }
        debug!("Graph diff: {}", diff.summary());
        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompareError;
    use std::collections::BTreeSet;
    use mimizuku_core::vocab::{prov, rdf};
    use mimizuku_core::{Iri, Literal};

    fn ex(local: &str) -> Iri {
        Iri::new(format!("http://example.org/{}", local))
    }

    fn cycle(prefix: &str, start: usize, len: usize) -> Vec<Triple> {
        (0..len)
            .map(|i| {
                Triple::new(
                    BlankNode::new(format!("{}{}", prefix, start + i)),
                    ex("next"),
                    BlankNode::new(format!("{}{}", prefix, start + (i + 1) % len)),
                )
            })
            .collect()
    }

    fn attributed(label: &str) -> Graph {
        vec![
            Triple::new(ex("doc1"), Iri::new(prov::WAS_ATTRIBUTED_TO), BlankNode::new(label)),
            Triple::new(BlankNode::new(label), Iri::new(rdf::TYPE), Iri::new(prov::AGENT)),
            Triple::new(BlankNode::new(label), ex("name"), Literal::simple("Alice")),
        ]
        .into_iter()
        .collect()
    }

    #[cfg(test)]
    mod isomorphism_tests {
        use super::*;

        #[test]
        fn test_empty_graphs() {
            let comparator = GraphComparator::default();
            let empty = Graph::new();
            let one: Graph = vec![Triple::new(ex("s"), ex("p"), ex("o"))].into_iter().collect();
            assert!(comparator.is_isomorphic(&empty, &Graph::new()).unwrap());
            assert!(!comparator.is_isomorphic(&empty, &one).unwrap());
            assert!(!comparator.is_isomorphic(&one, &empty).unwrap());
        }

        #[test]
        fn test_ground_graphs_compare_as_sets() {
            let comparator = GraphComparator::default();
            let a: Graph = vec![Triple::new(ex("s"), ex("p"), ex("o"))].into_iter().collect();
            let b: Graph = vec![Triple::new(ex("s"), ex("p"), ex("other"))].into_iter().collect();
            assert!(comparator.is_isomorphic(&a, &a.clone()).unwrap());
            assert!(!comparator.is_isomorphic(&a, &b).unwrap());
        }

        #[test]
        fn test_blank_node_renaming() {
            let comparator = GraphComparator::default();
            assert!(comparator
                .is_isomorphic(&attributed("agent"), &attributed("b0"))
                .unwrap());
            let mapping = comparator
                .find_bijection(&attributed("agent"), &attributed("b0"))
                .unwrap()
                .unwrap();
            assert_eq!(mapping.get(&BlankNode::new("agent")), Some(&BlankNode::new("b0")));
        }

        #[test]
        fn test_blank_node_is_not_an_iri() {
            let comparator = GraphComparator::default();
            let named: Graph = vec![
                Triple::new(ex("doc1"), Iri::new(prov::WAS_ATTRIBUTED_TO), ex("alice")),
                Triple::new(ex("alice"), Iri::new(rdf::TYPE), Iri::new(prov::AGENT)),
                Triple::new(ex("alice"), ex("name"), Literal::simple("Alice")),
            ]
            .into_iter()
            .collect();
            assert!(!comparator.is_isomorphic(&attributed("a"), &named).unwrap());
        }

        #[test]
        fn test_symmetric_cycles() {
            let comparator = GraphComparator::default();
            let a: Graph = cycle("a", 0, 6).into_iter().collect();
            let b: Graph = cycle("b", 10, 6).into_iter().collect();
            assert!(comparator.is_isomorphic(&a, &b).unwrap());

            let mut split: Graph = cycle("c", 0, 3).into_iter().collect();
            split.extend(cycle("c", 3, 3));
            assert!(!comparator.is_isomorphic(&a, &split).unwrap());
        }

        #[test]
        fn test_self_loop_differs_from_pair() {
            let comparator = GraphComparator::default();
            let looped: Graph = vec![
                Triple::new(BlankNode::new("x"), ex("p"), BlankNode::new("x")),
                Triple::new(BlankNode::new("y"), ex("p"), BlankNode::new("y")),
            ]
            .into_iter()
            .collect();
            let crossed: Graph = vec![
                Triple::new(BlankNode::new("x"), ex("p"), BlankNode::new("y")),
                Triple::new(BlankNode::new("y"), ex("p"), BlankNode::new("x")),
            ]
            .into_iter()
            .collect();
            assert!(!comparator.is_isomorphic(&looped, &crossed).unwrap());
        }

        #[test]
        fn test_search_budget_is_enforced() {
            // two 10-cycles against one 20-cycle: every node looks alike
            let mut a: Graph = cycle("a", 0, 10).into_iter().collect();
            a.extend(cycle("a", 10, 10));
            let b: Graph = cycle("b", 0, 20).into_iter().collect();

            let err = GraphComparator::with_budget(50).is_isomorphic(&a, &b).unwrap_err();
            assert_eq!(
                err,
                CompareError::ComparisonTimeout {
                    budget: 50,
                    blank_nodes: 20
                }
            );
            assert!(err.to_string().contains("search budget of 50 steps"));
        }
    }

    #[cfg(test)]
    mod diff_tests {
        use super::*;

        #[test]
        fn test_isomorphic_graphs_share_everything() {
            let diff = GraphComparator::default()
                .diff(&attributed("a"), &attributed("b"))
                .unwrap();
            assert!(diff.is_empty());
            assert_eq!(diff.in_both.len(), 3);
            assert!(diff
                .in_both
                .iter()
                .all(|t| t.blank_nodes().all(|n| n.id() == "a")));
        }

        #[test]
        fn test_changed_literal_shows_on_both_sides() {
            let a = attributed("a");
            let mut b = attributed("b");
            b.remove(&Triple::new(BlankNode::new("b"), ex("name"), Literal::simple("Alice")));
            b.insert(Triple::new(BlankNode::new("b"), ex("name"), Literal::simple("Bob")));

            // the literal is part of the blank node's signature, so every
            // triple touching that node loses its counterpart
            let diff = GraphComparator::default().diff(&a, &b).unwrap();
            assert!(diff.in_both.is_empty());
            assert_eq!(diff.only_in_a, a.iter().cloned().collect::<BTreeSet<_>>());
            assert_eq!(diff.only_in_b, b.iter().cloned().collect::<BTreeSet<_>>());
            assert!(diff
                .only_in_b
                .contains(&Triple::new(BlankNode::new("b"), ex("name"), Literal::simple("Bob"))));
        }

        #[test]
        fn test_ground_additions() {
            let a = attributed("a");
            let mut b = attributed("a");
            b.insert(Triple::new(ex("doc1"), Iri::new(rdf::TYPE), Iri::new(prov::ENTITY)));

            let diff = GraphComparator::default().diff(&a, &b).unwrap();
            assert!(diff.only_in_a.is_empty());
            assert_eq!(diff.in_both.len(), 3);
            assert_eq!(diff.only_in_b.len(), 1);
        }

        #[test]
        fn test_diff_propagates_timeout() {
            let mut a: Graph = cycle("a", 0, 10).into_iter().collect();
            a.extend(cycle("a", 10, 10));
            let b: Graph = cycle("b", 0, 20).into_iter().collect();
            assert!(GraphComparator::with_budget(10).diff(&a, &b).is_err());
        }
    }
}
