//! Bounded backtracking search for a blank node bijection

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};

use mimizuku_core::{BlankNode, Subject, Term, Triple};
use tracing::{debug, warn};

use crate::canon::{IndexedGraph, Signature, Signatures};
use crate::error::{CompareError, Result};

pub(crate) type Bijection<'a, 'b> = HashMap<&'a BlankNode, &'b BlankNode>;

struct Frame<'f, 'a, 'b> {
    node: &'a BlankNode,
    candidates: &'f [&'b BlankNode],
    next: usize,
    current: Option<&'b BlankNode>,
}

pub(crate) struct BijectionSearch<'s, 'a, 'b> {
    a: &'s IndexedGraph<'a>,
    b: &'s IndexedGraph<'b>,
    signatures: &'s Signatures<'a>,
    classes: HashMap<Signature, Vec<&'b BlankNode>>,
    budget: u64,
}

impl<'s, 'a, 'b> BijectionSearch<'s, 'a, 'b> {
    pub fn new(
        a: &'s IndexedGraph<'a>,
        b: &'s IndexedGraph<'b>,
        sig_a: &'s Signatures<'a>,
        sig_b: &Signatures<'b>,
        budget: u64,
    ) -> Self {
        let mut classes: HashMap<Signature, Vec<&'b BlankNode>> = HashMap::new();
        for &node in &b.blank_nodes {
            if let Some(&signature) = sig_b.get(node) {
                classes.entry(signature).or_default().push(node);
            }
        }
        Self {
            a,
            b,
            signatures: sig_a,
            classes,
            budget,
        }
    }

    fn candidates(&self, node: &BlankNode) -> &[&'b BlankNode] {
        self.signatures
            .get(node)
            .and_then(|signature| self.classes.get(signature))
            .map(|class| class.as_slice())
            .unwrap_or(&[])
    }

    /// Class sizes must agree before any search is worth doing
    fn classes_match(&self) -> bool {
        let mut sizes: HashMap<Signature, usize> = HashMap::new();
        for signature in self.signatures.values() {
            *sizes.entry(*signature).or_default() += 1;
        }
        sizes.len() == self.classes.len()
            && sizes
                .iter()
                .all(|(signature, &size)| self.classes.get(signature).map(Vec::len) == Some(size))
    }

    /// `triple` in B's labels, or `None` while one of its blank nodes is unmapped
    fn translate(triple: &Triple, mapping: &Bijection<'a, 'b>) -> Option<Triple> {
        let subject = match &triple.subject {
            Subject::BlankNode(node) => Subject::BlankNode((*mapping.get(node)?).clone()),
            iri => iri.clone(),
        };
        let object = match &triple.object {
            Term::BlankNode(node) => Term::BlankNode((*mapping.get(node)?).clone()),
            other => other.clone(),
        };
        Some(Triple {
            subject,
            predicate: triple.predicate.clone(),
            object,
        })
    }

    /// Every fully mapped triple around `node` must exist in B
    fn consistent(&self, node: &BlankNode, mapping: &Bijection<'a, 'b>) -> bool {
        self.a
            .incident(node)
            .iter()
            .filter_map(|triple| Self::translate(triple, mapping))
            .all(|triple| self.b.graph.contains(&triple))
    }

    /// Next node to assign: fewest candidates, then most already-mapped neighbours
    fn pick(
        &self,
        remaining: &BTreeSet<&'a BlankNode>,
        mapping: &Bijection<'a, 'b>,
    ) -> Option<&'a BlankNode> {
        remaining.iter().copied().min_by_key(|&node| {
            let anchored = self
                .a
                .incident(node)
                .iter()
                .filter(|triple| triple.blank_nodes().any(|n| mapping.contains_key(n)))
                .count();
            (self.candidates(node).len(), Reverse(anchored), node)
        })
    }

    fn timeout(&self) -> CompareError {
        warn!(
            "Graph comparison gave up after {} steps ({} blank nodes)",
            self.budget,
            self.a.blank_nodes.len()
        );
        CompareError::ComparisonTimeout {
            budget: self.budget,
            blank_nodes: self.a.blank_nodes.len(),
        }
    }

    /// Search for a bijection; `Ok(None)` means the graphs differ.
    pub fn run(&self) -> Result<Option<Bijection<'a, 'b>>> {
        if self.a.blank_nodes.len() != self.b.blank_nodes.len() || !self.classes_match() {
            return Ok(None);
        }

        let mut mapping: Bijection<'a, 'b> = HashMap::new();
        let mut used: HashSet<&'b BlankNode> = HashSet::new();
        let mut remaining: BTreeSet<&'a BlankNode> = BTreeSet::new();
        let mut steps: u64 = 0;

        // singleton classes leave no choice
        for &node in &self.a.blank_nodes {
            match self.candidates(node) {
                [only] => {
                    mapping.insert(node, *only);
                    used.insert(*only);
                }
                _ => {
                    remaining.insert(node);
                }
            }
        }
        for &node in mapping.keys() {
            if !self.consistent(node, &mapping) {
                return Ok(None);
            }
        }
        debug!(
            "{} blank nodes fixed by signature, {} left to search",
            mapping.len(),
            remaining.len()
        );

        let mut stack: Vec<Frame<'_, 'a, 'b>> = Vec::new();
        let mut descend = true;
        loop {
            if descend {
                let Some(node) = self.pick(&remaining, &mapping) else {
                    debug!("Bijection found after {} steps", steps);
                    return Ok(Some(mapping));
                };
                remaining.remove(node);
                stack.push(Frame {
                    node,
                    candidates: self.candidates(node),
                    next: 0,
                    current: None,
                });
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(None);
            };
            if let Some(previous) = frame.current.take() {
                mapping.remove(frame.node);
                used.remove(previous);
            }

            descend = false;
            while frame.next < frame.candidates.len() {
                let candidate = frame.candidates[frame.next];
                frame.next += 1;
                if used.contains(candidate) {
                    continue;
                }
                steps += 1;
                if steps > self.budget {
                    return Err(self.timeout());
                }
                mapping.insert(frame.node, candidate);
                if self.consistent(frame.node, &mapping) {
                    used.insert(candidate);
                    frame.current = Some(candidate);
                    descend = true;
                    break;
                }
                mapping.remove(frame.node);
            }

            if !descend {
                if let Some(exhausted) = stack.pop() {
                    remaining.insert(exhausted.node);
                }
                if stack.is_empty() {
                    return Ok(None);
                }
            }
        }
    }
}
