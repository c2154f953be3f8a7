use std::collections::BTreeSet;
use std::fmt;

use mimizuku_core::Triple;
use serde::{Deserialize, Serialize};

/// Triple-level difference between two graphs.
///
/// `only_in_a` and `in_both` carry A's blank node labels, `only_in_b` B's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDiff {
    pub only_in_a: BTreeSet<Triple>,
    pub only_in_b: BTreeSet<Triple>,
    pub in_both: BTreeSet<Triple>,
}

impl GraphDiff {
    /// True when neither side has a triple the other lacks
    pub fn is_empty(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} only in A, {} only in B, {} in both",
            self.only_in_a.len(),
            self.only_in_b.len(),
            self.in_both.len()
        )
    }
}

/// `-` lines for A-only triples, `+` lines for B-only triples
impl fmt::Display for GraphDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for triple in &self.only_in_a {
            writeln!(f, "- {}", triple)?;
        }
        for triple in &self.only_in_b {
            writeln!(f, "+ {}", triple)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod diff_tests {
    use super::*;
    use mimizuku_core::{Iri, Literal};

    #[test]
    fn test_display_marks_sides() {
        let mut diff = GraphDiff::default();
        assert!(diff.is_empty());
        diff.only_in_a.insert(Triple::new(
            Iri::new("http://example.org/s"),
            Iri::new("http://example.org/p"),
            Literal::simple("old"),
        ));
        diff.only_in_b.insert(Triple::new(
            Iri::new("http://example.org/s"),
            Iri::new("http://example.org/p"),
            Literal::simple("new"),
        ));
        assert!(!diff.is_empty());
        assert_eq!(
            diff.to_string(),
            "- <http://example.org/s> <http://example.org/p> \"old\" .\n+ <http://example.org/s> <http://example.org/p> \"new\" .\n"
        );
        assert_eq!(diff.summary(), "1 only in A, 1 only in B, 0 in both");
    }
}
