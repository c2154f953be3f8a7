//! Property tests for term ordering, literal normalization and escaping

use mimizuku_core::vocab::xsd;
use mimizuku_core::{escape_iri, escape_literal, BlankNode, Graph, Iri, Literal, Term, Triple};
use proptest::prelude::*;
use std::cmp::Ordering;

/// Reads back the escapes `escape_literal` produces
fn unescape(escaped: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

fn term_strategy() -> impl Strategy<Value = Term> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(|s| Term::iri(format!("http://example.org/{}", s))),
        "[a-z0-9]{1,4}".prop_map(|s| Term::BlankNode(BlankNode::new(s))),
        ".{0,8}".prop_map(|s| Term::Literal(Literal::simple(s))),
        ("[a-z]{0,6}", "[a-zA-Z]{2}").prop_map(|(s, l)| Term::Literal(Literal::lang_tagged(s, l))),
        "[0-9]{1,4}".prop_map(|s| Term::Literal(Literal::typed(s, xsd::INTEGER))),
    ]
}

proptest! {
    #[test]
    fn escaped_literals_read_back(value in any::<String>()) {
        let escaped = escape_literal(&value);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
        prop_assert!(!escaped.replace("\\\\", "").replace("\\\"", "").contains('"'));
        prop_assert_eq!(unescape(&escaped), Some(value));
    }

    #[test]
    fn literal_display_wraps_escaped_form(value in any::<String>(), lang in "[a-zA-Z]{2}(-[a-zA-Z]{2})?") {
        let literal = Literal::lang_tagged(value.clone(), &lang);
        prop_assert_eq!(
            literal.to_string(),
            format!("\"{}\"@{}", escape_literal(&value), lang.to_ascii_lowercase())
        );
        prop_assert_eq!(Literal::typed(value.clone(), xsd::STRING), Literal::simple(value));
    }

    #[test]
    fn escaped_iris_have_no_delimiters(value in any::<String>()) {
        let escaped = escape_iri(&value);
        prop_assert!(!escaped.chars().any(|c| matches!(c, '<' | '>' | '"' | ' ') || (c as u32) < 0x20));
    }

    #[test]
    fn term_ordering_agrees_with_equality(a in term_strategy(), b in term_strategy()) {
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn graph_order_ignores_insertion_order(
        objects in prop::collection::vec(term_strategy(), 0..16)
    ) {
        let subject = Iri::new("http://example.org/s");
        let predicate = Iri::new("http://example.org/p");
        let triples: Vec<Triple> = objects
            .into_iter()
            .map(|o| Triple::new(subject.clone(), predicate.clone(), o))
            .collect();

        let forward: Graph = triples.iter().cloned().collect();
        let backward: Graph = triples.iter().rev().cloned().collect();
        prop_assert!(forward.iter().eq(backward.iter()));

        let mut expected = triples.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(forward.len(), expected.len());
        prop_assert!(forward.iter().eq(expected.iter()));
    }
}
