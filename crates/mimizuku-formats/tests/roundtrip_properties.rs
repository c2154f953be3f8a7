//! Property-based round trips through every built-in format

use mimizuku_core::vocab::xsd;
use mimizuku_core::{BlankNode, Graph, Iri, Literal, Subject, Term, Triple};
use mimizuku_formats::{parse, serialize, RdfFormat};
use proptest::prelude::*;

fn iri_strategy() -> impl Strategy<Value = Iri> {
    "[a-z]{1,8}".prop_map(|s| Iri::new(format!("http://example.org/{}", s)))
}

/// Local names start with a letter so every format can abbreviate them
fn predicate_strategy() -> impl Strategy<Value = Iri> {
    "[a-z][a-z0-9]{0,6}".prop_map(|s| Iri::new(format!("http://example.org/vocab#{}", s)))
}

/// Labels every writer keeps as they are
fn blank_strategy() -> impl Strategy<Value = BlankNode> {
    "n[a-z0-9]{0,4}".prop_map(BlankNode::new)
}

fn literal_strategy() -> impl Strategy<Value = Literal> {
    prop_oneof![
        "[a-zA-Z0-9 .,!?;:'\"<>&\\\\-]{0,20}".prop_map(|s| Literal::simple(s)),
        ("[a-zA-Z0-9 ]{0,12}", "[a-z]{2}(-[a-z]{2})?")
            .prop_map(|(s, lang)| Literal::lang_tagged(s, lang)),
        any::<i64>().prop_map(|n| Literal::typed(n.to_string(), xsd::INTEGER)),
        any::<bool>().prop_map(|b| Literal::typed(b.to_string(), xsd::BOOLEAN)),
        "[0-9]{4}-[0-9]{2}-[0-9]{2}".prop_map(|s| Literal::typed(s, xsd::DATE)),
    ]
}

fn ground_triple_strategy() -> impl Strategy<Value = Triple> {
    (
        iri_strategy(),
        predicate_strategy(),
        prop_oneof![
            iri_strategy().prop_map(Term::Iri),
            literal_strategy().prop_map(Term::Literal),
        ],
    )
        .prop_map(|(s, p, o)| Triple::new(s, p, o))
}

fn blank_triple_strategy() -> impl Strategy<Value = Triple> {
    (
        prop_oneof![
            iri_strategy().prop_map(Subject::Iri),
            blank_strategy().prop_map(Subject::BlankNode),
        ],
        predicate_strategy(),
        prop_oneof![
            iri_strategy().prop_map(Term::Iri),
            blank_strategy().prop_map(Term::BlankNode),
            literal_strategy().prop_map(Term::Literal),
        ],
    )
        .prop_map(|(s, p, o)| Triple::new(s, p, o))
}

fn assert_same_triples(written: &Graph, back: &Graph) -> Result<(), TestCaseError> {
    let expected: Vec<&Triple> = written.iter().collect();
    let actual: Vec<&Triple> = back.iter().collect();
    prop_assert_eq!(expected, actual);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ground_graphs_survive_every_format(
        triples in prop::collection::vec(ground_triple_strategy(), 0..12)
    ) {
        let graph: Graph = triples.into_iter().collect();
        for format in RdfFormat::ALL {
            let text = serialize(&graph, format.name()).unwrap();
            let back = parse(&text, format.name())
                .map_err(|e| TestCaseError::fail(format!("{}: {}\n{}", format, e, text)))?;
            assert_same_triples(&graph, &back)?;
        }
    }

    #[test]
    fn labeled_blank_nodes_survive_every_format(
        triples in prop::collection::vec(blank_triple_strategy(), 1..16)
    ) {
        let graph: Graph = triples.into_iter().collect();
        for format in RdfFormat::ALL {
            let text = serialize(&graph, format.name()).unwrap();
            let back = parse(&text, format.name())
                .map_err(|e| TestCaseError::fail(format!("{}: {}\n{}", format, e, text)))?;
            assert_same_triples(&graph, &back)?;
        }
    }

    #[test]
    fn ntriples_lines_match_triple_count(
        triples in prop::collection::vec(ground_triple_strategy(), 0..20)
    ) {
        let graph: Graph = triples.into_iter().collect();
        let text = serialize(&graph, "ntriples").unwrap();
        prop_assert_eq!(text.lines().count(), graph.len());
    }
}
