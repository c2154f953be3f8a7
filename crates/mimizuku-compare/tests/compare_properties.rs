use mimizuku_compare::{isomorphic, CompareError, ComparatorConfig, GraphComparator};
use mimizuku_core::{BlankNode, Graph, Iri, Literal, Subject, Term, Triple};
use mimizuku_formats::parse;
use proptest::prelude::*;

const SIZE: usize = 10;

fn node(i: usize) -> BlankNode {
    BlankNode::new(format!("b{}", i))
}

/// `b{i}` -> `z{(7i + 3) mod 10}`, a permutation of the labels
fn renamed(node: &BlankNode) -> BlankNode {
    let i: usize = node.id()[1..].parse().unwrap();
    BlankNode::new(format!("z{}", (7 * i + 3) % SIZE))
}

fn rename(graph: &Graph) -> Graph {
    graph
        .iter()
        .map(|t| {
            let subject = match &t.subject {
                Subject::BlankNode(b) => Subject::BlankNode(renamed(b)),
                s => s.clone(),
            };
            let object = match &t.object {
                Term::BlankNode(b) => Term::BlankNode(renamed(b)),
                o => o.clone(),
            };
            Triple::new(subject, t.predicate.clone(), object)
        })
        .collect()
}

fn triple_strategy() -> impl Strategy<Value = Triple> {
    let subject = prop_oneof![
        (0..SIZE).prop_map(|i| Subject::BlankNode(node(i))),
        "[a-c]".prop_map(|s| Subject::Iri(Iri::new(format!("http://example.org/{}", s)))),
    ];
    let object = prop_oneof![
        (0..SIZE).prop_map(|i| Term::BlankNode(node(i))),
        "[a-c]".prop_map(|s| Term::Iri(Iri::new(format!("http://example.org/{}", s)))),
        "[xy]".prop_map(|s| Term::Literal(Literal::simple(s))),
    ];
    let predicate = "[pq]".prop_map(|s| Iri::new(format!("http://example.org/{}", s)));
    (subject, predicate, object).prop_map(|(s, p, o)| Triple::new(s, p, o))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn renaming_preserves_isomorphism(triples in prop::collection::vec(triple_strategy(), 0..24)) {
        let graph: Graph = triples.into_iter().collect();
        let comparator = GraphComparator::new(ComparatorConfig::default());
        match comparator.is_isomorphic(&graph, &rename(&graph)) {
            Ok(equal) => prop_assert!(equal),
            // highly symmetric inputs may exhaust the budget; never a wrong answer
            Err(CompareError::ComparisonTimeout { .. }) => {}
        }
    }

    #[test]
    fn extra_triple_breaks_isomorphism(
        triples in prop::collection::vec(triple_strategy(), 1..24),
        extra in triple_strategy(),
    ) {
        let graph: Graph = triples.into_iter().collect();
        let mut bigger = rename(&graph);
        prop_assume!(bigger.insert(Triple::new(
            extra.subject.clone(),
            Iri::new("http://example.org/extra"),
            extra.object.clone(),
        )));
        prop_assert!(!isomorphic(&graph, &bigger).unwrap());
    }
}

#[test]
fn test_parsed_documents_compare_across_formats() {
    let turtle = r#"
        @prefix prov: <http://www.w3.org/ns/prov#> .
        <http://example.org/doc1> prov:wasAttributedTo [ a prov:Agent ; <http://example.org/name> "Alice" ] .
    "#;
    let ntriples = "\
<http://example.org/doc1> <http://www.w3.org/ns/prov#wasAttributedTo> _:someone .
_:someone <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/ns/prov#Agent> .
_:someone <http://example.org/name> \"Alice\" .
";
    let a = parse(turtle, "turtle").unwrap();
    let b = parse(ntriples, "ntriples").unwrap();
    assert!(isomorphic(&a, &b).unwrap());
}

#[test]
fn test_budget_bounds_symmetric_search() {
    let ring = |prefix: &str, start: usize, len: usize| -> Vec<Triple> {
        (0..len)
            .map(|i| {
                Triple::new(
                    BlankNode::new(format!("{}{}", prefix, start + i)),
                    Iri::new("http://example.org/next"),
                    BlankNode::new(format!("{}{}", prefix, start + (i + 1) % len)),
                )
            })
            .collect()
    };
    let mut a: Graph = ring("a", 0, 10).into_iter().collect();
    a.extend(ring("a", 10, 10));
    let b: Graph = ring("b", 0, 20).into_iter().collect();

    let comparator = GraphComparator::new(ComparatorConfig {
        max_refinement_rounds: 4,
        search_budget: 50,
    });
    assert!(matches!(
        comparator.is_isomorphic(&a, &b),
        Err(CompareError::ComparisonTimeout { budget: 50, .. })
    ));
}
