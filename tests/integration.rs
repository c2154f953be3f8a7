// Integration tests for Mimizuku components
// These tests cross crate boundaries: codecs feed the comparator, the
// provenance matcher and the reasoning gateway

#![cfg(test)]

use mimizuku::Validator;
use mimizuku_compare::{isomorphic, CompareError, GraphComparator};
use mimizuku_core::vocab::{owl, prov, rdf, xsd};
use mimizuku_core::{BlankNode, Graph, Iri, Literal, Subject, Term, Triple};
use mimizuku_formats::{parse, serialize, FormatError, RdfFormat};
use mimizuku_provenance::{has_provenance, has_provenance_in};
use mimizuku_reasoning::{
    Ontology, OntologyContext, ReasonerError, ReasoningEngine, ReasoningGateway, ReasoningOptions,
    ReasoningStatus,
};

const DOC1_NTRIPLES: &str = "\
<http://example.org/document1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/ns/prov#Entity> .
<http://example.org/document1> <http://www.w3.org/ns/prov#wasGeneratedBy> <http://example.org/activity1> .
<http://example.org/document1> <http://www.w3.org/ns/prov#wasAttributedTo> <http://example.org/person1> .
";

const DOC1_TURTLE: &str = "
@prefix prov: <http://www.w3.org/ns/prov#> .
@prefix ex: <http://example.org/> .

ex:document1 a prov:Entity ;
    prov:wasGeneratedBy ex:activity1 ;
    prov:wasAttributedTo ex:person1 .
";

fn ex(local: &str) -> Iri {
    Iri::new(format!("http://example.org/{}", local))
}

fn ground_fixture() -> Graph {
    let mut graph = Graph::new();
    graph.bind_prefix("ex", "http://example.org/");
    graph.insert(Triple::new(ex("document1"), Iri::new(rdf::TYPE), Iri::new(prov::ENTITY)));
    graph.insert(Triple::new(ex("document1"), ex("title"), Literal::lang_tagged("Rapport annuel", "fr")));
    graph.insert(Triple::new(ex("document1"), ex("pages"), Literal::typed("42", xsd::INTEGER)));
    graph.insert(Triple::new(ex("document1"), ex("note"), Literal::simple("line one\nline \"two\"")));
    graph.insert(Triple::new(ex("document1"), ex("published"), Literal::typed("2024-06-23", xsd::DATE)));
    graph
}

/// Anonymous agent, a collection and a nested description
fn blank_fixture() -> Graph {
    parse(
        r#"
        @prefix ex: <http://example.org/> .
        @prefix prov: <http://www.w3.org/ns/prov#> .

        ex:document1 prov:wasAttributedTo [
            a prov:Agent ;
            ex:name "Alice" ;
            ex:memberOf [ ex:name "Research" ]
        ] ;
            ex:chapters ( ex:intro ex:body ex:outro ) .
        "#,
        "turtle",
    )
    .unwrap()
}

#[test]
fn test_ground_graph_round_trips_through_every_format() {
    let graph = ground_fixture();
    for format in RdfFormat::ALL {
        let text = serialize(&graph, format.name()).unwrap();
        let back = parse(&text, format.name()).unwrap();
        let expected: Vec<&Triple> = graph.iter().collect();
        let actual: Vec<&Triple> = back.iter().collect();
        assert_eq!(expected, actual, "round trip through {}", format);
    }
}

#[test]
fn test_blank_node_graph_is_isomorphic_after_every_format() {
    let graph = blank_fixture();
    assert_eq!(graph.len(), 12);
    for format in RdfFormat::ALL {
        let text = serialize(&graph, format.name()).unwrap();
        let back = parse(&text, format.name()).unwrap();
        assert!(isomorphic(&graph, &back).unwrap(), "round trip through {}:\n{}", format, text);
    }
}

#[test]
fn test_unsupported_format_lists_supported_formats() {
    let err = parse(DOC1_TURTLE, "microdata").unwrap_err();
    assert!(matches!(err, FormatError::UnsupportedFormat { .. }));
    assert_eq!(
        err.to_string(),
        "Unsupported format: microdata. Supported formats are: turtle, ntriples, n3, json-ld, rdfxml, trig"
    );
}

#[test]
fn test_ntriples_to_turtle_matches_authored_turtle() -> anyhow::Result<()> {
    let validator = Validator::new();
    let turtle = validator.serialize_graph_to_turtle(DOC1_NTRIPLES, "nt")?;
    let produced = parse(&turtle, "turtle")?;
    let authored = parse(DOC1_TURTLE, "turtle")?;
    assert!(isomorphic(&produced, &authored)?);
    assert_eq!(produced.len(), 3);
    Ok(())
}

#[test]
fn test_renaming_blank_nodes_keeps_graphs_equal() {
    let graph = blank_fixture();
    let relabeled: Graph = graph
        .iter()
        .map(|t| {
            let subject = match t.subject.as_blank_node() {
                Some(b) => Subject::BlankNode(BlankNode::new(format!("renamed_{}", b.id()))),
                None => t.subject.clone(),
            };
            let object = match t.object.as_blank_node() {
                Some(b) => Term::BlankNode(BlankNode::new(format!("renamed_{}", b.id()))),
                None => t.object.clone(),
            };
            Triple::new(subject, t.predicate.clone(), object)
        })
        .collect();
    assert!(isomorphic(&graph, &relabeled).unwrap());

    let mut changed = relabeled;
    changed.insert(Triple::new(ex("document1"), ex("extra"), Literal::simple("x")));
    assert!(!isomorphic(&graph, &changed).unwrap());
}

#[test]
fn test_provenance_positive_and_negative() {
    assert!(has_provenance_in(DOC1_TURTLE, "turtle"));
    assert!(has_provenance(&parse(DOC1_NTRIPLES, "ntriples").unwrap()));

    let plain = "<http://example.org/document1> <http://purl.org/dc/terms/title> \"Annual report\" .\n";
    assert!(!has_provenance_in(plain, "nt"));
    assert!(!has_provenance_in("this is not turtle", "turtle"));
}

/// Rejects any ontology asserting owl:Nothing membership
struct NothingChecker;

impl ReasoningEngine for NothingChecker {
    fn name(&self) -> &str {
        "nothing-checker"
    }

    fn reason(
        &self,
        context: &mut OntologyContext<'_>,
        _options: &ReasoningOptions,
    ) -> Result<(), ReasonerError> {
        let nothing = Term::Iri(Iri::new(format!("{}Nothing", owl::NAMESPACE)));
        let members = context
            .graph()
            .triples_matching(None, Some(&Iri::new(rdf::TYPE)), Some(&nothing))
            .len();
        if members > 0 {
            return Err(ReasonerError::Inconsistent(format!(
                "{} individuals of owl:Nothing",
                members
            )));
        }
        Ok(())
    }
}

#[test]
fn test_gateway_never_raises_on_inconsistent_ontology() {
    let ontology = Ontology::new(
        parse(
            "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n<http://example.org/ghost> a owl:Nothing .\n",
            "turtle",
        )
        .unwrap(),
    );
    let result = ReasoningGateway::new(Box::new(NothingChecker)).check_consistency(&ontology);
    assert_eq!(result.status, ReasoningStatus::Failure);
    assert!(result.message.contains("owl:Nothing"));

    // the ontology stays usable afterwards
    assert_eq!(ontology.snapshot().unwrap().len(), 1);
}

#[test]
fn test_comparator_is_bounded() {
    let ring = |prefix: &str, start: usize, len: usize| -> Vec<Triple> {
        (0..len)
            .map(|i| {
                Triple::new(
                    BlankNode::new(format!("{}{}", prefix, start + i)),
                    ex("next"),
                    BlankNode::new(format!("{}{}", prefix, start + (i + 1) % len)),
                )
            })
            .collect()
    };
    let mut two_rings: Graph = ring("a", 0, 12).into_iter().collect();
    two_rings.extend(ring("a", 12, 12));
    let one_ring: Graph = ring("b", 0, 24).into_iter().collect();

    let err = GraphComparator::with_budget(100)
        .is_isomorphic(&two_rings, &one_ring)
        .unwrap_err();
    assert_eq!(
        err,
        CompareError::ComparisonTimeout {
            budget: 100,
            blank_nodes: 24
        }
    );
}

#[test]
fn test_load_convert_and_compare_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let nt = dir.path().join("doc1.nt");
    let ttl = dir.path().join("doc1.ttl");
    std::fs::write(&nt, DOC1_NTRIPLES)?;
    std::fs::write(&ttl, DOC1_TURTLE)?;

    let validator = Validator::new();
    let a = validator.load_graph(&nt, "nt")?;
    let b = validator.load_graph(&ttl, "turtle")?;
    assert!(validator.compare(&a, &b)?);

    let xml = validator.serialize(&a, "rdfxml")?;
    let c = validator.parse(&xml, "rdf/xml")?;
    assert!(validator.diff(&a, &c)?.is_empty());
    Ok(())
}
