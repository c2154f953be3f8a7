use mimizuku::prelude::*;
use mimizuku::reasoning::{OntologyContext, ReasonerError};
use mimizuku::MimizukuConfig;

const PROV_JSONLD: &str = r#"{
  "@context": {
    "prov": "http://www.w3.org/ns/prov#",
    "ex": "http://example.org/"
  },
  "@id": "ex:document1",
  "@type": "prov:Entity",
  "prov:wasGeneratedBy": {"@id": "ex:activity1"},
  "prov:wasAttributedTo": {"@id": "ex:person1"}
}"#;

const PROV_TURTLE: &str = r#"
@prefix prov: <http://www.w3.org/ns/prov#> .
@prefix ex: <http://example.org/> .

ex:document1 a prov:Entity ;
    prov:wasGeneratedBy ex:activity1 ;
    prov:wasAttributedTo ex:person1 .
"#;

struct AlwaysConsistent;

impl ReasoningEngine for AlwaysConsistent {
    fn name(&self) -> &str {
        "always-consistent"
    }

    fn reason(
        &self,
        _context: &mut OntologyContext<'_>,
        _options: &ReasoningOptions,
    ) -> Result<(), ReasonerError> {
        Ok(())
    }
}

#[test]
fn test_load_default_format_is_json_ld() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("document.jsonld");
    std::fs::write(&path, PROV_JSONLD).unwrap();

    let validator = Validator::new();
    let graph = validator.load_default(&path).unwrap();
    assert_eq!(graph.len(), 3);
    assert!(validator.has_provenance(&graph));

    let authored = validator.parse(PROV_TURTLE, "turtle").unwrap();
    assert!(validator.compare(&graph, &authored).unwrap());
}

#[test]
fn test_serialize_graph_to_turtle_matches_authored_turtle() {
    let ntriples = "\
<http://example.org/document1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/ns/prov#Entity> .
<http://example.org/document1> <http://www.w3.org/ns/prov#wasGeneratedBy> <http://example.org/activity1> .
<http://example.org/document1> <http://www.w3.org/ns/prov#wasAttributedTo> <http://example.org/person1> .
";
    let validator = Validator::new();
    let turtle = validator.serialize_graph_to_turtle(ntriples, "nt").unwrap();
    let produced = validator.parse(&turtle, "turtle").unwrap();
    let expected = validator.parse(PROV_TURTLE, "turtle").unwrap();
    assert!(validator.compare(&produced, &expected).unwrap());
    assert!(validator.diff(&produced, &expected).unwrap().is_empty());
}

#[test]
fn test_diff_reports_missing_attribution() {
    let validator = Validator::new();
    let full = validator.parse(PROV_TURTLE, "turtle").unwrap();
    let mut partial = full.clone();
    partial.remove(&Triple::new(
        Iri::new("http://example.org/document1"),
        Iri::new("http://www.w3.org/ns/prov#wasAttributedTo"),
        Iri::new("http://example.org/person1"),
    ));
    let diff = validator.diff(&full, &partial).unwrap();
    assert_eq!(diff.only_in_a.len(), 1);
    assert!(diff.only_in_b.is_empty());
    assert_eq!(diff.in_both.len(), 2);
}

#[test]
fn test_provenance_report() {
    let validator = Validator::new();
    let graph = validator.parse(PROV_TURTLE, "turtle").unwrap();
    let report = validator.provenance_report(&graph);
    assert_eq!(report.matching_triples, 3);
    assert_eq!(report.terms_found.len(), 3);

    let plain = validator
        .parse("<http://example.org/a> <http://example.org/b> \"c\" .", "nt")
        .unwrap();
    assert!(!validator.has_provenance(&plain));
}

#[test]
fn test_reasoning_with_injected_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample_ontology.owl");
    std::fs::write(
        &path,
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://example.org/Person"/>
</rdf:RDF>"#,
    )
    .unwrap();

    let validator = Validator::new().with_engine(Box::new(AlwaysConsistent));
    let ontology = validator.load_ontology(&path).unwrap();
    let result = validator.perform_reasoning(&ontology);
    assert!(result.is_success());
    assert_eq!(result.engine, "always-consistent");
    assert_eq!(result.ontology_id, Some(ontology.id()));
}

#[test]
fn test_missing_ontology_file() {
    let err = Validator::new()
        .load_ontology("sample_ontology_fail.owl")
        .unwrap_err();
    assert!(matches!(err, MimizukuError::Ontology(ref e) if e.is_io_error()));
}

#[cfg(unix)]
#[test]
fn test_configured_command_engine() {
    let config = MimizukuConfig::from_yaml_str(
        r#"
reasoning:
  command:
    program: sh
    args: ["-c", "echo 'ontology is inconsistent'; exit 1", "reasoner", "{input}"]
"#,
    )
    .unwrap();
    let validator = Validator::from_config(config);
    let ontology = Ontology::new(Graph::new());
    let result = validator.perform_reasoning(&ontology);
    assert_eq!(result.status, ReasoningStatus::Failure);
    assert!(result.message.contains("inconsistent"));
}

#[test]
fn test_configured_default_format() {
    let config = MimizukuConfig::from_yaml_str("formats:\n  default_format: turtle\n").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("document.ttl");
    std::fs::write(&path, PROV_TURTLE).unwrap();
    let graph = Validator::from_config(config).load_default(&path).unwrap();
    assert_eq!(graph.len(), 3);
}
