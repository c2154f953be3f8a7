#![cfg(unix)]

use std::time::Duration;

use mimizuku_core::vocab::{owl, rdf};
use mimizuku_core::{Graph, Iri, Triple};
use mimizuku_reasoning::{
    CommandReasoner, Ontology, ReasonerError, ReasoningEngine, ReasoningGateway, ReasoningOptions,
};

fn sample() -> Ontology {
    let graph: Graph = vec![
        Triple::new(
            Iri::new("http://example.org/Person"),
            Iri::new(rdf::TYPE),
            Iri::new(owl::CLASS),
        ),
        Triple::new(
            Iri::new("http://example.org/doc1"),
            Iri::new(rdf::TYPE),
            Iri::new("http://example.org/Person"),
        ),
    ]
    .into_iter()
    .collect();
    Ontology::new(graph)
}

fn shell(script: &str) -> CommandReasoner {
    CommandReasoner::new("sh").args(["-c", script, "reasoner", "{input}"])
}

fn run(reasoner: &CommandReasoner, options: ReasoningOptions) -> Result<usize, ReasonerError> {
    let ontology = sample();
    let mut context = ontology.lock().unwrap();
    reasoner.reason(&mut context, &options)?;
    Ok(context.inferred_count())
}

#[test]
fn test_consistent_run() {
    let reasoner = shell("test -s \"$1\" && echo 'Ontology is consistent'");
    assert_eq!(run(&reasoner, ReasoningOptions::default()).unwrap(), 0);
}

#[test]
fn test_ontology_is_serialized_in_input_format() {
    let reasoner = shell("grep -q '<http://example.org/doc1>' \"$1\"").input_format("ntriples");
    assert!(run(&reasoner, ReasoningOptions::default()).is_ok());

    let rdfxml = shell("grep -q 'rdf:RDF' \"$1\"");
    assert!(run(&rdfxml, ReasoningOptions::default()).is_ok());
}

#[test]
fn test_inconsistent_output() {
    let reasoner = shell("echo 'Ontology is INCONSISTENT: Person disjoint with Robot'; exit 1");
    let err = run(&reasoner, ReasoningOptions::default()).unwrap_err();
    assert!(matches!(err, ReasonerError::Inconsistent(ref line) if line.contains("Person")));
}

#[test]
fn test_non_zero_exit() {
    let reasoner = shell("echo boom >&2; exit 3");
    let err = run(&reasoner, ReasoningOptions::default()).unwrap_err();
    match err {
        ReasonerError::Internal(message) => assert!(message.contains("boom")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_program_is_unavailable() {
    let reasoner = CommandReasoner::new("/definitely/not/a/reasoner");
    let err = run(&reasoner, ReasoningOptions::default()).unwrap_err();
    assert!(matches!(err, ReasonerError::Unavailable(_)));
}

#[test]
fn test_options_reach_the_program() {
    let reasoner = shell(
        "test \"$MIMIZUKU_INFER_PROPERTY_VALUES\" = 1 && test \"$MIMIZUKU_INFER_DATA_PROPERTY_VALUES\" = 1",
    );
    assert!(run(&reasoner, ReasoningOptions::all()).is_ok());
    assert!(run(&reasoner, ReasoningOptions::default()).is_err());
}

#[test]
fn test_inferred_triples_from_stdout() {
    let reasoner = shell(
        "echo '<http://example.org/doc1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Thing> .'; \
         echo '<http://example.org/doc1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Person> .'",
    )
    .output_format("ntriples");
    // the second line is already asserted
    assert_eq!(run(&reasoner, ReasoningOptions::all()).unwrap(), 1);
}

#[test]
fn test_timeout() {
    let reasoner = shell("sleep 5").timeout(Duration::from_millis(100));
    let err = run(&reasoner, ReasoningOptions::default()).unwrap_err();
    assert!(matches!(err, ReasonerError::Timeout(_)));
}

#[test]
fn test_gateway_turns_command_failures_into_results() {
    let ontology = sample();
    let gateway = ReasoningGateway::new(Box::new(shell("echo 'inconsistent ontology'; exit 1")));
    let result = gateway.check_consistency(&ontology);
    assert!(result.is_failure());
    assert_eq!(result.engine, "sh");
    assert!(result.message.contains("inconsistent"));

    let missing = ReasoningGateway::new(Box::new(CommandReasoner::new("/definitely/not/a/reasoner")));
    assert!(missing.check_consistency(&ontology).is_failure());
}
