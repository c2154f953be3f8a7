use mimizuku_formats::{load_graph, parse, parse_bytes, FormatError};
use std::io::Write;

#[test]
fn test_unknown_format_is_rejected_before_parsing() {
    // the payload is not valid anything; only the tag matters
    let err = parse("\u{0}\u{1}", "yaml").unwrap_err();
    assert!(matches!(err, FormatError::UnsupportedFormat { .. }));
    assert_eq!(
        err.to_string(),
        "Unsupported format: yaml. Supported formats are: turtle, ntriples, n3, json-ld, rdfxml, trig"
    );
}

#[test]
fn test_turtle_error_position() {
    let input = "@prefix ex: <http://example.org/> .\n\nex:s ex:p ex:o ;\n    ex:q \"open .\n";
    let err = parse(input, "turtle").unwrap_err();
    assert!(err.is_parse_error());
    let position = err.position().unwrap();
    assert_eq!(position.line, 4);
}

#[test]
fn test_undefined_prefix_is_a_parse_error() {
    let err = parse("foo:s foo:p foo:o .", "ttl").unwrap_err();
    assert!(err.is_parse_error());
    assert_eq!(err.position().map(|p| p.line), Some(1));
}

#[test]
fn test_ntriples_rejects_turtle_shorthand() {
    let err = parse(
        "@prefix ex: <http://example.org/> .\nex:s ex:p ex:o .\n",
        "ntriples",
    )
    .unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn test_n3_formula_is_rejected() {
    let err = parse(
        "@prefix ex: <http://example.org/> .\n{ ex:a ex:b ex:c } => { ex:a ex:d ex:c } .\n",
        "n3",
    )
    .unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("formulae"));
}

#[test]
fn test_jsonld_error_position() {
    let err = parse("{\n  \"@id\": \"http://example.org/s\",\n  \"x\": [1, 2,,]\n}", "json-ld").unwrap_err();
    let position = err.position().unwrap();
    assert_eq!(position.line, 3);
}

#[test]
fn test_rdfxml_mismatched_tags() {
    let input = "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\n<rdf:Description>\n</rdf:Descr>\n</rdf:RDF>";
    let err = parse(input, "rdf/xml").unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.position().is_some());
}

#[test]
fn test_invalid_utf8_bytes() {
    let err = parse_bytes(b"<http://example.org/s> <http://example.org/p> \"\xc3\x28\" .", "nt").unwrap_err();
    assert!(err.is_parse_error());
    assert_eq!(err.position().map(|p| p.offset), Some(47));
}

#[test]
fn test_io_error_is_distinct_from_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.ttl");
    let err = load_graph(&missing, "turtle").unwrap_err();
    assert!(err.is_io_error());
    assert!(!err.is_parse_error());

    let path = dir.path().join("broken.ttl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "<http://example.org/s> <http://example.org/p> .").unwrap();
    let err = load_graph(&path, "turtle").unwrap_err();
    assert!(err.is_parse_error());
    assert!(!err.is_io_error());
}

#[test]
fn test_load_graph_reads_each_format() {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        ("doc.ttl", "turtle", "@prefix prov: <http://www.w3.org/ns/prov#> .\n<http://example.org/doc1> a prov:Entity .\n"),
        ("doc.nt", "nt", "<http://example.org/doc1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/ns/prov#Entity> .\n"),
        ("doc.jsonld", "jsonld", "{\"@id\": \"http://example.org/doc1\", \"@type\": \"http://www.w3.org/ns/prov#Entity\"}"),
        ("doc.owl", "xml", "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\" xmlns:prov=\"http://www.w3.org/ns/prov#\"><prov:Entity rdf:about=\"http://example.org/doc1\"/></rdf:RDF>"),
    ];
    for (name, format, content) in files {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        let graph = load_graph(&path, format).unwrap();
        assert_eq!(graph.len(), 1, "{}", name);
    }
}

#[test]
fn test_load_graph_resolves_against_file_iri() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.owl");
    std::fs::write(
        &path,
        r##"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="#Person"/>
</rdf:RDF>"##,
    )
    .unwrap();

    let graph = load_graph(&path, "rdfxml").unwrap();
    let triple = graph.iter().next().unwrap();
    let subject = triple.subject.to_string();
    assert!(subject.starts_with("<file:///"), "{}", subject);
    assert!(subject.ends_with("/people.owl#Person>"), "{}", subject);

    let text = mimizuku_formats::serialize(&graph, "ntriples").unwrap();
    let back = parse(&text, "ntriples").unwrap();
    assert!(back.iter().eq(graph.iter()));
}

#[test]
fn test_relative_iris_without_base_cannot_become_ntriples() {
    let graph = parse("<a> <http://example.org/p> <b> .", "turtle").unwrap();
    let err = mimizuku_formats::serialize(&graph, "ntriples").unwrap_err();
    assert!(matches!(err, FormatError::Serialize { .. }));

    let resolved = mimizuku_formats::parse_with_base(
        "<a> <http://example.org/p> <b> .",
        "turtle",
        "http://example.org/dir/",
    )
    .unwrap();
    let text = mimizuku_formats::serialize(&resolved, "ntriples").unwrap();
    assert_eq!(
        text,
        "<http://example.org/dir/a> <http://example.org/p> <http://example.org/dir/b> .\n"
    );
}
