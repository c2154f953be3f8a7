//! JSON-LD serializer: a prefix-only `@context` plus a flat `@graph`

use itertools::Itertools;
use mimizuku_core::vocab::{rdf, WELL_KNOWN_PREFIXES};
use mimizuku_core::{Graph, Iri, Literal, PrefixMap, Subject, Term};
use serde_json::{json, Map, Value};

use crate::blank::BlankLabels;
use crate::error::FormatError;
use crate::format::RdfFormat;

pub(crate) fn write(graph: &Graph) -> Result<String, FormatError> {
    let prefixes = context_prefixes(graph);
    let labels = BlankLabels::new(graph, |id| !id.is_empty() && !id.contains(char::is_whitespace));
    let writer = NodeWriter {
        prefixes: &prefixes,
        labels: &labels,
    };

    let mut nodes = Vec::new();
    for (subject, triples) in &graph.iter().chunk_by(|t| &t.subject) {
        let mut node = Map::new();
        node.insert("@id".to_string(), Value::String(writer.subject(subject)));

        for (predicate, triples) in &triples.chunk_by(|t| &t.predicate) {
            let objects: Vec<&Term> = triples.map(|t| &t.object).collect();
            if predicate.as_str() == rdf::TYPE && objects.iter().all(|o| !matches!(o, Term::Literal(_))) {
                let types = objects.iter().map(|o| Value::String(writer.reference(o))).collect();
                node.insert("@type".to_string(), Value::Array(types));
                continue;
            }
            let values = objects.iter().map(|o| writer.object(o)).collect();
            node.insert(writer.iri(predicate), Value::Array(values));
        }
        nodes.push(Value::Object(node));
    }

    let context: Map<String, Value> = prefixes
        .iter()
        .map(|(prefix, namespace)| (prefix.to_string(), Value::String(namespace.to_string())))
        .collect();
    let document = json!({
        "@context": context,
        "@graph": nodes,
    });

    serde_json::to_string_pretty(&document)
        .map(|mut text| {
            text.push('\n');
            text
        })
        .map_err(|e| FormatError::serialize(RdfFormat::JsonLd.name(), e.to_string()))
}

/// Graph prefixes usable as JSON-LD terms, plus well-known ones in use
fn context_prefixes(graph: &Graph) -> PrefixMap {
    let mut prefixes = PrefixMap::new();
    for (prefix, namespace) in graph.prefixes().iter() {
        if is_term_name(prefix) {
            prefixes.bind(prefix, namespace);
        }
    }
    for (prefix, namespace) in WELL_KNOWN_PREFIXES {
        if prefixes.get(prefix).is_some() || prefixes.contains_namespace(namespace) {
            continue;
        }
        let used = graph.iter().any(|t| {
            t.predicate.as_str().starts_with(namespace)
                || t.object.as_iri().is_some_and(|iri| iri.as_str().starts_with(namespace))
                || t.object
                    .as_literal()
                    .and_then(Literal::datatype)
                    .is_some_and(|dt| dt.as_str().starts_with(namespace))
        });
        if used {
            prefixes.bind(*prefix, *namespace);
        }
    }
    prefixes
}

fn is_term_name(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix != "_"
        && !prefix.starts_with('@')
        && !prefix.contains(|c: char| c == ':' || c.is_whitespace())
}

struct NodeWriter<'a> {
    prefixes: &'a PrefixMap,
    labels: &'a BlankLabels<'a>,
}

impl NodeWriter<'_> {
    fn iri(&self, iri: &Iri) -> String {
        match self.prefixes.shrink(iri.as_str()) {
            Some((prefix, local)) if !local.is_empty() && !local.starts_with("//") => {
                format!("{}:{}", prefix, local)
            }
            _ => iri.as_str().to_string(),
        }
    }

    fn subject(&self, subject: &Subject) -> String {
        match subject {
            Subject::Iri(iri) => self.iri(iri),
            Subject::BlankNode(node) => format!("_:{}", self.labels.label(node)),
        }
    }

    fn reference(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.iri(iri),
            Term::BlankNode(node) => format!("_:{}", self.labels.label(node)),
            Term::Literal(literal) => literal.lexical_form().to_string(),
        }
    }

    fn object(&self, term: &Term) -> Value {
        match term {
            Term::Literal(literal) => match (literal.language(), literal.datatype()) {
                (Some(language), _) => json!({"@value": literal.lexical_form(), "@language": language}),
                (None, Some(datatype)) => {
                    json!({"@value": literal.lexical_form(), "@type": self.iri(datatype)})
                }
                (None, None) => Value::String(literal.lexical_form().to_string()),
            },
            other => json!({"@id": self.reference(other)}),
        }
    }
}

#[cfg(test)]
mod writer_tests {
    use super::*;
    use mimizuku_core::vocab::{prov, xsd};
    use mimizuku_core::{BlankNode, Triple};

    #[test]
    fn test_writes_context_and_graph() {
        let mut graph = Graph::new();
        graph.bind_prefix("ex", "http://example.org/");
        graph.bind_prefix("", "http://example.org/default/");
        graph.insert(Triple::new(
            Iri::new("http://example.org/doc1"),
            Iri::new(rdf::TYPE),
            Iri::new(prov::ENTITY),
        ));
        graph.insert(Triple::new(
            Iri::new("http://example.org/doc1"),
            Iri::new("http://example.org/size"),
            Literal::typed("7", xsd::INTEGER),
        ));
        graph.insert(Triple::new(
            BlankNode::new("a"),
            Iri::new("http://example.org/ref"),
            Iri::new("http://example.org/doc1"),
        ));

        let text = write(&graph).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["@context"]["ex"], "http://example.org/");
        assert_eq!(value["@context"]["prov"], "http://www.w3.org/ns/prov#");
        assert!(value["@context"].get("").is_none());

        let nodes = value["@graph"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        let doc = nodes.iter().find(|n| n["@id"] == "ex:doc1").unwrap();
        assert_eq!(doc["@type"], json!(["prov:Entity"]));
        assert_eq!(doc["ex:size"], json!([{"@value": "7", "@type": "xsd:integer"}]));
        let blank = nodes.iter().find(|n| n["@id"] == "_:a").unwrap();
        assert_eq!(blank["ex:ref"], json!([{"@id": "ex:doc1"}]));
    }
}
