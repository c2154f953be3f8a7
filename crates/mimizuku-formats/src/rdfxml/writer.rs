//! RDF/XML serializer: one `rdf:Description` per subject

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write};

use itertools::Itertools;
use mimizuku_core::vocab::rdf;
use mimizuku_core::{Graph, Iri, Subject, Term};
use quick_xml::escape::escape;

use crate::blank::BlankLabels;
use crate::error::FormatError;
use crate::format::RdfFormat;

pub(crate) fn write(graph: &Graph) -> Result<String, FormatError> {
    let labels = BlankLabels::new(graph, is_ncname);
    let namespaces = element_namespaces(graph)?;
    let elements = graph
        .iter()
        .map(|t| qualified_name(&t.predicate, &namespaces).map(|name| (&t.predicate, name)))
        .collect::<Result<HashMap<&Iri, String>, FormatError>>()?;

    let mut out = String::new();
    write_document(&mut out, graph, &labels, &namespaces, &elements)
        .map_err(|e| FormatError::serialize(RdfFormat::RdfXml.name(), e.to_string()))?;
    Ok(out)
}

fn write_document(
    out: &mut String,
    graph: &Graph,
    labels: &BlankLabels<'_>,
    namespaces: &BTreeMap<String, String>,
    elements: &HashMap<&Iri, String>,
) -> fmt::Result {
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rdf:RDF");
    for (namespace, prefix) in namespaces {
        write!(out, "\n   xmlns:{}=\"{}\"", prefix, escape(namespace.as_str()))?;
    }
    out.push_str(">\n");

    for (subject, triples) in &graph.iter().chunk_by(|t| &t.subject) {
        match subject {
            Subject::Iri(iri) => {
                writeln!(out, "  <rdf:Description rdf:about=\"{}\">", escape(iri.as_str()))?
            }
            Subject::BlankNode(node) => {
                writeln!(out, "  <rdf:Description rdf:nodeID=\"{}\">", labels.label(node))?
            }
        }

        for triple in triples {
            let element = elements.get(&triple.predicate).ok_or(fmt::Error)?;
            match &triple.object {
                Term::Iri(iri) => writeln!(
                    out,
                    "    <{} rdf:resource=\"{}\"/>",
                    element,
                    escape(iri.as_str())
                )?,
                Term::BlankNode(node) => {
                    writeln!(out, "    <{} rdf:nodeID=\"{}\"/>", element, labels.label(node))?
                }
                Term::Literal(literal) => {
                    write!(out, "    <{}", element)?;
                    if let Some(lang) = literal.language() {
                        write!(out, " xml:lang=\"{}\"", escape(lang))?;
                    } else if let Some(datatype) = literal.datatype() {
                        write!(out, " rdf:datatype=\"{}\"", escape(datatype.as_str()))?;
                    }
                    writeln!(out, ">{}</{}>", escape(literal.lexical_form()), element)?;
                }
            }
        }
        out.push_str("  </rdf:Description>\n");
    }

    out.push_str("</rdf:RDF>\n");
    Ok(())
}

/// Namespace -> prefix for every predicate, `rdf` always included.
///
/// Prefixes bound on the graph are reused; other namespaces get `ns{n}`.
fn element_namespaces(graph: &Graph) -> Result<BTreeMap<String, String>, FormatError> {
    let mut namespaces = BTreeMap::new();
    namespaces.insert(rdf::NAMESPACE.to_string(), "rdf".to_string());

    let mut counter = 0;
    for triple in graph.iter() {
        let (namespace, _) = split_predicate(&triple.predicate)?;
        if namespaces.contains_key(namespace) {
            continue;
        }
        let bound = graph
            .prefixes()
            .iter()
            .find(|(prefix, ns)| *ns == namespace && is_ncname(prefix) && *prefix != "rdf")
            .map(|(prefix, _)| prefix.to_string());
        let prefix = match bound {
            Some(prefix) if !namespaces.values().any(|p| *p == prefix) => prefix,
            _ => loop {
                let candidate = format!("ns{}", counter);
                counter += 1;
                if !namespaces.values().any(|p| *p == candidate) {
                    break candidate;
                }
            },
        };
        namespaces.insert(namespace.to_string(), prefix);
    }
    Ok(namespaces)
}

fn qualified_name(predicate: &Iri, namespaces: &BTreeMap<String, String>) -> Result<String, FormatError> {
    let (namespace, local) = split_predicate(predicate)?;
    let prefix = namespaces
        .get(namespace)
        .ok_or_else(|| FormatError::serialize(RdfFormat::RdfXml.name(), "namespace table out of sync"))?;
    Ok(format!("{}:{}", prefix, local))
}

/// Split a predicate IRI so the local part is the longest trailing NCName
fn split_predicate(predicate: &Iri) -> Result<(&str, &str), FormatError> {
    let iri = predicate.as_str();
    let mut split = iri.len();
    for (i, c) in iri.char_indices().rev() {
        if is_name_char(c) {
            split = i;
        } else {
            break;
        }
    }
    let local = &iri[split..];
    let start = local
        .char_indices()
        .find(|(_, c)| is_name_start_char(*c))
        .map(|(i, _)| split + i);

    match start {
        Some(start) if start > 0 => Ok((&iri[..start], &iri[start..])),
        _ => Err(FormatError::serialize(
            RdfFormat::RdfXml.name(),
            format!("predicate {} cannot be written as an XML element name", predicate),
        )),
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || c.is_ascii_digit() || matches!(c, '-' | '.') || c.is_alphanumeric()
}

fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if is_name_start_char(first)) && chars.all(is_name_char)
}
