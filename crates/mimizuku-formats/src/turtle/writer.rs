//! Turtle / TriG / N3 serializer

use itertools::Itertools;
use mimizuku_core::vocab::{rdf, xsd, WELL_KNOWN_PREFIXES};
use mimizuku_core::{Graph, Iri, Literal, PrefixMap, Subject, Term};
use std::fmt::{self, Write};

use super::lexer::{is_pn_chars, is_pn_chars_base, is_pn_chars_u};
use super::Dialect;
use crate::blank::BlankLabels;
use crate::error::FormatError;

/// Serialize a graph, grouping triples by subject and predicate
pub(crate) fn write(graph: &Graph, dialect: Dialect) -> Result<String, FormatError> {
    let mut out = String::new();
    write_document(&mut out, graph, dialect)
        .map_err(|e| FormatError::serialize(dialect.format().name(), e.to_string()))?;
    Ok(out)
}

fn write_document(out: &mut String, graph: &Graph, dialect: Dialect) -> fmt::Result {
    let prefixes = output_prefixes(graph);
    let labels = BlankLabels::new(graph, is_blank_label);
    let writer = TermWriter {
        prefixes: &prefixes,
        labels: &labels,
    };

    for (prefix, namespace) in prefixes.iter() {
        writeln!(out, "@prefix {}: <{}> .", prefix, namespace)?;
    }
    if !prefixes.is_empty() && !graph.is_empty() {
        out.push('\n');
    }

    let indent = if dialect == Dialect::TriG { "    " } else { "" };
    if dialect == Dialect::TriG && !graph.is_empty() {
        out.push_str("{\n");
    }

    let by_subject = graph.iter().chunk_by(|t| &t.subject);
    for (subject, triples) in &by_subject {
        write!(out, "{}{}", indent, writer.subject(subject))?;

        let by_predicate = triples.chunk_by(|t| &t.predicate);
        let mut first_predicate = true;
        for (predicate, triples) in &by_predicate {
            if first_predicate {
                out.push(' ');
                first_predicate = false;
            } else {
                write!(out, " ;\n{}    ", indent)?;
            }
            let objects = triples.map(|t| writer.object(&t.object)).join(", ");
            write!(out, "{} {}", writer.predicate(predicate), objects)?;
        }
        out.push_str(" .\n");
    }

    if dialect == Dialect::TriG && !graph.is_empty() {
        out.push_str("}\n");
    }
    Ok(())
}

/// The graph's own prefixes plus the well-known ones its IRIs use
fn output_prefixes(graph: &Graph) -> PrefixMap {
    let mut prefixes: PrefixMap = PrefixMap::new();
    for (prefix, namespace) in graph.prefixes().iter() {
        if is_prefix_name(prefix) {
            prefixes.bind(prefix, namespace);
        }
    }

    for (prefix, namespace) in WELL_KNOWN_PREFIXES {
        if prefixes.get(prefix).is_some() || prefixes.contains_namespace(namespace) {
            continue;
        }
        if graph.iter().any(|t| uses_namespace(t, namespace)) {
            prefixes.bind(*prefix, *namespace);
        }
    }
    prefixes
}

fn uses_namespace(triple: &mimizuku_core::Triple, namespace: &str) -> bool {
    let in_subject = triple
        .subject
        .as_iri()
        .is_some_and(|iri| iri.as_str().starts_with(namespace));
    let in_object = match &triple.object {
        Term::Iri(iri) => iri.as_str().starts_with(namespace),
        Term::Literal(lit) => lit
            .datatype()
            .is_some_and(|dt| dt.as_str().starts_with(namespace)),
        Term::BlankNode(_) => false,
    };
    in_subject || triple.predicate.as_str().starts_with(namespace) || in_object
}

struct TermWriter<'a> {
    prefixes: &'a PrefixMap,
    labels: &'a BlankLabels<'a>,
}

impl TermWriter<'_> {
    fn subject(&self, subject: &Subject) -> String {
        match subject {
            Subject::Iri(iri) => self.iri(iri),
            Subject::BlankNode(node) => format!("_:{}", self.labels.label(node)),
        }
    }

    fn predicate(&self, predicate: &Iri) -> String {
        if predicate.as_str() == rdf::TYPE {
            "a".to_string()
        } else {
            self.iri(predicate)
        }
    }

    fn object(&self, object: &Term) -> String {
        match object {
            Term::Iri(iri) => self.iri(iri),
            Term::BlankNode(node) => format!("_:{}", self.labels.label(node)),
            Term::Literal(literal) => self.literal(literal),
        }
    }

    fn iri(&self, iri: &Iri) -> String {
        match self.prefixes.shrink(iri.as_str()) {
            Some((prefix, local)) if is_local_name(local) => format!("{}:{}", prefix, local),
            _ => iri.to_string(),
        }
    }

    fn literal(&self, literal: &Literal) -> String {
        let lexical = literal.lexical_form();
        if let Some(datatype) = literal.datatype() {
            let bare = match datatype.as_str() {
                xsd::INTEGER => is_integer(lexical),
                xsd::DECIMAL => is_decimal(lexical),
                xsd::DOUBLE => is_double(lexical),
                xsd::BOOLEAN => lexical == "true" || lexical == "false",
                _ => false,
            };
            if bare {
                return lexical.to_string();
            }
            return format!(
                "\"{}\"^^{}",
                mimizuku_core::escape_literal(lexical),
                self.iri(datatype)
            );
        }
        literal.to_string()
    }
}

fn is_prefix_name(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        None => true,
        Some(first) => {
            is_pn_chars_base(first)
                && chars.all(|c| is_pn_chars(c) || c == '.')
                && !prefix.ends_with('.')
        }
    }
}

/// Local names the lexer reads back without escapes
fn is_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        None => true,
        Some(first) => {
            (is_pn_chars_u(first) || first.is_ascii_digit() || first == ':')
                && chars.all(|c| is_pn_chars(c) || c == ':' || c == '.')
                && !local.ends_with('.')
        }
    }
}

pub(crate) fn is_blank_label(label: &str) -> bool {
    let mut chars = label.chars();
    match chars.next() {
        None => false,
        Some(first) => {
            (is_pn_chars_u(first) || first.is_ascii_digit())
                && chars.all(|c| is_pn_chars(c) || c == '.')
                && !label.ends_with('.')
        }
    }
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    let body = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    match body.split_once('.') {
        Some((whole, frac)) => {
            whole.chars().all(|c| c.is_ascii_digit())
                && !frac.is_empty()
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn is_double(s: &str) -> bool {
    let Some((mantissa, exponent)) = s.split_once(&['e', 'E'][..]) else {
        return false;
    };
    let mantissa = mantissa.strip_prefix(&['+', '-'][..]).unwrap_or(mantissa);
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, frac)) => {
            (!whole.is_empty() || !frac.is_empty())
                && whole.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => !mantissa.is_empty() && mantissa.chars().all(|c| c.is_ascii_digit()),
    };
    mantissa_ok && is_integer(exponent)
}
