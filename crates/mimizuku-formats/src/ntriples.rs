//! N-Triples: one absolute triple per line, no abbreviations

use crate::blank::BlankLabels;
use crate::codec::FormatCodec;
use crate::error::{FormatError, SyntaxError};
use crate::format::RdfFormat;
use crate::iri;
use crate::turtle::{self, Dialect};
use mimizuku_core::{Graph, Iri, Subject, Term};

#[derive(Debug, Default, Clone, Copy)]
pub struct NTriplesCodec;

impl FormatCodec for NTriplesCodec {
    fn name(&self) -> &str {
        RdfFormat::NTriples.name()
    }

    fn aliases(&self) -> &[&str] {
        RdfFormat::NTriples.aliases()
    }

    fn media_type(&self) -> &str {
        RdfFormat::NTriples.media_type()
    }

    fn parse(&self, input: &str) -> Result<Graph, SyntaxError> {
        self.parse_with_base(input, None)
    }

    fn parse_with_base(&self, input: &str, base: Option<&str>) -> Result<Graph, SyntaxError> {
        turtle::parse(input, base, Dialect::NTriples)
    }

    fn serialize(&self, graph: &Graph) -> Result<String, FormatError> {
        write(graph)
    }
}

/// Write every triple on its own line, in the graph's iteration order.
///
/// Relative IRIs have no N-Triples form and are refused.
pub fn write(graph: &Graph) -> Result<String, FormatError> {
    let labels = BlankLabels::new(graph, turtle::is_blank_label);
    let mut out = String::new();
    for triple in graph {
        let subject = match &triple.subject {
            Subject::Iri(iri) => absolute(iri)?.to_string(),
            Subject::BlankNode(node) => format!("_:{}", labels.label(node)),
        };
        let object = match &triple.object {
            Term::BlankNode(node) => format!("_:{}", labels.label(node)),
            Term::Iri(iri) => absolute(iri)?.to_string(),
            Term::Literal(literal) => {
                if let Some(datatype) = literal.datatype() {
                    absolute(datatype)?;
                }
                literal.to_string()
            }
        };
        out.push_str(&format!(
            "{} {} {} .\n",
            subject,
            absolute(&triple.predicate)?,
            object
        ));
    }
    Ok(out)
}

fn absolute(iri: &Iri) -> Result<&Iri, FormatError> {
    if iri::has_scheme(iri.as_str()) {
        Ok(iri)
    } else {
        Err(FormatError::serialize(
            RdfFormat::NTriples.name(),
            format!("relative IRI <{}> has no N-Triples form", iri.as_str()),
        ))
    }
}
