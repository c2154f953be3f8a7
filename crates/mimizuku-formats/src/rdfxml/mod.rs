//! RDF/XML codec
//!
//! Supports node and property elements, `rdf:about` / `rdf:ID` /
//! `rdf:nodeID`, property attributes, `rdf:resource`, `rdf:datatype`,
//! `xml:lang`, `xml:base`, `rdf:li`, reification through `rdf:ID` on a
//! property, and the `Resource`, `Collection` and `Literal` parse types.

mod parser;
mod writer;

use crate::codec::FormatCodec;
use crate::error::{FormatError, SyntaxError};
use crate::format::RdfFormat;
use mimizuku_core::Graph;

#[derive(Debug, Default, Clone, Copy)]
pub struct RdfXmlCodec;

impl FormatCodec for RdfXmlCodec {
    fn name(&self) -> &str {
        RdfFormat::RdfXml.name()
    }

    fn aliases(&self) -> &[&str] {
        RdfFormat::RdfXml.aliases()
    }

    fn media_type(&self) -> &str {
        RdfFormat::RdfXml.media_type()
    }

    fn parse(&self, input: &str) -> Result<Graph, SyntaxError> {
        self.parse_with_base(input, None)
    }

    fn parse_with_base(&self, input: &str, base: Option<&str>) -> Result<Graph, SyntaxError> {
        parser::parse(input, base)
    }

    fn serialize(&self, graph: &Graph) -> Result<String, FormatError> {
        writer::write(graph)
    }
}
