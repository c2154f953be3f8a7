//! JSON-LD codec
//!
//! Only inline contexts are processed; a remote context reference is a
//! parse error. Named graphs are merged into the default graph.

mod context;
mod parser;
mod writer;

use crate::codec::FormatCodec;
use crate::error::{FormatError, SyntaxError};
use crate::format::RdfFormat;
use mimizuku_core::Graph;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLdCodec;

impl FormatCodec for JsonLdCodec {
    fn name(&self) -> &str {
        RdfFormat::JsonLd.name()
    }

    fn aliases(&self) -> &[&str] {
        RdfFormat::JsonLd.aliases()
    }

    fn media_type(&self) -> &str {
        RdfFormat::JsonLd.media_type()
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
