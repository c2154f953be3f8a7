//! Notation3, restricted to what a triple graph can hold.
//!
//! Accepts Turtle plus `=`, `=>`, `<=`, `has` and `is ... of`. Quoted
//! formulae are rejected. Output is Turtle, which is valid N3.

use crate::codec::FormatCodec;
use crate::error::{FormatError, SyntaxError};
use crate::format::RdfFormat;
use crate::turtle::{self, Dialect};
use mimizuku_core::Graph;

#[derive(Debug, Default, Clone, Copy)]
pub struct N3Codec;

impl FormatCodec for N3Codec {
    fn name(&self) -> &str {
        RdfFormat::N3.name()
    }

    fn aliases(&self) -> &[&str] {
        RdfFormat::N3.aliases()
    }

    fn media_type(&self) -> &str {
        RdfFormat::N3.media_type()
    }

    fn parse(&self, input: &str) -> Result<Graph, SyntaxError> {
        self.parse_with_base(input, None)
    }

    fn parse_with_base(&self, input: &str, base: Option<&str>) -> Result<Graph, SyntaxError> {
        turtle::parse(input, base, Dialect::N3)
    }

    fn serialize(&self, graph: &Graph) -> Result<String, FormatError> {
        turtle::write(graph, Dialect::N3)
    }
}
