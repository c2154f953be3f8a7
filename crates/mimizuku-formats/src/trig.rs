//! TriG. Named and default graph blocks are merged into one graph; output
//! wraps everything in a single default graph block.

use crate::codec::FormatCodec;
use crate::error::{FormatError, SyntaxError};
use crate::format::RdfFormat;
use crate::turtle::{self, Dialect};
use mimizuku_core::Graph;

#[derive(Debug, Default, Clone, Copy)]
pub struct TriGCodec;

impl FormatCodec for TriGCodec {
    fn name(&self) -> &str {
        RdfFormat::TriG.name()
    }

    fn aliases(&self) -> &[&str] {
        RdfFormat::TriG.aliases()
    }

    fn media_type(&self) -> &str {
        RdfFormat::TriG.media_type()
    }

    fn parse(&self, input: &str) -> Result<Graph, SyntaxError> {
        self.parse_with_base(input, None)
    }

    fn parse_with_base(&self, input: &str, base: Option<&str>) -> Result<Graph, SyntaxError> {
        turtle::parse(input, base, Dialect::TriG)
    }

    fn serialize(&self, graph: &Graph) -> Result<String, FormatError> {
        turtle::write(graph, Dialect::TriG)
    }
}
