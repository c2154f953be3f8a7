//! Turtle family grammars: N-Triples, Turtle, TriG and N3 share one lexer,
//! one parser and one writer, parameterized by [`Dialect`].

mod lexer;
mod parser;
mod token;
mod writer;

use crate::codec::FormatCodec;
use crate::error::{FormatError, SyntaxError};
use crate::format::RdfFormat;
use mimizuku_core::Graph;

pub(crate) use writer::is_blank_label;

/// Grammar variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    NTriples,
    Turtle,
    TriG,
    N3,
}

impl Dialect {
    pub(crate) fn format(self) -> RdfFormat {
        match self {
            Dialect::NTriples => RdfFormat::NTriples,
            Dialect::Turtle => RdfFormat::Turtle,
            Dialect::TriG => RdfFormat::TriG,
            Dialect::N3 => RdfFormat::N3,
        }
    }
}

pub(crate) fn parse(input: &str, base: Option<&str>, dialect: Dialect) -> Result<Graph, SyntaxError> {
    parser::parse(input, base, dialect)
}

pub(crate) fn write(graph: &Graph, dialect: Dialect) -> Result<String, FormatError> {
    writer::write(graph, dialect)
}

/// Terse RDF Triple Language
#[derive(Debug, Default, Clone, Copy)]
pub struct TurtleCodec;

impl FormatCodec for TurtleCodec {
    fn name(&self) -> &str {
        RdfFormat::Turtle.name()
    }

    fn aliases(&self) -> &[&str] {
        RdfFormat::Turtle.aliases()
    }

    fn media_type(&self) -> &str {
        RdfFormat::Turtle.media_type()
    }

    fn parse(&self, input: &str) -> Result<Graph, SyntaxError> {
        self.parse_with_base(input, None)
    }

    fn parse_with_base(&self, input: &str, base: Option<&str>) -> Result<Graph, SyntaxError> {
        parse(input, base, Dialect::Turtle)
    }

    fn serialize(&self, graph: &Graph) -> Result<String, FormatError> {
        write(graph, Dialect::Turtle)
    }
}
