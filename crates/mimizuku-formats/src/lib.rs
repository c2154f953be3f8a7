//! # Mimizuku Formats
//!
//! RDF シリアライゼーション形式のパーサ / シリアライザ
//! - Turtle / N-Triples / N3 / TriG (共通の字句解析器と構文解析器)
//! - RDF/XML (quick-xml)
//! - JSON-LD (インラインコンテキストのみ)
//! - 形式名 → コーデックのレジストリとファイル読み込み

pub mod codec;
pub mod error;
pub mod format;
pub mod registry;

pub mod jsonld;
pub mod n3;
pub mod ntriples;
pub mod rdfxml;
pub mod trig;
pub mod turtle;

mod blank;
mod iri;

pub use blank::BlankNodeScope;
pub use codec::FormatCodec;
pub use error::{FormatError, ParseError, Position, Result, SyntaxError};
pub use format::RdfFormat;
pub use jsonld::JsonLdCodec;
pub use n3::N3Codec;
pub use ntriples::NTriplesCodec;
pub use rdfxml::RdfXmlCodec;
pub use registry::{builtin_registry, FormatRegistry, DEFAULT_SOURCE_ID};
pub use trig::TriGCodec;
pub use turtle::TurtleCodec;

use mimizuku_core::Graph;
use std::path::Path;

/// Parse `input` in `format` with the built-in codecs
pub fn parse(input: &str, format: &str) -> Result<Graph> {
    builtin_registry().parse(input, format)
}

pub fn parse_with_source(input: &str, format: &str, source_id: &str) -> Result<Graph> {
    builtin_registry().parse_with_source(input, format, source_id)
}

/// Parse `input` in `format`, resolving relative IRIs against `base`
pub fn parse_with_base(input: &str, format: &str, base: &str) -> Result<Graph> {
    builtin_registry().parse_with_base(input, format, base)
}

pub fn parse_bytes(bytes: &[u8], format: &str) -> Result<Graph> {
    builtin_registry().parse_bytes(bytes, format)
}

pub fn serialize(graph: &Graph, format: &str) -> Result<String> {
    builtin_registry().serialize(graph, format)
}

/// Read a file and parse it in `format`
pub fn load_graph<P: AsRef<Path>>(path: P, format: &str) -> Result<Graph> {
    builtin_registry().load_graph(path, format)
}
