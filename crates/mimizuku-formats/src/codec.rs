//! Codec capability implemented by every serialization format

use crate::error::{FormatError, SyntaxError};
use mimizuku_core::Graph;

/// Parser + serializer for one serialization format.
///
/// Codecs are stateless; one instance may serve any number of documents.
/// The registry attaches the format name and source identifier to the
/// [`SyntaxError`] returned by [`FormatCodec::parse`].
pub trait FormatCodec: Send + Sync {
    /// Canonical lower-case format tag
    fn name(&self) -> &str;

    /// Additional tags resolved to this codec
    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn media_type(&self) -> &str;

    fn parse(&self, input: &str) -> Result<Graph, SyntaxError>;

    /// Parse with `base` as the document base IRI.
    ///
    /// Codecs without relative references may ignore the base.
    fn parse_with_base(&self, input: &str, base: Option<&str>) -> Result<Graph, SyntaxError> {
        let _ = base;
        self.parse(input)
    }

    fn serialize(&self, graph: &Graph) -> Result<String, FormatError>;
}
