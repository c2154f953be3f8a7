//! Format registry: name -> codec dispatch, plus file loading

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use mimizuku_core::Graph;
use tracing::{debug, info, warn};

use crate::codec::FormatCodec;
use crate::error::{FormatError, ParseError, Position, Result, SyntaxError};
use crate::iri;
use crate::jsonld::JsonLdCodec;
use crate::n3::N3Codec;
use crate::ntriples::NTriplesCodec;
use crate::rdfxml::RdfXmlCodec;
use crate::trig::TriGCodec;
use crate::turtle::TurtleCodec;

/// Source identifier used when the caller gives none
pub const DEFAULT_SOURCE_ID: &str = "<data>";

lazy_static! {
    static ref BUILTIN: FormatRegistry = FormatRegistry::builtin();
}

/// Shared registry holding the six built-in codecs
pub fn builtin_registry() -> &'static FormatRegistry {
    &BUILTIN
}

/// Maps lower-case format tags to codecs
pub struct FormatRegistry {
    codecs: Vec<Box<dyn FormatCodec>>,
    index: HashMap<String, usize>,
}

impl FormatRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            codecs: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Registry with Turtle, N-Triples, N3, JSON-LD, RDF/XML and TriG
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TurtleCodec));
        registry.register(Box::new(NTriplesCodec));
        registry.register(Box::new(N3Codec));
        registry.register(Box::new(JsonLdCodec));
        registry.register(Box::new(RdfXmlCodec));
        registry.register(Box::new(TriGCodec));
        registry
    }

    /// Add a codec under its name and aliases.
    ///
    /// A codec registered under an existing name replaces the previous one.
    pub fn register(&mut self, codec: Box<dyn FormatCodec>) {
        let name = codec.name().to_ascii_lowercase();
        let slot = match self.index.get(&name) {
            Some(&slot) => {
                debug!("Replacing codec for format {}", name);
                self.codecs[slot] = codec;
                slot
            }
            None => {
                self.codecs.push(codec);
                self.codecs.len() - 1
            }
        };

        let aliases: Vec<String> = self.codecs[slot]
            .aliases()
            .iter()
            .map(|alias| alias.to_ascii_lowercase())
            .collect();
        self.index.insert(name, slot);
        for alias in aliases {
            self.index.insert(alias, slot);
        }
    }

    /// Canonical names, in registration order
    pub fn supported_formats(&self) -> Vec<String> {
        self.codecs.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn is_supported(&self, format: &str) -> bool {
        self.index.contains_key(&format.trim().to_ascii_lowercase())
    }

    /// Codec for a format tag, case-insensitive
    pub fn resolve(&self, format: &str) -> Result<&dyn FormatCodec> {
        self.index
            .get(&format.trim().to_ascii_lowercase())
            .map(|&slot| self.codecs[slot].as_ref())
            .ok_or_else(|| FormatError::UnsupportedFormat {
                requested: format.to_string(),
                supported: self.supported_formats(),
            })
    }

    pub fn parse(&self, input: &str, format: &str) -> Result<Graph> {
        self.parse_with_source(input, format, DEFAULT_SOURCE_ID)
    }

    /// Parse, naming the payload `source_id` in errors
    pub fn parse_with_source(&self, input: &str, format: &str, source_id: &str) -> Result<Graph> {
        self.parse_document(input, format, source_id, None)
    }

    /// Parse, resolving relative IRIs against `base`
    pub fn parse_with_base(&self, input: &str, format: &str, base: &str) -> Result<Graph> {
        self.parse_document(input, format, DEFAULT_SOURCE_ID, Some(base))
    }

    fn parse_document(
        &self,
        input: &str,
        format: &str,
        source_id: &str,
        base: Option<&str>,
    ) -> Result<Graph> {
        let codec = self.resolve(format)?;
        match codec.parse_with_base(input, base) {
            Ok(graph) => {
                debug!(
                    "Parsed {} triples from {} as {}",
                    graph.len(),
                    source_id,
                    codec.name()
                );
                Ok(graph)
            }
            Err(err) => {
                let err = ParseError::from_syntax(codec.name(), source_id, err);
                warn!("{}", err);
                Err(err.into())
            }
        }
    }

    /// Parse raw bytes; invalid UTF-8 is a parse error at the first bad byte
    pub fn parse_bytes(&self, bytes: &[u8], format: &str) -> Result<Graph> {
        self.parse_bytes_with_source(bytes, format, DEFAULT_SOURCE_ID)
    }

    pub fn parse_bytes_with_source(
        &self,
        bytes: &[u8],
        format: &str,
        source_id: &str,
    ) -> Result<Graph> {
        let input = self.decode(bytes, format, source_id)?;
        self.parse_document(input, format, source_id, None)
    }

    fn decode<'b>(&self, bytes: &'b [u8], format: &str, source_id: &str) -> Result<&'b str> {
        let codec = self.resolve(format)?;
        std::str::from_utf8(bytes).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            let prefix = std::str::from_utf8(valid).unwrap_or_default();
            let err = SyntaxError::new(format!("invalid UTF-8: {}", e))
                .with_position(Position::from_offset(prefix, e.valid_up_to()));
            FormatError::from(ParseError::from_syntax(codec.name(), source_id, err))
        })
    }

    pub fn serialize(&self, graph: &Graph, format: &str) -> Result<String> {
        let codec = self.resolve(format)?;
        let text = codec.serialize(graph)?;
        debug!("Serialized {} triples as {}", graph.len(), codec.name());
        Ok(text)
    }

    /// Read and parse a file.
    ///
    /// The format is checked before the file is opened; read failures are
    /// [`FormatError::Io`], grammar failures [`FormatError::Parse`].
    /// Relative IRIs resolve against the file's `file://` IRI.
    pub fn load_graph<P: AsRef<Path>>(&self, path: P, format: &str) -> Result<Graph> {
        let path = path.as_ref();
        self.resolve(format)?;
        let source_id = path.display().to_string();

        info!("Loading graph from {} as {}", source_id, format);
        let bytes = fs::read(path).map_err(|source| {
            warn!("Cannot read {}: {}", source_id, source);
            FormatError::Io {
                source_id: source_id.clone(),
                source,
            }
        })?;
        let base = iri::file_iri(path);
        let input = self.decode(&bytes, format, &source_id)?;
        let graph = self.parse_document(input, format, &source_id, Some(&base))?;
        info!("Loaded {} triples from {}", graph.len(), source_id);
        Ok(graph)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.supported_formats())
            .finish()
    }
}
