//! Built-in serialization formats

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The six serialization formats shipped with the codec layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RdfFormat {
    #[serde(rename = "turtle")]
    Turtle,
    #[serde(rename = "ntriples")]
    NTriples,
    #[serde(rename = "n3")]
    N3,
    #[serde(rename = "json-ld")]
    JsonLd,
    #[serde(rename = "rdfxml")]
    RdfXml,
    #[serde(rename = "trig")]
    TriG,
}

impl RdfFormat {
    pub const ALL: [RdfFormat; 6] = [
        RdfFormat::Turtle,
        RdfFormat::NTriples,
        RdfFormat::N3,
        RdfFormat::JsonLd,
        RdfFormat::RdfXml,
        RdfFormat::TriG,
    ];

    /// Canonical format tag
    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "ntriples",
            RdfFormat::N3 => "n3",
            RdfFormat::JsonLd => "json-ld",
            RdfFormat::RdfXml => "rdfxml",
            RdfFormat::TriG => "trig",
        }
    }

    /// Alternative tags accepted on input
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            RdfFormat::Turtle => &["ttl"],
            RdfFormat::NTriples => &["nt", "n-triples"],
            RdfFormat::N3 => &["notation3"],
            RdfFormat::JsonLd => &["jsonld"],
            RdfFormat::RdfXml => &["rdf/xml", "xml"],
            RdfFormat::TriG => &[],
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::N3 => "text/n3",
            RdfFormat::JsonLd => "application/ld+json",
            RdfFormat::RdfXml => "application/rdf+xml",
            RdfFormat::TriG => "application/trig",
        }
    }

    /// Preferred file extension (without the dot)
    pub fn extension(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "ttl",
            RdfFormat::NTriples => "nt",
            RdfFormat::N3 => "n3",
            RdfFormat::JsonLd => "jsonld",
            RdfFormat::RdfXml => "rdf",
            RdfFormat::TriG => "trig",
        }
    }

    /// Case-insensitive lookup by canonical name or alias
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name || f.aliases().contains(&name.as_str()))
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            "n3" => Some(RdfFormat::N3),
            "jsonld" | "json" => Some(RdfFormat::JsonLd),
            "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
            "trig" => Some(RdfFormat::TriG),
            _ => None,
        }
    }

    /// Guess the format of a file from its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.name().to_string()).collect()
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RdfFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FormatError::UnsupportedFormat {
            requested: s.to_string(),
            supported: Self::names(),
        })
    }
}
