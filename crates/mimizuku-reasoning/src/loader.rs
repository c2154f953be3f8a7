use std::path::Path;

use mimizuku_formats::{builtin_registry, RdfFormat};
use tracing::info;

use crate::error::OntologyError;
use crate::ontology::Ontology;

pub trait OntologyLoader {
    fn load(&self, path: &Path) -> Result<Ontology, OntologyError>;
}

/// Loads ontology files, by default guessing the format from the extension
/// (`.owl` and `.rdf` are RDF/XML)
#[derive(Debug, Clone, Default)]
pub struct FileOntologyLoader {
    format: Option<String>,
}

impl FileOntologyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that ignores file extensions
    pub fn with_format<S: Into<String>>(format: S) -> Self {
        Self {
            format: Some(format.into()),
        }
    }
}

impl OntologyLoader for FileOntologyLoader {
    fn load(&self, path: &Path) -> Result<Ontology, OntologyError> {
        let format = match &self.format {
            Some(format) => format.clone(),
            None => RdfFormat::from_path(path)
                .map(|format| format.name().to_string())
                .ok_or_else(|| OntologyError::UnknownFormat {
                    path: path.to_path_buf(),
                })?,
        };

        let graph = builtin_registry().load_graph(path, &format)?;
        let ontology = Ontology::with_source(graph, path.display().to_string());
        info!("Loaded ontology {} from {}", ontology.id(), path.display());
        Ok(ontology)
    }
}
