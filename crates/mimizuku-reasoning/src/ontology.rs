use std::fmt;
use std::sync::{Mutex, MutexGuard};

use mimizuku_core::{Graph, Triple};
use tracing::debug;
use uuid::Uuid;

use crate::error::OntologyError;

/// Graph handed to a reasoner, with exclusive access through [`Ontology::lock`]
pub struct Ontology {
    id: Uuid,
    source: Option<String>,
    graph: Mutex<Graph>,
}

impl Ontology {
    pub fn new(graph: Graph) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: None,
            graph: Mutex::new(graph),
        }
    }

    /// Ontology remembering where it was loaded from
    pub fn with_source<S: Into<String>>(graph: Graph, source: S) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::new(graph)
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Exclusive access until the returned context is dropped
    pub fn lock(&self) -> Result<OntologyContext<'_>, OntologyError> {
        let guard = self
            .graph
            .lock()
            .map_err(|_| OntologyError::Poisoned { id: self.id })?;
        debug!("Locked ontology {}", self.id);
        Ok(OntologyContext {
            id: self.id,
            graph: guard,
            inferred: 0,
        })
    }

    /// Copy of the current triples
    pub fn snapshot(&self) -> Result<Graph, OntologyError> {
        Ok(self.lock()?.graph().clone())
    }

    pub fn into_graph(self) -> Result<Graph, OntologyError> {
        let id = self.id;
        self.graph
            .into_inner()
            .map_err(|_| OntologyError::Poisoned { id })
    }
}

impl fmt::Debug for Ontology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ontology")
            .field("id", &self.id)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Scoped, exclusive view of an [`Ontology`]
pub struct OntologyContext<'o> {
    id: Uuid,
    graph: MutexGuard<'o, Graph>,
    inferred: usize,
}

impl<'o> OntologyContext<'o> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Add an inferred triple; returns false when it was already present
    pub fn add_inferred(&mut self, triple: Triple) -> bool {
        let added = self.graph.insert(triple);
        if added {
            self.inferred += 1;
        }
        added
    }

    /// Triples added through this context
    pub fn inferred_count(&self) -> usize {
        self.inferred
    }
}

impl Drop for OntologyContext<'_> {
    fn drop(&mut self) {
        debug!("Released ontology {} ({} inferred)", self.id, self.inferred);
    }
}
