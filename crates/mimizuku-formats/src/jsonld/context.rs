//! Active context: term definitions, `@vocab`, `@base`, `@language`

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::error::SyntaxError;
use crate::iri;

type Result<T> = std::result::Result<T, SyntaxError>;

#[derive(Debug, Clone, Default)]
pub(super) struct Context {
    pub base: Option<String>,
    pub vocab: Option<String>,
    pub language: Option<String>,
    /// `None` marks a term explicitly mapped to `null`
    pub(super) terms: HashMap<String, Option<TermDefinition>>,
}

#[derive(Debug, Clone, Default)]
pub(super) struct TermDefinition {
    pub iri: String,
    pub reverse: bool,
    /// `@id`, `@vocab` or a datatype IRI
    pub type_mapping: Option<String>,
    pub container: Option<String>,
    /// `Some(None)` resets the default language for this term
    pub language: Option<Option<String>>,
}

fn invalid(message: impl Into<String>) -> SyntaxError {
    SyntaxError::new(message)
}

impl Context {
    pub fn term(&self, key: &str) -> Option<&TermDefinition> {
        self.terms.get(key).and_then(Option::as_ref)
    }

    /// Keyword a key stands for, following keyword aliases
    pub fn keyword<'k>(&'k self, key: &'k str) -> Option<&'k str> {
        if key.starts_with('@') {
            return Some(key);
        }
        self.term(key)
            .map(|definition| definition.iri.as_str())
            .filter(|iri| iri.starts_with('@'))
    }

    /// Apply a local `@context` value on top of this context
    pub fn process(&self, local: &Value) -> Result<Context> {
        match local {
            Value::Null => Ok(Context {
                base: self.base.clone(),
                ..Context::default()
            }),
            Value::String(iri) => Err(invalid(format!(
                "remote contexts are not supported: {}",
                iri
            ))),
            Value::Array(items) => {
                let mut context = self.clone();
                for item in items {
                    context = context.process(item)?;
                }
                Ok(context)
            }
            Value::Object(map) => {
                let mut context = self.clone();
                context.apply(map)?;
                Ok(context)
            }
            other => Err(invalid(format!("invalid @context value: {}", other))),
        }
    }

    fn apply(&mut self, local: &Map<String, Value>) -> Result<()> {
        match local.get("@base") {
            None => {}
            Some(Value::Null) => self.base = None,
            Some(Value::String(base)) => {
                self.base = Some(iri::resolve(self.base.as_deref(), base).map_err(invalid)?);
            }
            Some(_) => return Err(invalid("@base must be a string or null")),
        }

        match local.get("@vocab") {
            None => {}
            Some(Value::Null) => self.vocab = None,
            Some(Value::String(vocab)) => {
                let vocab = if vocab.starts_with("_:") || iri::has_scheme(vocab) {
                    vocab.clone()
                } else {
                    iri::resolve(self.base.as_deref(), vocab).map_err(invalid)?
                };
                self.vocab = Some(vocab);
            }
            Some(_) => return Err(invalid("@vocab must be a string or null")),
        }

        match local.get("@language") {
            None => {}
            Some(Value::Null) => self.language = None,
            Some(Value::String(language)) => self.language = Some(language.to_lowercase()),
            Some(_) => return Err(invalid("@language must be a string or null")),
        }

        let mut defined = HashSet::new();
        let mut defining = HashSet::new();
        for term in local.keys() {
            if !term.starts_with('@') {
                self.define(local, term, &mut defined, &mut defining)?;
            }
        }
        Ok(())
    }

    fn define(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        defined: &mut HashSet<String>,
        defining: &mut HashSet<String>,
    ) -> Result<()> {
        if defined.contains(term) {
            return Ok(());
        }
        if !defining.insert(term.to_string()) {
            return Err(invalid(format!("cyclic IRI mapping for term {}", term)));
        }

        let definition = match local.get(term) {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(TermDefinition {
                iri: self.term_iri(local, term, Some(id), defined, defining)?,
                ..TermDefinition::default()
            }),
            Some(Value::Object(spec)) if spec.get("@id") == Some(&Value::Null) => None,
            Some(Value::Object(spec)) => {
                let (id, reverse) = match (spec.get("@reverse"), spec.get("@id")) {
                    (Some(Value::String(id)), _) => (Some(id.as_str()), true),
                    (Some(_), _) => return Err(invalid("@reverse must be a string")),
                    (None, Some(Value::String(id))) => (Some(id.as_str()), false),
                    (None, Some(_)) => return Err(invalid("@id must be a string")),
                    (None, None) => (None, false),
                };
                let iri = self.term_iri(local, term, id, defined, defining)?;

                let type_mapping = match spec.get("@type") {
                    None => None,
                    Some(Value::String(ty)) if ty == "@id" || ty == "@vocab" => Some(ty.clone()),
                    Some(Value::String(ty)) => Some(
                        self.expand(ty, false, true)
                            .ok_or_else(|| invalid(format!("invalid @type mapping for {}", term)))?,
                    ),
                    Some(_) => return Err(invalid(format!("invalid @type mapping for {}", term))),
                };

                let container = match spec.get("@container") {
                    None => None,
                    Some(Value::String(container)) => Some(container.clone()),
                    Some(Value::Array(items)) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .find(|c| *c != "@set")
                        .or(Some("@set"))
                        .map(str::to_string),
                    Some(_) => return Err(invalid(format!("invalid @container for {}", term))),
                };

                let language = match spec.get("@language") {
                    None => None,
                    Some(Value::Null) => Some(None),
                    Some(Value::String(language)) => Some(Some(language.to_lowercase())),
                    Some(_) => return Err(invalid(format!("invalid @language for {}", term))),
                };

                Some(TermDefinition {
                    iri,
                    reverse,
                    type_mapping,
                    container,
                    language,
                })
            }
            Some(other) => {
                return Err(invalid(format!(
                    "invalid term definition for {}: {}",
                    term, other
                )))
            }
        };

        self.terms.insert(term.to_string(), definition);
        defining.remove(term);
        defined.insert(term.to_string());
        Ok(())
    }

    fn term_iri(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        id: Option<&str>,
        defined: &mut HashSet<String>,
        defining: &mut HashSet<String>,
    ) -> Result<String> {
        let source = match id {
            Some(id) if id.starts_with('@') => return Ok(id.to_string()),
            Some(id) => id,
            None => term,
        };

        if let Some((prefix, _)) = source.split_once(':') {
            if prefix != term && local.contains_key(prefix) {
                self.define(local, prefix, defined, defining)?;
            }
        } else if id.is_none() {
            return match &self.vocab {
                Some(vocab) => Ok(format!("{}{}", vocab, term)),
                None => Err(invalid(format!("term {} has no IRI mapping", term))),
            };
        }

        self.expand(source, false, true)
            .ok_or_else(|| invalid(format!("term {} maps to a null IRI", term)))
    }

    /// Expand a term, compact IRI or relative reference.
    ///
    /// `None` means the value is mapped to `null` and must be dropped.
    pub fn expand(&self, value: &str, document_relative: bool, vocab: bool) -> Option<String> {
        if value.starts_with('@') {
            return Some(value.to_string());
        }
        if vocab {
            if let Some(entry) = self.terms.get(value) {
                return entry.as_ref().map(|definition| definition.iri.clone());
            }
        }

        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_string());
            }
            if let Some(Some(definition)) = self.terms.get(prefix) {
                return Some(format!("{}{}", definition.iri, suffix));
            }
            if iri::has_scheme(value) {
                return Some(value.to_string());
            }
        }

        if vocab {
            if let Some(vocab) = &self.vocab {
                return Some(format!("{}{}", vocab, value));
            }
        }
        if document_relative {
            return Some(
                iri::resolve(self.base.as_deref(), value).unwrap_or_else(|_| value.to_string()),
            );
        }
        Some(value.to_string())
    }
}
