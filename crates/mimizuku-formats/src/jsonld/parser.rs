//! JSON-LD to triples, walking node objects directly

use mimizuku_core::vocab::{rdf, xsd};
use mimizuku_core::{Graph, Iri, Literal, Subject, Term, Triple};
use serde_json::{Map, Number, Value};

use super::context::{Context, TermDefinition};
use crate::blank::BlankNodeScope;
use crate::error::{Position, SyntaxError};
use crate::iri;

type Result<T> = std::result::Result<T, SyntaxError>;

pub(crate) fn parse(input: &str, base: Option<&str>) -> Result<Graph> {
    let document: Value = serde_json::from_str(input).map_err(|e| {
        let message = e.to_string();
        let message = message
            .rsplit_once(" at line ")
            .map(|(head, _)| head.to_string())
            .unwrap_or(message);
        SyntaxError::new(format!("invalid JSON: {}", message))
            .with_position(Position::from_line_column(input, e.line(), e.column()))
    })?;

    let mut parser = JsonLdParser::default();
    let context = Context {
        base: base.map(str::to_string),
        ..Context::default()
    };
    match &document {
        Value::Object(map) => {
            parser.bind_prefixes(map.get("@context"));
            parser.node(map, &context)?;
        }
        Value::Array(items) => {
            for item in items {
                let Value::Object(map) = item else {
                    return Err(SyntaxError::new("top-level array entries must be node objects"));
                };
                parser.bind_prefixes(map.get("@context"));
                parser.node(map, &context)?;
            }
        }
        _ => {
            return Err(SyntaxError::new(
                "a JSON-LD document must be an object or an array",
            ))
        }
    }
    Ok(parser.graph)
}

#[derive(Default)]
struct JsonLdParser {
    blanks: BlankNodeScope,
    graph: Graph,
}

impl JsonLdParser {
    /// Keep simple namespace terms of a top-level context as graph prefixes
    fn bind_prefixes(&mut self, context: Option<&Value>) {
        match context {
            Some(Value::Object(map)) => {
                for (term, value) in map {
                    if let Value::String(namespace) = value {
                        if !term.starts_with('@')
                            && !term.contains(':')
                            && iri::has_scheme(namespace)
                            && (namespace.ends_with('/') || namespace.ends_with('#'))
                        {
                            self.graph.bind_prefix(term.as_str(), namespace.as_str());
                        }
                    }
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    self.bind_prefixes(Some(item));
                }
            }
            _ => {}
        }
    }

    fn node(&mut self, map: &Map<String, Value>, active: &Context) -> Result<Subject> {
        let context = match map.get("@context") {
            Some(local) => active.process(local)?,
            None => active.clone(),
        };

        let subject = match lookup(map, &context, "@id") {
            Some(Value::String(id)) => Subject::try_from(self.reference(id, &context, false))
                .map_err(|_| SyntaxError::new(format!("@id {} is not a node identifier", id)))?,
            Some(other) => {
                return Err(SyntaxError::new(format!("@id must be a string, found {}", other)))
            }
            None => Subject::BlankNode(self.blanks.fresh()),
        };

        self.properties(map, &subject, &context)?;
        Ok(subject)
    }

    fn properties(
        &mut self,
        map: &Map<String, Value>,
        subject: &Subject,
        context: &Context,
    ) -> Result<()> {
        for (key, value) in map {
            match context.keyword(key) {
                Some("@context") | Some("@id") | Some("@index") => {}
                Some("@type") => {
                    for ty in as_array(value) {
                        let Value::String(ty) = ty else {
                            return Err(SyntaxError::new("@type values must be strings"));
                        };
                        let object = self.reference(ty, context, true);
                        self.graph
                            .insert(Triple::new(subject.clone(), Iri::new(rdf::TYPE), object));
                    }
                }
                Some("@graph") | Some("@included") => {
                    for item in as_array(value) {
                        match item {
                            Value::Object(node) => {
                                self.node(node, context)?;
                            }
                            _ => {
                                return Err(SyntaxError::new(format!(
                                    "{} entries must be node objects",
                                    key
                                )))
                            }
                        }
                    }
                }
                Some("@reverse") => {
                    let Value::Object(reverse) = value else {
                        return Err(SyntaxError::new("@reverse must be an object"));
                    };
                    for (property, values) in reverse {
                        let Some(predicate) = predicate_iri(property, context) else {
                            continue;
                        };
                        for object in self.objects(values, context.term(property), context)? {
                            let node = as_subject(object)?;
                            self.graph
                                .insert(Triple::new(node, predicate.clone(), subject.clone()));
                        }
                    }
                }
                Some("@nest") => {
                    for nested in as_array(value) {
                        let Value::Object(nested) = nested else {
                            return Err(SyntaxError::new("@nest values must be objects"));
                        };
                        self.properties(nested, subject, context)?;
                    }
                }
                Some("@value") | Some("@list") | Some("@set") => {
                    return Err(SyntaxError::new(format!(
                        "{} is not allowed in a node object",
                        key
                    )));
                }
                Some(_) => {}
                None => {
                    let Some(predicate) = predicate_iri(key, context) else {
                        continue;
                    };
                    let definition = context.term(key);
                    let reverse = definition.is_some_and(|d| d.reverse);
                    for object in self.objects(value, definition, context)? {
                        if reverse {
                            let node = as_subject(object)?;
                            self.graph
                                .insert(Triple::new(node, predicate.clone(), subject.clone()));
                        } else {
                            self.graph
                                .insert(Triple::new(subject.clone(), predicate.clone(), object));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn objects(
        &mut self,
        value: &Value,
        definition: Option<&TermDefinition>,
        context: &Context,
    ) -> Result<Vec<Term>> {
        let container = definition.and_then(|d| d.container.as_deref());
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) if container == Some("@list") => {
                Ok(vec![self.list(items, definition, context)?])
            }
            Value::Array(items) => {
                let mut objects = Vec::new();
                for item in items {
                    objects.extend(self.objects(item, definition, context)?);
                }
                Ok(objects)
            }
            Value::Object(map)
                if container == Some("@language") && lookup(map, context, "@value").is_none() =>
            {
                let mut objects = Vec::new();
                for (language, values) in map {
                    for text in as_array(values) {
                        match text {
                            Value::String(text) => objects.push(Term::Literal(
                                Literal::lang_tagged(text.as_str(), language),
                            )),
                            Value::Null => {}
                            _ => {
                                return Err(SyntaxError::new(
                                    "language map values must be strings",
                                ))
                            }
                        }
                    }
                }
                Ok(objects)
            }
            Value::Object(map) => {
                if let Some(literal) = lookup(map, context, "@value") {
                    return Ok(value_object(map, literal, context)?
                        .map(Term::Literal)
                        .into_iter()
                        .collect());
                }
                if let Some(items) = lookup(map, context, "@list") {
                    return Ok(vec![self.list(as_array(items), definition, context)?]);
                }
                if let Some(items) = lookup(map, context, "@set") {
                    return self.objects(items, definition, context);
                }
                Ok(vec![Term::from(self.node(map, context)?)])
            }
            scalar => Ok(self.scalar(scalar, definition, context).into_iter().collect()),
        }
    }

    fn list(
        &mut self,
        items: &[Value],
        definition: Option<&TermDefinition>,
        context: &Context,
    ) -> Result<Term> {
        let mut members = Vec::new();
        for item in items {
            match item {
                Value::Array(nested) => members.push(self.list(nested, definition, context)?),
                _ => members.extend(self.objects(item, definition, context)?),
            }
        }
        Ok(self.blanks.list(&mut self.graph, members))
    }

    fn scalar(
        &mut self,
        value: &Value,
        definition: Option<&TermDefinition>,
        context: &Context,
    ) -> Option<Term> {
        let type_mapping = definition.and_then(|d| d.type_mapping.as_deref());
        match value {
            Value::String(text) => Some(match type_mapping {
                Some("@id") => self.reference(text, context, false),
                Some("@vocab") => self.reference(text, context, true),
                Some(datatype) => Term::Literal(Literal::typed(text.as_str(), datatype)),
                None => {
                    let language = match definition.and_then(|d| d.language.clone()) {
                        Some(language) => language,
                        None => context.language.clone(),
                    };
                    Term::Literal(match language {
                        Some(language) => Literal::lang_tagged(text.as_str(), language),
                        None => Literal::simple(text.as_str()),
                    })
                }
            }),
            Value::Number(number) => Some(Term::Literal(number_literal(
                number,
                type_mapping.filter(|t| !t.starts_with('@')),
            ))),
            Value::Bool(flag) => Some(Term::Literal(Literal::typed(
                flag.to_string(),
                type_mapping
                    .filter(|t| !t.starts_with('@'))
                    .unwrap_or(xsd::BOOLEAN),
            ))),
            _ => None,
        }
    }

    /// Node reference: `_:label` or an IRI
    fn reference(&mut self, value: &str, context: &Context, vocab: bool) -> Term {
        if let Some(label) = value.strip_prefix("_:") {
            return Term::BlankNode(self.blanks.labeled(label));
        }
        let expanded = context
            .expand(value, true, vocab)
            .unwrap_or_else(|| value.to_string());
        match expanded.strip_prefix("_:") {
            Some(label) => Term::BlankNode(self.blanks.labeled(label)),
            None => Term::Iri(Iri::new(expanded)),
        }
    }
}

/// Entry whose key is `keyword` or one of its aliases
fn lookup<'m>(map: &'m Map<String, Value>, context: &Context, keyword: &str) -> Option<&'m Value> {
    map.iter()
        .find(|(key, _)| context.keyword(key) == Some(keyword))
        .map(|(_, value)| value)
}

fn as_array(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

fn as_subject(term: Term) -> Result<Subject> {
    Subject::try_from(term)
        .map_err(|_| SyntaxError::new("reverse properties must point at node objects"))
}

/// Absolute predicate IRI for a key; keys that expand to `null`, blank
/// nodes or relative references are dropped
fn predicate_iri(key: &str, context: &Context) -> Option<Iri> {
    let expanded = context.expand(key, false, true)?;
    if expanded.starts_with('@') || expanded.starts_with("_:") || !iri::has_scheme(&expanded) {
        return None;
    }
    Some(Iri::new(expanded))
}

fn value_object(
    map: &Map<String, Value>,
    value: &Value,
    context: &Context,
) -> Result<Option<Literal>> {
    let datatype = match lookup(map, context, "@type") {
        Some(Value::String(ty)) => Some(
            context
                .expand(ty, true, true)
                .unwrap_or_else(|| ty.clone()),
        ),
        Some(_) => return Err(SyntaxError::new("@type of a value object must be a string")),
        None => None,
    };
    let language = match lookup(map, context, "@language") {
        Some(Value::String(language)) => Some(language.as_str()),
        Some(Value::Null) | None => None,
        Some(_) => return Err(SyntaxError::new("@language must be a string")),
    };

    let literal = match value {
        Value::Null => return Ok(None),
        Value::String(text) => match (&datatype, language) {
            (Some(datatype), _) => Literal::typed(text.as_str(), datatype.as_str()),
            (None, Some(language)) => Literal::lang_tagged(text.as_str(), language),
            (None, None) => Literal::simple(text.as_str()),
        },
        Value::Number(number) => number_literal(number, datatype.as_deref()),
        Value::Bool(flag) => Literal::typed(
            flag.to_string(),
            datatype.as_deref().unwrap_or(xsd::BOOLEAN),
        ),
        _ => return Err(SyntaxError::new("@value must be a string, number, boolean or null")),
    };
    Ok(Some(literal))
}

/// Integers become `xsd:integer`, everything else a canonical `xsd:double`
fn number_literal(number: &Number, datatype: Option<&str>) -> Literal {
    let integral = number.is_i64() || number.is_u64();
    if integral && datatype != Some(xsd::DOUBLE) {
        return Literal::typed(number.to_string(), datatype.unwrap_or(xsd::INTEGER));
    }
    let value = number.as_f64().unwrap_or_default();
    Literal::typed(canonical_double(value), datatype.unwrap_or(xsd::DOUBLE))
}

fn canonical_double(value: f64) -> String {
    let formatted = format!("{:E}", value);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0E{}", mantissa, exponent)
        }
        _ => formatted,
    }
}
