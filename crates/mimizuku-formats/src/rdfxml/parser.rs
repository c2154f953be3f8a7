//! Event-driven RDF/XML parser on top of quick-xml.
//!
//! Every XML element pushes exactly one [`Frame`] and one namespace scope;
//! the matching end tag pops both and emits whatever the frame was waiting
//! for (a literal, a collection, nothing).

use std::collections::HashMap;

use mimizuku_core::vocab::rdf;
use mimizuku_core::{Graph, Iri, Literal, Subject, Term, Triple};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::blank::BlankNodeScope;
use crate::error::SyntaxError;
use crate::iri;

type Result<T> = std::result::Result<T, SyntaxError>;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Attribute names that are syntax, not properties
const SYNTAX_ATTRIBUTES: &[&str] = &["about", "ID", "nodeID", "resource", "datatype", "parseType"];

pub(crate) fn parse(input: &str, base: Option<&str>) -> Result<Graph> {
    let mut parser = RdfXmlParser::new(input);
    parser.document_base = base.map(str::to_string);
    parser.run()
}

enum FrameKind {
    /// Inside `rdf:RDF`: children are node elements
    Root,
    /// Node element: children are property elements
    Node { subject: Subject, li: usize },
    /// Property element waiting for its object
    Property {
        subject: Subject,
        predicate: Iri,
        reify: Option<Iri>,
        datatype: Option<Iri>,
        object: Option<Term>,
        text: String,
    },
    /// `rdf:parseType="Collection"`: children are list members
    Collection {
        subject: Subject,
        predicate: Iri,
        reify: Option<Iri>,
        items: Vec<Term>,
    },
    /// Element whose content was already consumed
    Consumed,
}

enum Role {
    Root,
    Node,
    Property,
}

struct Frame {
    kind: FrameKind,
    base: Option<String>,
    lang: Option<String>,
}

/// Attributes of one element, split into syntax and property attributes
#[derive(Default)]
struct ElementAttributes {
    about: Option<String>,
    id: Option<String>,
    node_id: Option<String>,
    resource: Option<String>,
    datatype: Option<String>,
    parse_type: Option<String>,
    properties: Vec<(Iri, String)>,
}

struct RdfXmlParser<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
    namespaces: Vec<HashMap<String, String>>,
    frames: Vec<Frame>,
    /// Base in effect outside any `xml:base`
    document_base: Option<String>,
    blanks: BlankNodeScope,
    graph: Graph,
}

impl<'a> RdfXmlParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            reader: Reader::from_str(input),
            namespaces: Vec::new(),
            frames: Vec::new(),
            document_base: None,
            blanks: BlankNodeScope::new(),
            graph: Graph::new(),
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.input, offset, message)
    }

    fn run(mut self) -> Result<Graph> {
        loop {
            let offset = self.reader.buffer_position();
            let event = self
                .reader
                .read_event()
                .map_err(|e| self.error(offset, format!("malformed XML: {}", e)))?;

            match event {
                Event::Start(e) => self.start_element(&e.into_owned(), offset, false)?,
                Event::Empty(e) => self.start_element(&e.into_owned(), offset, true)?,
                Event::End(_) => self.end_element(offset)?,
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| self.error(offset, format!("invalid text: {}", err)))?
                        .into_owned();
                    self.text(&text, offset)?;
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    self.text(&text, offset)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !self.frames.is_empty() {
            return Err(self.error(self.input.len(), "unexpected end of document"));
        }
        Ok(self.graph)
    }

    fn start_element(&mut self, element: &BytesStart<'_>, offset: usize, empty: bool) -> Result<()> {
        let qname = String::from_utf8_lossy(element.name().as_ref()).into_owned();

        let mut scope = HashMap::new();
        let mut raw_attributes = Vec::new();
        for attribute in element.attributes() {
            let attribute =
                attribute.map_err(|e| self.error(offset, format!("malformed attribute: {}", e)))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| self.error(offset, format!("invalid attribute value: {}", e)))?
                .into_owned();
            if key == "xmlns" {
                scope.insert(String::new(), value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.insert(prefix.to_string(), value);
            } else {
                raw_attributes.push((key, value));
            }
        }
        self.namespaces.push(scope);

        let name = self
            .expand(&qname, true)
            .ok_or_else(|| self.error(offset, format!("element <{}> has no namespace", qname)))?;

        let (mut base, mut lang) = self
            .frames
            .last()
            .map(|f| (f.base.clone(), f.lang.clone()))
            .unwrap_or_else(|| (self.document_base.clone(), None));

        let mut attributes = ElementAttributes::default();
        for (key, value) in raw_attributes {
            match key.as_str() {
                "xml:lang" => {
                    lang = if value.is_empty() { None } else { Some(value) };
                    continue;
                }
                "xml:base" => {
                    base = Some(
                        iri::resolve(base.as_deref(), &value)
                            .map_err(|message| self.error(offset, message))?,
                    );
                    continue;
                }
                k if k.starts_with("xml") => continue,
                _ => {}
            }

            let expanded = if key.contains(':') {
                self.expand(&key, false).ok_or_else(|| {
                    self.error(offset, format!("undeclared prefix in attribute {}", key))
                })?
            } else if SYNTAX_ATTRIBUTES.contains(&key.as_str()) {
                format!("{}{}", rdf::NAMESPACE, key)
            } else {
                continue;
            };

            match expanded.strip_prefix(rdf::NAMESPACE) {
                Some("about") => attributes.about = Some(value),
                Some("ID") => attributes.id = Some(value),
                Some("nodeID") => attributes.node_id = Some(value),
                Some("resource") => attributes.resource = Some(value),
                Some("datatype") => attributes.datatype = Some(value),
                Some("parseType") => attributes.parse_type = Some(value),
                _ => attributes.properties.push((Iri::new(expanded), value)),
            }
        }

        let is_rdf_root = name == format!("{}RDF", rdf::NAMESPACE);
        let role = match self.frames.last().map(|f| &f.kind) {
            None if is_rdf_root => Role::Root,
            _ if is_rdf_root => return Err(self.error(offset, "nested rdf:RDF element")),
            Some(FrameKind::Node { .. }) => Role::Property,
            Some(FrameKind::Consumed) => return Err(self.error(offset, "unexpected element")),
            _ => Role::Node,
        };
        match role {
            Role::Root => self.frames.push(Frame {
                kind: FrameKind::Root,
                base,
                lang,
            }),
            Role::Node => self.node_element(Iri::new(name), attributes, base, lang, offset)?,
            Role::Property => {
                self.property_element(Iri::new(name), attributes, base, lang, offset, empty)?
            }
        }

        if empty {
            self.end_element(offset)?;
        }
        Ok(())
    }

    fn node_element(
        &mut self,
        name: Iri,
        attributes: ElementAttributes,
        base: Option<String>,
        lang: Option<String>,
        offset: usize,
    ) -> Result<()> {
        let subject = if let Some(about) = &attributes.about {
            Subject::Iri(self.resolve(base.as_deref(), about, offset)?)
        } else if let Some(id) = &attributes.id {
            Subject::Iri(self.resolve(base.as_deref(), &format!("#{}", id), offset)?)
        } else if let Some(node_id) = &attributes.node_id {
            Subject::BlankNode(self.blanks.labeled(node_id))
        } else {
            Subject::BlankNode(self.blanks.fresh())
        };

        if name.as_str() != format!("{}Description", rdf::NAMESPACE) {
            self.graph
                .insert(Triple::new(subject.clone(), Iri::new(rdf::TYPE), name));
        }
        self.property_attributes(&subject, attributes.properties, lang.as_deref(), base.as_deref(), offset)?;

        let object = Term::from(subject.clone());
        let mut duplicate = false;
        match self.frames.last_mut().map(|f| &mut f.kind) {
            Some(FrameKind::Property { object: slot, .. }) => {
                duplicate = slot.is_some();
                *slot = Some(object);
            }
            Some(FrameKind::Collection { items, .. }) => items.push(object),
            _ => {}
        }
        if duplicate {
            return Err(self.error(offset, "a property element may contain only one node"));
        }

        self.frames.push(Frame {
            kind: FrameKind::Node { subject, li: 0 },
            base,
            lang,
        });
        Ok(())
    }

    fn property_element(
        &mut self,
        name: Iri,
        attributes: ElementAttributes,
        base: Option<String>,
        lang: Option<String>,
        offset: usize,
        empty: bool,
    ) -> Result<()> {
        let (subject, predicate) = match self.frames.last_mut().map(|f| &mut f.kind) {
            Some(FrameKind::Node { subject, li }) => {
                let predicate = if name.as_str() == format!("{}li", rdf::NAMESPACE) {
                    *li += 1;
                    Iri::new(format!("{}_{}", rdf::NAMESPACE, li))
                } else {
                    name
                };
                (subject.clone(), predicate)
            }
            _ => return Err(self.error(offset, "property element outside a node element")),
        };

        let reify = match &attributes.id {
            Some(id) => Some(self.resolve(base.as_deref(), &format!("#{}", id), offset)?),
            None => None,
        };

        let kind = match attributes.parse_type.as_deref() {
            Some("Resource") => {
                let node = self.blanks.fresh();
                self.emit(subject, predicate, Term::BlankNode(node.clone()), reify);
                FrameKind::Node {
                    subject: Subject::BlankNode(node),
                    li: 0,
                }
            }
            Some("Collection") => FrameKind::Collection {
                subject,
                predicate,
                reify,
                items: Vec::new(),
            },
            Some(_) => {
                let content = if empty {
                    String::new()
                } else {
                    self.capture_literal()?
                };
                self.emit(
                    subject,
                    predicate,
                    Term::Literal(Literal::typed(content, rdf::XML_LITERAL)),
                    reify,
                );
                self.frames.push(Frame {
                    kind: FrameKind::Consumed,
                    base,
                    lang,
                });
                if !empty {
                    self.end_element(offset)?;
                }
                return Ok(());
            }
            None => {
                let object = if let Some(resource) = &attributes.resource {
                    Some(Subject::Iri(self.resolve(base.as_deref(), resource, offset)?))
                } else if let Some(node_id) = &attributes.node_id {
                    Some(Subject::BlankNode(self.blanks.labeled(node_id)))
                } else if !attributes.properties.is_empty() {
                    Some(Subject::BlankNode(self.blanks.fresh()))
                } else {
                    None
                };
                if let Some(node) = &object {
                    self.property_attributes(
                        node,
                        attributes.properties,
                        lang.as_deref(),
                        base.as_deref(),
                        offset,
                    )?;
                }
                let datatype = match &attributes.datatype {
                    Some(datatype) => Some(self.resolve(base.as_deref(), datatype, offset)?),
                    None => None,
                };
                FrameKind::Property {
                    subject,
                    predicate,
                    reify,
                    datatype,
                    object: object.map(Term::from),
                    text: String::new(),
                }
            }
        };

        self.frames.push(Frame { kind, base, lang });
        Ok(())
    }

    fn property_attributes(
        &mut self,
        subject: &Subject,
        properties: Vec<(Iri, String)>,
        lang: Option<&str>,
        base: Option<&str>,
        offset: usize,
    ) -> Result<()> {
        for (predicate, value) in properties {
            let object = if predicate.as_str() == rdf::TYPE {
                Term::Iri(self.resolve(base, &value, offset)?)
            } else {
                Term::Literal(plain_literal(value, lang))
            };
            self.graph.insert(Triple::new(subject.clone(), predicate, object));
        }
        Ok(())
    }

    fn end_element(&mut self, offset: usize) -> Result<()> {
        self.namespaces.pop();
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| self.error(offset, "unexpected end tag"))?;

        match frame.kind {
            FrameKind::Property {
                subject,
                predicate,
                reify,
                datatype,
                object,
                text,
            } => {
                let object = match (object, datatype) {
                    (Some(object), _) => object,
                    (None, Some(datatype)) => Term::Literal(Literal::typed(text, datatype)),
                    (None, None) => Term::Literal(plain_literal(text, frame.lang.as_deref())),
                };
                self.emit(subject, predicate, object, reify);
            }
            FrameKind::Collection {
                subject,
                predicate,
                reify,
                items,
            } => {
                let head = self.blanks.list(&mut self.graph, items);
                self.emit(subject, predicate, head, reify);
            }
            FrameKind::Root | FrameKind::Node { .. } | FrameKind::Consumed => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str, offset: usize) -> Result<()> {
        match self.frames.last_mut().map(|f| &mut f.kind) {
            Some(FrameKind::Property {
                object: None,
                text: buffer,
                ..
            }) => {
                buffer.push_str(text);
                Ok(())
            }
            _ if text.trim().is_empty() => Ok(()),
            _ => Err(self.error(offset, "unexpected text content")),
        }
    }

    /// Raw content of a `rdf:parseType="Literal"` element, consuming its end tag
    fn capture_literal(&mut self) -> Result<String> {
        let start = self.reader.buffer_position();
        let mut depth = 0usize;
        loop {
            let before = self.reader.buffer_position();
            match self.reader.read_event() {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) if depth == 0 => {
                    return Ok(self.input[start..before].to_string());
                }
                Ok(Event::End(_)) => depth -= 1,
                Ok(Event::Eof) => {
                    return Err(self.error(before, "unterminated literal XML content"));
                }
                Ok(_) => {}
                Err(e) => return Err(self.error(before, format!("malformed XML: {}", e))),
            }
        }
    }

    /// Insert a triple, plus its reification when the property had `rdf:ID`
    fn emit(&mut self, subject: Subject, predicate: Iri, object: Term, reify: Option<Iri>) {
        if let Some(statement) = reify {
            let statement = Subject::Iri(statement);
            self.graph.insert(Triple::new(
                statement.clone(),
                Iri::new(rdf::TYPE),
                Iri::new(rdf::STATEMENT),
            ));
            self.graph.insert(Triple::new(
                statement.clone(),
                Iri::new(rdf::SUBJECT),
                Term::from(subject.clone()),
            ));
            self.graph.insert(Triple::new(
                statement.clone(),
                Iri::new(rdf::PREDICATE),
                predicate.clone(),
            ));
            self.graph
                .insert(Triple::new(statement, Iri::new(rdf::OBJECT), object.clone()));
        }
        self.graph.insert(Triple::new(subject, predicate, object));
    }

    fn expand(&self, qname: &str, is_element: bool) -> Option<String> {
        let (prefix, local) = qname.split_once(':').unwrap_or(("", qname));
        if prefix == "xml" {
            return Some(format!("{}{}", XML_NS, local));
        }
        if prefix.is_empty() && !is_element {
            return None;
        }
        self.namespaces
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix))
            .map(|namespace| format!("{}{}", namespace, local))
    }

    fn resolve(&self, base: Option<&str>, reference: &str, offset: usize) -> Result<Iri> {
        iri::resolve(base, reference)
            .map(Iri::new)
            .map_err(|message| self.error(offset, message))
    }
}

fn plain_literal(value: String, lang: Option<&str>) -> Literal {
    match lang {
        Some(lang) => Literal::lang_tagged(value, lang),
        None => Literal::simple(value),
    }
}
