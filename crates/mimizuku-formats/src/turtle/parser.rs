//! Recursive-descent parser for N-Triples, Turtle, TriG and N3.
//!
//! TriG graph blocks are merged into the single graph. N3 quoted formulae
//! have no triple representation and are rejected.

use mimizuku_core::vocab::{log, owl, rdf, xsd};
use mimizuku_core::{BlankNode, Graph, Iri, Literal, Subject, Term, Triple};

use super::lexer::tokenize;
use super::token::{Token, TokenKind};
use super::Dialect;
use crate::blank::BlankNodeScope;
use crate::error::SyntaxError;
use crate::iri;

type Result<T> = std::result::Result<T, SyntaxError>;

/// Parse a whole document into a graph; `base` applies until the first
/// base directive
pub(crate) fn parse(source: &str, base: Option<&str>, dialect: Dialect) -> Result<Graph> {
    let mut parser = Parser::new(source, dialect)?;
    parser.base = base.map(str::to_string);
    parser.parse()
}

/// Predicate plus direction (`is p of` and `<=` swap subject and object)
struct Verb {
    predicate: Iri,
    inverse: bool,
}

impl Verb {
    fn forward<I: Into<Iri>>(predicate: I) -> Self {
        Verb {
            predicate: predicate.into(),
            inverse: false,
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    dialect: Dialect,
    base: Option<String>,
    blanks: BlankNodeScope,
    graph: Graph,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, dialect: Dialect) -> Result<Self> {
        Ok(Self {
            source,
            tokens: tokenize(source, dialect)?,
            pos: 0,
            dialect,
            base: None,
            blanks: BlankNodeScope::new(),
            graph: Graph::new(),
        })
    }

    fn parse(mut self) -> Result<Graph> {
        while !self.at_eof() {
            self.parse_statement()?;
        }
        Ok(self.graph)
    }

    // Token cursor

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self, ahead: usize) -> &TokenKind {
        let index = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn at_eof(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if *self.kind() == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.source, self.current().start, message)
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        self.error_here(format!("expected {}, found {}", expected, self.kind()))
    }

    // Statements

    fn parse_statement(&mut self) -> Result<()> {
        if self.dialect == Dialect::NTriples {
            return self.parse_ntriples_statement();
        }

        match self.kind() {
            TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => self.parse_prefix_directive(),
            TokenKind::KwBase | TokenKind::KwSparqlBase => self.parse_base_directive(),
            TokenKind::KwGraph if self.dialect == Dialect::TriG => {
                self.advance();
                self.parse_graph_label()?;
                self.parse_graph_block()
            }
            TokenKind::LBrace => match self.dialect {
                Dialect::TriG => self.parse_graph_block(),
                Dialect::N3 => Err(self.formula_error()),
                _ => Err(self.unexpected("subject")),
            },
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } | TokenKind::BlankNodeLabel(_)
                if self.dialect == Dialect::TriG
                    && matches!(self.peek_kind(1), TokenKind::LBrace) =>
            {
                self.parse_graph_label()?;
                self.parse_graph_block()
            }
            _ => {
                self.parse_triples()?;
                self.expect(TokenKind::Dot)?;
                Ok(())
            }
        }
    }

    fn parse_prefix_directive(&mut self) -> Result<()> {
        let sparql_style = matches!(self.advance().kind, TokenKind::KwSparqlPrefix);

        let prefix = match self.kind() {
            TokenKind::PrefixedName { prefix, local } if local.is_empty() => prefix.clone(),
            _ => return Err(self.unexpected("prefix name")),
        };
        self.advance();

        let namespace = match self.kind().clone() {
            TokenKind::Iri(raw) => self.resolve(&raw)?,
            _ => return Err(self.unexpected("namespace IRI")),
        };
        self.advance();

        self.graph.bind_prefix(prefix, namespace.as_str());

        if !sparql_style {
            self.expect(TokenKind::Dot)?;
        }
        Ok(())
    }

    fn parse_base_directive(&mut self) -> Result<()> {
        let sparql_style = matches!(self.advance().kind, TokenKind::KwSparqlBase);

        let base = match self.kind().clone() {
            TokenKind::Iri(raw) => self.resolve(&raw)?,
            _ => return Err(self.unexpected("base IRI")),
        };
        self.advance();
        self.base = Some(base.0);

        if !sparql_style {
            self.expect(TokenKind::Dot)?;
        }
        Ok(())
    }

    /// Graph name of a TriG block; the name is validated and then dropped
    fn parse_graph_label(&mut self) -> Result<()> {
        match self.kind().clone() {
            TokenKind::Iri(raw) => {
                self.resolve(&raw)?;
                self.advance();
            }
            TokenKind::PrefixedName { prefix, local } => {
                self.expand(&prefix, &local)?;
                self.advance();
            }
            TokenKind::BlankNodeLabel(_) => {
                self.advance();
            }
            TokenKind::LBracket if matches!(self.peek_kind(1), TokenKind::RBracket) => {
                self.advance();
                self.advance();
            }
            _ => return Err(self.unexpected("graph name")),
        }
        Ok(())
    }

    fn parse_graph_block(&mut self) -> Result<()> {
        self.expect(TokenKind::LBrace)?;
        loop {
            if matches!(self.kind(), TokenKind::RBrace) {
                self.advance();
                return Ok(());
            }
            self.parse_triples()?;
            match self.kind() {
                TokenKind::Dot => {
                    self.advance();
                }
                TokenKind::RBrace => {}
                _ => return Err(self.unexpected("'.' or '}'")),
            }
        }
    }

    fn parse_triples(&mut self) -> Result<()> {
        if matches!(self.kind(), TokenKind::LBracket) {
            let (node, has_properties) = self.parse_blank_node_property_list()?;
            if has_properties && matches!(self.kind(), TokenKind::Dot | TokenKind::RBrace) {
                return Ok(());
            }
            return self.parse_predicate_object_list(&Subject::BlankNode(node));
        }

        let subject = self.parse_subject()?;
        self.parse_predicate_object_list(&subject)
    }

    fn parse_ntriples_statement(&mut self) -> Result<()> {
        let first = self.current().start;

        let subject = match self.kind().clone() {
            TokenKind::Iri(raw) => Subject::Iri(self.resolve(&raw)?),
            TokenKind::BlankNodeLabel(label) => Subject::BlankNode(self.blanks.labeled(&label)),
            TokenKind::KwPrefix | TokenKind::KwBase => {
                return Err(self.error_here("directives are not allowed in N-Triples"))
            }
            _ => return Err(self.unexpected("subject")),
        };
        self.advance();

        let predicate = match self.kind().clone() {
            TokenKind::Iri(raw) => self.resolve(&raw)?,
            _ => return Err(self.unexpected("predicate IRI")),
        };
        self.advance();

        let object = match self.kind().clone() {
            TokenKind::Iri(raw) => {
                let iri = self.resolve(&raw)?;
                self.advance();
                Term::Iri(iri)
            }
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Term::BlankNode(self.blanks.labeled(&label))
            }
            TokenKind::String(_) => self.parse_literal()?,
            _ => return Err(self.unexpected("object")),
        };

        let dot = self.expect(TokenKind::Dot)?;
        if self.source[first..dot.end].contains(&['\n', '\r'][..]) {
            return Err(SyntaxError::at(
                self.source,
                first,
                "a triple must be written on a single line",
            ));
        }
        let next = self.current().start;
        if !self.at_eof() && !self.source[dot.end..next].contains(&['\n', '\r'][..]) {
            return Err(self.error_here("expected end of line after '.'"));
        }

        self.graph.insert(Triple::new(subject, predicate, object));
        Ok(())
    }

    // Terms

    fn parse_subject(&mut self) -> Result<Subject> {
        match self.kind().clone() {
            TokenKind::Iri(raw) => {
                let iri = self.resolve(&raw)?;
                self.advance();
                Ok(Subject::Iri(iri))
            }
            TokenKind::PrefixedName { prefix, local } => {
                let iri = self.expand(&prefix, &local)?;
                self.advance();
                Ok(Subject::Iri(iri))
            }
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(Subject::BlankNode(self.blanks.labeled(&label)))
            }
            TokenKind::LBracket => {
                let (node, _) = self.parse_blank_node_property_list()?;
                Ok(Subject::BlankNode(node))
            }
            TokenKind::LParen => match self.parse_collection()? {
                Term::Iri(iri) => Ok(Subject::Iri(iri)),
                Term::BlankNode(node) => Ok(Subject::BlankNode(node)),
                Term::Literal(_) => Err(self.error_here("invalid collection subject")),
            },
            TokenKind::LBrace if self.dialect == Dialect::N3 => Err(self.formula_error()),
            TokenKind::String(_)
            | TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::Double(_)
            | TokenKind::KwTrue
            | TokenKind::KwFalse => Err(self.error_here("a literal cannot be used as a subject")),
            _ => Err(self.unexpected("subject")),
        }
    }

    fn parse_predicate_object_list(&mut self, subject: &Subject) -> Result<()> {
        loop {
            let verb = self.parse_verb()?;
            self.parse_object_list(subject, &verb)?;

            if !matches!(self.kind(), TokenKind::Semicolon) {
                break;
            }
            while matches!(self.kind(), TokenKind::Semicolon) {
                self.advance();
            }
            if matches!(
                self.kind(),
                TokenKind::Dot | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Eof
            ) {
                break;
            }
        }
        Ok(())
    }

    fn parse_verb(&mut self) -> Result<Verb> {
        match self.kind().clone() {
            TokenKind::KwA => {
                self.advance();
                Ok(Verb::forward(rdf::TYPE))
            }
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                Ok(Verb::forward(self.parse_predicate_iri()?))
            }
            TokenKind::Equals if self.dialect == Dialect::N3 => {
                self.advance();
                Ok(Verb::forward(owl::SAME_AS))
            }
            TokenKind::Implies if self.dialect == Dialect::N3 => {
                self.advance();
                Ok(Verb::forward(log::IMPLIES))
            }
            TokenKind::ImpliedBy if self.dialect == Dialect::N3 => {
                self.advance();
                Ok(Verb {
                    predicate: Iri::new(log::IMPLIES),
                    inverse: true,
                })
            }
            TokenKind::KwHas if self.dialect == Dialect::N3 => {
                self.advance();
                Ok(Verb::forward(self.parse_predicate_iri()?))
            }
            TokenKind::KwIs if self.dialect == Dialect::N3 => {
                self.advance();
                let predicate = self.parse_predicate_iri()?;
                self.expect(TokenKind::KwOf)?;
                Ok(Verb {
                    predicate,
                    inverse: true,
                })
            }
            _ => Err(self.unexpected("predicate")),
        }
    }

    fn parse_predicate_iri(&mut self) -> Result<Iri> {
        match self.kind().clone() {
            TokenKind::Iri(raw) => {
                let iri = self.resolve(&raw)?;
                self.advance();
                Ok(iri)
            }
            TokenKind::PrefixedName { prefix, local } => {
                let iri = self.expand(&prefix, &local)?;
                self.advance();
                Ok(iri)
            }
            TokenKind::KwA => {
                self.advance();
                Ok(Iri::new(rdf::TYPE))
            }
            _ => Err(self.unexpected("predicate IRI")),
        }
    }

    fn parse_object_list(&mut self, subject: &Subject, verb: &Verb) -> Result<()> {
        loop {
            let object_start = self.current().start;
            let object = self.parse_object()?;

            if verb.inverse {
                let inverted = Subject::try_from(object).map_err(|_| {
                    SyntaxError::at(
                        self.source,
                        object_start,
                        "a literal cannot be the subject of an inverted predicate",
                    )
                })?;
                self.graph.insert(Triple::new(
                    inverted,
                    verb.predicate.clone(),
                    Term::from(subject.clone()),
                ));
            } else {
                self.graph
                    .insert(Triple::new(subject.clone(), verb.predicate.clone(), object));
            }

            if matches!(self.kind(), TokenKind::Comma) {
                self.advance();
            } else {
                return Ok(());
            }
        }
    }

    fn parse_object(&mut self) -> Result<Term> {
        match self.kind().clone() {
            TokenKind::Iri(raw) => {
                let iri = self.resolve(&raw)?;
                self.advance();
                Ok(Term::Iri(iri))
            }
            TokenKind::PrefixedName { prefix, local } => {
                let iri = self.expand(&prefix, &local)?;
                self.advance();
                Ok(Term::Iri(iri))
            }
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(Term::BlankNode(self.blanks.labeled(&label)))
            }
            TokenKind::LBracket => {
                let (node, _) = self.parse_blank_node_property_list()?;
                Ok(Term::BlankNode(node))
            }
            TokenKind::LParen => self.parse_collection(),
            TokenKind::LBrace if self.dialect == Dialect::N3 => Err(self.formula_error()),
            TokenKind::String(_)
            | TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::Double(_)
            | TokenKind::KwTrue
            | TokenKind::KwFalse => self.parse_literal(),
            _ => Err(self.unexpected("object")),
        }
    }

    fn parse_literal(&mut self) -> Result<Term> {
        let literal = match self.advance().kind {
            TokenKind::String(value) => match self.kind().clone() {
                TokenKind::LangTag(lang) => {
                    self.advance();
                    Literal::lang_tagged(value, lang)
                }
                TokenKind::DoubleCaret => {
                    self.advance();
                    let datatype = self.parse_datatype()?;
                    Literal::typed(value, datatype)
                }
                _ => Literal::simple(value),
            },
            TokenKind::Integer(lexical) => Literal::typed(lexical, xsd::INTEGER),
            TokenKind::Decimal(lexical) => Literal::typed(lexical, xsd::DECIMAL),
            TokenKind::Double(lexical) => Literal::typed(lexical, xsd::DOUBLE),
            TokenKind::KwTrue => Literal::typed("true", xsd::BOOLEAN),
            TokenKind::KwFalse => Literal::typed("false", xsd::BOOLEAN),
            _ => return Err(self.error_here("expected literal")),
        };
        Ok(Term::Literal(literal))
    }

    fn parse_datatype(&mut self) -> Result<Iri> {
        match self.kind().clone() {
            TokenKind::Iri(raw) => {
                let iri = self.resolve(&raw)?;
                self.advance();
                Ok(iri)
            }
            TokenKind::PrefixedName { prefix, local } if self.dialect != Dialect::NTriples => {
                let iri = self.expand(&prefix, &local)?;
                self.advance();
                Ok(iri)
            }
            _ => Err(self.unexpected("datatype IRI")),
        }
    }

    /// `[ ... ]`, returns the node and whether it had any properties
    fn parse_blank_node_property_list(&mut self) -> Result<(BlankNode, bool)> {
        self.expect(TokenKind::LBracket)?;
        let node = self.blanks.fresh();

        let has_properties = !matches!(self.kind(), TokenKind::RBracket);
        if has_properties {
            self.parse_predicate_object_list(&Subject::BlankNode(node.clone()))?;
        }

        self.expect(TokenKind::RBracket)?;
        Ok((node, has_properties))
    }

    /// `( ... )` as an `rdf:first`/`rdf:rest` chain, `rdf:nil` when empty
    fn parse_collection(&mut self) -> Result<Term> {
        self.expect(TokenKind::LParen)?;

        let mut items = Vec::new();
        while !matches!(self.kind(), TokenKind::RParen) {
            if self.at_eof() {
                return Err(self.unexpected("')'"));
            }
            items.push(self.parse_object()?);
        }
        self.advance();

        Ok(self.blanks.list(&mut self.graph, items))
    }

    // IRIs

    fn resolve(&self, raw: &str) -> Result<Iri> {
        if self.dialect == Dialect::NTriples && !iri::has_scheme(raw) {
            return Err(self.error_here(format!(
                "relative IRI <{}> is not allowed in N-Triples",
                raw
            )));
        }
        iri::resolve(self.base.as_deref(), raw)
            .map(Iri::new)
            .map_err(|message| self.error_here(message))
    }

    fn expand(&self, prefix: &str, local: &str) -> Result<Iri> {
        self.graph
            .prefixes()
            .expand(prefix, local)
            .map(Iri::new)
            .ok_or_else(|| self.error_here(format!("undefined prefix '{}:'", prefix)))
    }

    fn formula_error(&self) -> SyntaxError {
        self.error_here("quoted formulae are not supported: a graph holds plain triples only")
    }
}
