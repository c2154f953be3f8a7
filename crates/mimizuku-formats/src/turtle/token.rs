//! Tokens shared by the Turtle family grammars

use std::fmt;

/// A token with its byte span in the source
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `<...>` with escapes decoded, not yet resolved against the base
    Iri(String),
    /// `prefix:local`, the local part may be empty
    PrefixedName { prefix: String, local: String },
    /// `_:label`
    BlankNodeLabel(String),

    /// Unescaped string content
    String(String),
    Integer(String),
    Decimal(String),
    Double(String),
    /// Language tag without the `@`
    LangTag(String),

    KwPrefix,
    KwBase,
    KwSparqlPrefix,
    KwSparqlBase,
    KwGraph,
    KwA,
    KwTrue,
    KwFalse,
    KwHas,
    KwIs,
    KwOf,

    Dot,
    Comma,
    Semicolon,
    DoubleCaret,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    /// `=`
    Equals,
    /// `=>`
    Implies,
    /// `<=`
    ImpliedBy,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Iri(s) => write!(f, "<{}>", s),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{}:{}", prefix, local),
            TokenKind::BlankNodeLabel(s) => write!(f, "_:{}", s),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                f.write_str(s)
            }
            TokenKind::LangTag(s) => write!(f, "@{}", s),
            TokenKind::KwPrefix => f.write_str("@prefix"),
            TokenKind::KwBase => f.write_str("@base"),
            TokenKind::KwSparqlPrefix => f.write_str("PREFIX"),
            TokenKind::KwSparqlBase => f.write_str("BASE"),
            TokenKind::KwGraph => f.write_str("GRAPH"),
            TokenKind::KwA => f.write_str("a"),
            TokenKind::KwTrue => f.write_str("true"),
            TokenKind::KwFalse => f.write_str("false"),
            TokenKind::KwHas => f.write_str("has"),
            TokenKind::KwIs => f.write_str("is"),
            TokenKind::KwOf => f.write_str("of"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::DoubleCaret => f.write_str("'^^'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::Equals => f.write_str("'='"),
            TokenKind::Implies => f.write_str("'=>'"),
            TokenKind::ImpliedBy => f.write_str("'<='"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
