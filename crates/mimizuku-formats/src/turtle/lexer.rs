//! Turtle family lexer built on winnow.
//!
//! Produces the whole token stream up front and fails on the first invalid
//! token. N-Triples uses a reduced token set so that Turtle shorthand is
//! rejected at the lexical level.

use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, peek, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::token::{Token, TokenKind};
use super::Dialect;
use crate::error::SyntaxError;

type Input<'a> = LocatingSlice<&'a str>;

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Tokenize a whole document
pub(crate) fn tokenize(source: &str, dialect: Dialect) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut input = LocatingSlice::new(source);

    loop {
        skip_ws_and_comments(&mut input);

        let start = input.current_token_start();
        if input.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, start, start));
            break;
        }

        let next = match dialect {
            Dialect::NTriples => next_ntriples_token(&mut input),
            _ => next_token(&mut input),
        };
        match next {
            Ok(kind) => {
                let end = input.current_token_start();
                tokens.push(Token::new(kind, start, end));
            }
            Err(_) => return Err(lex_error(source, start)),
        }
    }

    Ok(tokens)
}

fn lex_error(source: &str, offset: usize) -> SyntaxError {
    let bad = source[offset..].chars().next().unwrap_or('?');
    let message = match bad {
        '"' | '\'' => "unterminated or invalid string literal".to_string(),
        '<' => "invalid or unterminated IRI".to_string(),
        '@' => "invalid directive or language tag".to_string(),
        c if c.is_control() || !c.is_ascii() => {
            format!("unexpected character U+{:04X}", c as u32)
        }
        c => format!("unexpected character '{}'", c),
    };
    SyntaxError::at(source, offset, message)
}

fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str> = take_while(0.., is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str> = take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
        } else {
            break;
        }
    }
}

fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        parse_double_caret,
        parse_iri_ref,
        parse_arrow,
        parse_blank_node_label,
        parse_at_directive,
        parse_default_prefix,
        parse_prefixed_name_or_keyword,
        parse_string_literal,
        parse_number,
        parse_punctuation,
    ))
    .parse_next(input)
}

fn next_ntriples_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        parse_double_caret,
        parse_iri_ref,
        parse_blank_node_label,
        parse_at_directive,
        parse_string_short_double,
        '.'.map(|_| TokenKind::Dot),
    ))
    .parse_next(input)
}

// IRIs

fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('<', parse_iri_content, '>')
        .map(TokenKind::Iri)
        .parse_next(input)
}

fn parse_iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with('>') {
            break;
        }

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            match parse_unicode_escape(input)? {
                Some(c) => result.push(c),
                None => return backtrack(),
            }
        } else {
            return backtrack();
        }
    }

    Ok(result)
}

/// `\uXXXX` / `\UXXXXXXXX`, after the backslash
fn parse_unicode_escape(input: &mut Input<'_>) -> ModalResult<Option<char>> {
    let width = if input.starts_with('u') {
        4
    } else if input.starts_with('U') {
        8
    } else {
        return Ok(None);
    };
    any.parse_next(input)?;
    let hex: &str = take_while(width..=width, AsChar::is_hex_digit).parse_next(input)?;
    let code = u32::from_str_radix(hex, 16).map_err(|_| ErrMode::Backtrack(ContextError::new()))?;
    Ok(char::from_u32(code))
}

// N3 operators

fn parse_arrow(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "<=".map(|_| TokenKind::ImpliedBy),
        "=>".map(|_| TokenKind::Implies),
        '='.map(|_| TokenKind::Equals),
    ))
    .parse_next(input)
}

// Directives and language tags

fn parse_at_directive(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '@'.parse_next(input)?;
    let primary: &str = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;

    match primary {
        "prefix" => return Ok(TokenKind::KwPrefix),
        "base" => return Ok(TokenKind::KwBase),
        _ => {}
    }

    let mut tag = primary.to_string();
    while input.starts_with('-') {
        let checkpoint = input.checkpoint();
        '-'.parse_next(input)?;
        let subtag: ModalResult<&str> =
            take_while(1.., |c: char| c.is_ascii_alphanumeric()).parse_next(input);
        match subtag {
            Ok(subtag) => {
                tag.push('-');
                tag.push_str(subtag);
            }
            Err(_) => {
                input.reset(&checkpoint);
                break;
            }
        }
    }
    Ok(TokenKind::LangTag(tag))
}

// Prefixed names and keywords

fn parse_default_prefix(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;
    let local = opt(parse_pn_local).parse_next(input)?;
    Ok(TokenKind::PrefixedName {
        prefix: String::new(),
        local: local.unwrap_or_default(),
    })
}

fn parse_prefixed_name_or_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let start = input.checkpoint();

    let first = match input.chars().next() {
        Some(c) if is_pn_chars_base(c) => c,
        _ => return backtrack(),
    };
    let mut word = String::new();
    any.parse_next(input)?;
    word.push(first);

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        if input.starts_with('.') && input.chars().nth(1).is_some_and(is_pn_chars) {
            '.'.parse_next(input)?;
            word.push('.');
            continue;
        }
        break;
    }

    if peek(opt(':')).parse_next(input)?.is_some() {
        ':'.parse_next(input)?;
        let local = opt(parse_pn_local).parse_next(input)?;
        return Ok(TokenKind::PrefixedName {
            prefix: word,
            local: local.unwrap_or_default(),
        });
    }

    let keyword = match word.as_str() {
        "a" => Some(TokenKind::KwA),
        "true" => Some(TokenKind::KwTrue),
        "false" => Some(TokenKind::KwFalse),
        "has" => Some(TokenKind::KwHas),
        "is" => Some(TokenKind::KwIs),
        "of" => Some(TokenKind::KwOf),
        w if w.eq_ignore_ascii_case("prefix") => Some(TokenKind::KwSparqlPrefix),
        w if w.eq_ignore_ascii_case("base") => Some(TokenKind::KwSparqlBase),
        w if w.eq_ignore_ascii_case("graph") => Some(TokenKind::KwGraph),
        _ => None,
    };
    match keyword {
        Some(kind) => Ok(kind),
        None => {
            input.reset(&start);
            backtrack()
        }
    }
}

/// Local part of a prefixed name, with `\` escapes decoded and `%XX` kept
fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    match input.chars().next() {
        Some(c) if is_pn_chars_u(c) || c == ':' || c.is_ascii_digit() || c == '%' || c == '\\' => {}
        _ => return backtrack(),
    }

    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('.') {
            let continues = input
                .chars()
                .nth(1)
                .is_some_and(|c| is_pn_chars(c) || matches!(c, ':' | '%' | '\\'));
            if continues {
                '.'.parse_next(input)?;
                result.push('.');
                continue;
            }
            break;
        }

        if input.starts_with('%') {
            '%'.parse_next(input)?;
            let hex: &str = take_while(2..=2, AsChar::is_hex_digit).parse_next(input)?;
            result.push('%');
            result.push_str(hex);
        } else if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let escaped: char = any.parse_next(input)?;
            if "_~.-!$&'()*+,;=/?#@%".contains(escaped) {
                result.push(escaped);
            } else {
                return backtrack();
            }
        } else {
            break;
        }
    }

    if result.is_empty() {
        return backtrack();
    }
    Ok(result)
}

// Blank nodes

fn parse_blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded("_:", parse_blank_node_name)
        .map(TokenKind::BlankNodeLabel)
        .parse_next(input)
}

/// Label characters; a trailing `.` belongs to the statement, not the label
fn parse_blank_node_name(input: &mut Input<'_>) -> ModalResult<String> {
    let first: &str =
        take_while(1, |c: char| is_pn_chars_u(c) || c.is_ascii_digit()).parse_next(input)?;
    let mut name = first.to_string();

    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        name.push_str(chunk);
        if input.starts_with('.') && input.chars().nth(1).is_some_and(is_pn_chars) {
            '.'.parse_next(input)?;
            name.push('.');
            continue;
        }
        break;
    }

    Ok(name)
}

// Strings

fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        parse_string_long_double,
        parse_string_long_single,
        parse_string_short_double,
        parse_string_short_single,
    ))
    .parse_next(input)
}

fn parse_string_short_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('"', parse_short_content_double, '"')
        .map(TokenKind::String)
        .parse_next(input)
}

fn parse_string_short_single(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    delimited('\'', parse_short_content_single, '\'')
        .map(TokenKind::String)
        .parse_next(input)
}

fn parse_string_long_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "\"\"\"".parse_next(input)?;
    parse_long_content(input, '"').map(TokenKind::String)
}

fn parse_string_long_single(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "'''".parse_next(input)?;
    parse_long_content(input, '\'').map(TokenKind::String)
}

fn parse_short_content_double(input: &mut Input<'_>) -> ModalResult<String> {
    parse_short_content(input, '"')
}

fn parse_short_content_single(input: &mut Input<'_>) -> ModalResult<String> {
    parse_short_content(input, '\'')
}

fn parse_short_content(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., |c: char| c != quote && c != '\\' && c != '\n' && c != '\r')
            .parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            result.push(parse_escape_char(input)?);
        } else {
            break;
        }
    }

    Ok(result)
}

/// Body of a long string, after the opening delimiter, up to and including
/// the closing one
fn parse_long_content(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., |c: char| c != quote && c != '\\').parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() {
            return backtrack();
        }
        if input.chars().take(3).filter(|c| *c == quote).count() == 3 {
            any.parse_next(input)?;
            any.parse_next(input)?;
            any.parse_next(input)?;
            // up to two quotes may directly precede the closing delimiter
            while input.starts_with(quote) {
                result.push(quote);
                any.parse_next(input)?;
            }
            return Ok(result);
        }
        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            result.push(parse_escape_char(input)?);
        } else {
            let c: char = any.parse_next(input)?;
            result.push(c);
        }
    }
}

fn parse_escape_char(input: &mut Input<'_>) -> ModalResult<char> {
    if let Some(c) = parse_unicode_escape(input)? {
        return Ok(c);
    }
    let c: char = any.parse_next(input)?;
    match c {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        _ => backtrack(),
    }
}

// Numbers

fn parse_number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((parse_double, parse_decimal, parse_integer)).parse_next(input)
}

fn parse_integer(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let lexical: &str = (opt(one_of(['+', '-'])), digit1).take().parse_next(input)?;

    if input.starts_with('e') || input.starts_with('E') {
        return backtrack();
    }
    if input.starts_with('.') && input.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) {
        return backtrack();
    }

    Ok(TokenKind::Integer(lexical.to_string()))
}

fn parse_decimal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let lexical: &str = (
        opt(one_of(['+', '-'])),
        alt(((digit1, '.', digit1).take(), ('.', digit1).take())),
    )
        .take()
        .parse_next(input)?;

    if input.starts_with('e') || input.starts_with('E') {
        return backtrack();
    }

    Ok(TokenKind::Decimal(lexical.to_string()))
}

fn parse_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let lexical: &str = (
        opt(one_of(['+', '-'])),
        alt((
            (digit1, '.', opt(digit1)).take(),
            ('.', digit1).take(),
            digit1,
        )),
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        digit1,
    )
        .take()
        .parse_next(input)?;

    Ok(TokenKind::Double(lexical.to_string()))
}

// Punctuation

fn parse_double_caret(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    "^^".map(|_| TokenKind::DoubleCaret).parse_next(input)
}

fn parse_punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        _ => None,
    })
    .parse_next(input)
}

// Character classes (PN_CHARS_BASE, PN_CHARS_U, PN_CHARS)

pub(crate) fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02FF}'
        | '\u{0370}'..='\u{037D}'
        | '\u{037F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

pub(crate) fn is_pn_chars_u(c: char) -> bool {
    is_pn_chars_base(c) || c == '_'
}

pub(crate) fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || c == '-'
        || c.is_ascii_digit()
        || c == '\u{00B7}'
        || matches!(c, '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}
