//! Codec error types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Location inside a parsed document
///
/// `offset` is a byte offset; `line` and `column` are 1-based, the column
/// counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute line/column for a byte offset into `input`
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let mut line = 1;
        let mut column = 1;
        for (i, c) in input.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position {
            offset,
            line,
            column,
        }
    }

    /// Compute the byte offset for a 1-based line/column pair
    pub fn from_line_column(input: &str, line: usize, column: usize) -> Self {
        let mut offset = input.len();
        let mut current_line = 1;
        let mut current_column = 1;
        for (i, c) in input.char_indices() {
            if current_line == line && current_column >= column {
                offset = i;
                break;
            }
            if c == '\n' {
                if current_line == line {
                    offset = i;
                    break;
                }
                current_line += 1;
                current_column = 1;
            } else {
                current_column += 1;
            }
        }
        Position {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Grammar violation reported by a codec, before the registry attaches the
/// format name and source identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub position: Option<Position>,
    pub message: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            position: None,
            message: message.into(),
        }
    }

    /// Error located at byte `offset` of `input`
    pub fn at(input: &str, offset: usize, message: impl Into<String>) -> Self {
        Self {
            position: Some(Position::from_offset(input, offset)),
            message: message.into(),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Payload does not conform to the declared format's grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub format: String,
    pub source_id: String,
    pub position: Option<Position>,
    pub message: String,
}

impl ParseError {
    pub fn from_syntax(format: &str, source_id: &str, err: SyntaxError) -> Self {
        Self {
            format: format.to_string(),
            source_id: source_id.to_string(),
            position: err.position,
            message: err.message,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error parsing graph from {} in format {}",
            self.source_id, self.format
        )?;
        if let Some(position) = &self.position {
            write!(f, " at {}", position)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Codec layer errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Unsupported format: {requested}. Supported formats are: {}", .supported.join(", "))]
    UnsupportedFormat {
        requested: String,
        supported: Vec<String>,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Error reading file {source_id}: {source}")]
    Io {
        source_id: String,
        #[source]
        source: io::Error,
    },

    #[error("Error serializing graph to {format}: {message}")]
    Serialize { format: String, message: String },
}

impl FormatError {
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, FormatError::UnsupportedFormat { .. })
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, FormatError::Parse(_))
    }

    pub fn is_io_error(&self) -> bool {
        matches!(self, FormatError::Io { .. })
    }

    /// Location of a parse failure, when the grammar supplied one
    pub fn position(&self) -> Option<Position> {
        match self {
            FormatError::Parse(err) => err.position,
            _ => None,
        }
    }

    pub(crate) fn serialize(format: &str, message: impl Into<String>) -> Self {
        FormatError::Serialize {
            format: format.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_offset() {
        let input = "ab\ncd\nef";
        assert_eq!(
            Position::from_offset(input, 4),
            Position {
                offset: 4,
                line: 2,
                column: 2
            }
        );
        assert_eq!(Position::from_offset(input, 0).line, 1);
        assert_eq!(Position::from_offset(input, 100).offset, input.len());
    }

    #[test]
    fn test_position_from_line_column() {
        let input = "ab\ncd\nef";
        let pos = Position::from_line_column(input, 3, 2);
        assert_eq!(pos.offset, 7);
        assert_eq!(Position::from_offset(input, pos.offset), pos);
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = FormatError::UnsupportedFormat {
            requested: "yaml".to_string(),
            supported: vec!["turtle".to_string(), "trig".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported format: yaml. Supported formats are: turtle, trig"
        );
        assert!(err.is_unsupported_format());
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_parse_error_display_includes_position() {
        let err = ParseError::from_syntax(
            "turtle",
            "data.ttl",
            SyntaxError::at("a\nbc", 3, "unexpected character 'c'"),
        );
        assert_eq!(
            err.to_string(),
            "Error parsing graph from data.ttl in format turtle at line 2, column 2: unexpected character 'c'"
        );
    }
}
