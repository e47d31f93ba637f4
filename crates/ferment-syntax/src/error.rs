//! Error type shared by the Ferment lexer, parser and tools.
//!
//! The front end fails in two very different ways:
//!
//! - **Recoverable**: the parser finds a structural mismatch (a missing `=`,
//!   an unclosed parenthesis). It records an [`Error`] with the position of
//!   the offending token and keeps going.
//! - **Fatal**: the underlying reader fails. The error is returned through
//!   [`Result`] and aborts the pipeline.
//!
//! Both use the same [`Error`] value, so callers can render them uniformly.
//!
//! # Examples
//!
//! ```rust
//! use ferment_syntax::error::Error;
//! use ferment_syntax::Position;
//!
//! let located = Error::at("expected '=' after identifier", Position::new(2, 9));
//! assert_eq!(located.to_string(), "expected '=' after identifier at 2:9");
//!
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "broken pipe");
//! assert_eq!(Error::from(io).position(), None);
//! ```

use std::fmt;
use std::io;

use serde::Serialize;

use crate::token::Position;

/// An error produced while reading or parsing Ferment source.
///
/// # Fields
///
/// - `msg`: Human-readable error description
/// - `line`: Optional 1-based line number in the source
/// - `col`: Optional 1-based column number in the source
///
/// # Examples
///
/// ```rust
/// use ferment_syntax::Error;
///
/// let generic = Error::new("failed to read source: broken pipe");
/// assert_eq!(generic.to_string(), "failed to read source: broken pipe");
///
/// let syntax = Error::with_span("expected closing ')'", 3, 14);
/// assert_eq!(syntax.to_string(), "expected closing ')' at 3:14");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates a new error with the given message and no location.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates a new error with the given message and source location.
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }

    /// Creates a new error located at a token position.
    pub fn at(msg: impl Into<String>, pos: Position) -> Self {
        Self::with_span(msg, pos.line, pos.col)
    }

    /// The location of this error, if it has one.
    pub fn position(&self) -> Option<Position> {
        match (self.line, self.col) {
            (Some(line), Some(col)) => Some(Position::new(line, col)),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::new(format!("failed to read source: {}", e))
    }
}

/// A specialized `Result` type for Ferment operations.
pub type Result<T> = std::result::Result<T, Error>;
