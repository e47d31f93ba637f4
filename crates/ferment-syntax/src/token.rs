//! Token definitions and the keyword table for the Ferment language.
//!
//! Tokens are the smallest meaningful units of Ferment source code. The lexer
//! produces them one at a time; each carries its kind, the exact source text it
//! was scanned from, and the position it was found at.
//!
//! # Token Categories
//!
//! - **Identifiers**: Variable names (`x`, `brojac`)
//! - **Literals**: Integers and strings (`42`, `"zdravo"`)
//! - **Keywords**: Reserved words (`postavi`, `ako`, `dok`)
//! - **Operators**: Arithmetic and comparison operators (`+`, `==`, `<`)
//! - **Punctuation**: Structural elements (`(`, `{`, `;`)
//! - **Special**: End-of-input marker and illegal characters
//!
//! # Examples
//!
//! ```rust
//! use ferment_syntax::{lookup_ident, Position, Token, TokenKind};
//!
//! let keyword = Token::new(TokenKind::Let, "postavi", Position::new(1, 1));
//! assert_eq!(keyword.kind.to_string(), "postavi");
//!
//! assert_eq!(lookup_ident("dok"), TokenKind::While);
//! assert_eq!(lookup_ident("brojac"), TokenKind::Ident);
//! ```

use std::fmt;

use phf::phf_map;
use serde::Serialize;

/// Kinds of tokens produced by the Ferment lexer.
///
/// The set is closed and carries no payload: the scanned text lives in
/// [`Token::lexeme`], so every kind is `Copy` and cheap to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // === Special ===
    /// End of input. Returned again on every call once the source is exhausted.
    Eof,

    /// A character the language does not recognise, or an unterminated string.
    Illegal,

    // === Literals ===
    /// An identifier such as `x` or `brojac`
    Ident,

    /// A run of decimal digits, kept as text
    Int,

    /// A double-quoted string, kept as the raw text between the quotes
    String,

    // === Operators ===
    /// Assignment operator `=`
    Assign,

    /// Addition operator `+`
    Plus,

    /// Subtraction operator `-`
    Minus,

    /// Negation operator `!`
    Bang,

    /// Multiplication operator `*`
    Asterisk,

    /// Division operator `/`
    Slash,

    /// Equality comparison operator `==`
    Eq,

    /// Inequality comparison operator `!=`
    NotEq,

    /// Less-than comparison operator `<`
    Lt,

    /// Greater-than comparison operator `>`
    Gt,

    // === Punctuation ===
    /// Comma separator `,`
    Comma,

    /// Statement terminator `;`
    Semicolon,

    /// Left parenthesis `(`
    LParen,

    /// Right parenthesis `)`
    RParen,

    /// Left brace `{`
    LBrace,

    /// Right brace `}`
    RBrace,

    // === Keywords ===
    /// `funkcija`
    Function,

    /// `postavi` - binds a variable
    Let,

    /// `ako` - conditional
    If,

    /// `inace` - alternative branch of `ako`
    Else,

    /// `vrati` - return a value
    Return,

    /// `dok` - loop while a condition holds
    While,

    /// `ispisi` - print a value
    Print,

    /// `tacno`
    True,

    /// `netacno`
    False,
}

impl TokenKind {
    /// The textual rendering of this kind: the symbol for operators and
    /// punctuation, the source spelling for keywords, and an upper-case tag
    /// for everything else.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Function => "funkcija",
            TokenKind::Let => "postavi",
            TokenKind::If => "ako",
            TokenKind::Else => "inace",
            TokenKind::Return => "vrati",
            TokenKind::While => "dok",
            TokenKind::Print => "ispisi",
            TokenKind::True => "tacno",
            TokenKind::False => "netacno",
        }
    }

    /// Returns `true` for the reserved words of the language.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::Let
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::True
                | TokenKind::False
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved words, matched case-sensitively against their lower-case spelling.
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "postavi" => TokenKind::Let,
    "vrati" => TokenKind::Return,
    "funkcija" => TokenKind::Function,
    "ako" => TokenKind::If,
    "inace" => TokenKind::Else,
    "dok" => TokenKind::While,
    "ispisi" => TokenKind::Print,
    "tacno" => TokenKind::True,
    "netacno" => TokenKind::False,
};

/// Resolves a scanned word to its keyword kind, or [`TokenKind::Ident`].
pub fn lookup_ident(word: &str) -> TokenKind {
    KEYWORDS.get(word).copied().unwrap_or(TokenKind::Ident)
}

/// A location in the source text.
///
/// Lines are 1-based. Columns count the characters consumed on the current
/// line, so the first character of a line is at column 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    /// Line number in the source (1-based)
    pub line: usize,

    /// Column number in the source (1-based)
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A token with its source text and location.
///
/// Tokens are never modified after the lexer hands them out. AST nodes keep
/// the token that introduced them, which is how positions reach diagnostics.
///
/// # Examples
///
/// ```rust
/// use ferment_syntax::{Position, Token, TokenKind};
///
/// let name = Token::new(TokenKind::Ident, "x", Position::new(1, 9));
/// assert_eq!(name.lexeme, "x");
/// assert_eq!(name.pos.to_string(), "1:9");
/// assert!(!name.is(TokenKind::Eof));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The kind of this token
    pub kind: TokenKind,

    /// The exact source text the token was scanned from
    pub lexeme: String,

    /// Where the token was found
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            pos,
        }
    }

    /// The end-of-input sentinel at the given position.
    pub fn eof(pos: Position) -> Self {
        Self::new(TokenKind::Eof, "", pos)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
