//! Ferment lexer: turns a character stream into tokens, one per call.
//!
//! The lexer never fails on malformed text. Characters it does not recognise
//! come back as [`TokenKind::Illegal`] tokens for the parser to report. The
//! only error [`Lexer::next_token`] returns is a failure of the underlying
//! reader.
use std::io::BufRead;

use ferment_syntax::error::Result;
use ferment_syntax::token::{lookup_ident, Position, Token, TokenKind};
use tracing::trace;

mod source;

use source::CharSource;

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer<R> {
    src: CharSource<R>,
    pos: Position,
}

impl<'a> Lexer<&'a [u8]> {
    /// Create a lexer over an in-memory source string.
    pub fn from_source(input: &'a str) -> Self {
        Lexer::new(input.as_bytes())
    }
}

impl<R: BufRead> Lexer<R> {
    /// Create a new lexer that takes ownership of `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            src: CharSource::new(reader),
            pos: Position::new(1, 0),
        }
    }

    /// Scan and return the next token.
    ///
    /// Once the input is exhausted every call returns a [`TokenKind::Eof`]
    /// token with an empty lexeme.
    pub fn next_token(&mut self) -> Result<Token> {
        let token = self.scan()?;
        trace!(kind = %token.kind, lexeme = %token.lexeme, pos = %token.pos, "token");
        Ok(token)
    }

    /// Tokenize the rest of the input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn bump(&mut self) -> Result<Option<char>> {
        let c = self.src.read()?;
        if c.is_some() {
            self.pos.col += 1;
        }
        Ok(c)
    }

    fn backup(&mut self, c: char) {
        self.src.unread(c);
        self.pos.col -= 1;
    }

    fn newline(&mut self) {
        self.pos.line += 1;
        self.pos.col = 0;
    }

    fn scan(&mut self) -> Result<Token> {
        loop {
            let c = match self.bump()? {
                Some(c) => c,
                None => return Ok(Token::eof(self.pos)),
            };
            let kind = match c {
                '\n' => {
                    self.newline();
                    continue;
                }
                c if c.is_whitespace() => continue,
                ';' => TokenKind::Semicolon,
                ',' => TokenKind::Comma,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Asterisk,
                '/' => TokenKind::Slash,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '<' => TokenKind::Lt,
                '>' => TokenKind::Gt,
                '=' => return self.one_or_two(TokenKind::Assign, TokenKind::Eq),
                '!' => return self.one_or_two(TokenKind::Bang, TokenKind::NotEq),
                '"' => return self.read_string(),
                c if c.is_ascii_digit() => return self.read_number(c),
                c if c.is_alphabetic() => return self.read_ident_or_keyword(c),
                _ => TokenKind::Illegal,
            };
            return Ok(Token::new(kind, c.to_string(), self.pos));
        }
    }

    // `=` and `!` become `==` and `!=` when followed by `=`. The two-character
    // form is reported at its second character.
    fn one_or_two(&mut self, single: TokenKind, double: TokenKind) -> Result<Token> {
        let start = self.pos;
        if self.src.peek()? == Some('=') {
            self.bump()?;
            return Ok(Token::new(double, double.as_str(), self.pos));
        }
        Ok(Token::new(single, single.as_str(), start))
    }

    /// Consumes the longest run of characters matching `accept`, after `first`.
    fn read_while(&mut self, first: char, accept: fn(char) -> bool) -> Result<String> {
        let mut s = String::from(first);
        while let Some(c) = self.bump()? {
            if accept(c) {
                s.push(c);
            } else {
                self.backup(c);
                break;
            }
        }
        Ok(s)
    }

    fn read_number(&mut self, first: char) -> Result<Token> {
        let start = self.pos;
        let text = self.read_while(first, |c| c.is_ascii_digit())?;
        Ok(Token::new(TokenKind::Int, text, start))
    }

    // Identifiers are letters only; `x1` scans as `x` followed by `1`.
    fn read_ident_or_keyword(&mut self, first: char) -> Result<Token> {
        let start = self.pos;
        let word = self.read_while(first, char::is_alphabetic)?;
        Ok(Token::new(lookup_ident(&word), word, start))
    }

    fn read_string(&mut self) -> Result<Token> {
        let start = self.pos;
        let mut s = String::new();
        loop {
            match self.bump()? {
                Some('"') => return Ok(Token::new(TokenKind::String, s, start)),
                Some('\\') => {
                    s.push('\\');
                    match self.bump()? {
                        Some(c) => {
                            if c == '\n' {
                                self.newline();
                            }
                            s.push(c);
                        }
                        None => break,
                    }
                }
                Some('\n') => {
                    self.newline();
                    s.push('\n');
                }
                Some(c) => s.push(c),
                None => break,
            }
        }
        Ok(Token::new(TokenKind::Illegal, format!("\"{}", s), start))
    }
}
