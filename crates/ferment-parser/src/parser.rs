//! Recursive-descent parser over a two-token window.
//!
//! The parser holds exactly two tokens, `current` and `peek`, and never looks
//! behind. Each statement kind has its own parse function; expressions are a
//! single left-associative loop with no precedence tiers, so `a + b * c`
//! groups as `((a + b) * c)`.
//!
//! Grammar mismatches do not stop parsing. They are appended to an error list
//! and the construct that failed is left out of the tree. The only error that
//! aborts [`Parser::parse_program`] is a failure to read the source.
//!
//! Nesting of parentheses and blocks is capped at [`MAX_NESTING`] and each
//! statement may use at most [`MAX_OPERATORS`] binary operators. Input past
//! either limit is reported and skipped, so no input can exhaust the stack.

use std::io::BufRead;
use std::mem;

use ferment_lexer::Lexer;
use ferment_syntax::ast::*;
use ferment_syntax::error::{Error, Result};
use ferment_syntax::token::{Position, Token, TokenKind};
use tracing::debug;

/// Deepest allowed combined nesting of parenthesized groups and blocks.
pub const MAX_NESTING: usize = 128;

/// Most binary operators allowed in the expressions of one statement.
pub const MAX_OPERATORS: usize = 1024;

pub struct Parser<R> {
    lexer: Lexer<R>,
    current: Token,
    peek: Token,
    errors: Vec<Error>,
    depth: usize,
    operators: usize,
}

impl<R: BufRead> Parser<R> {
    /// Creates a parser that owns `lexer` and fills both lookahead slots.
    pub fn new(lexer: Lexer<R>) -> Result<Self> {
        let empty = Token::eof(Position::default());
        let mut parser = Self {
            lexer,
            current: empty.clone(),
            peek: empty,
            errors: Vec::new(),
            depth: 0,
            operators: 0,
        };
        parser.advance()?;
        parser.advance()?;
        Ok(parser)
    }

    /// Errors recorded so far, in the order they were found.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// Parses statements until end of input.
    ///
    /// A [`Program`] is returned even when errors were recorded; callers must
    /// check [`errors`](Self::errors) before trusting it.
    #[tracing::instrument(skip_all)]
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut program = Program::default();
        while !self.current.is(TokenKind::Eof) {
            match self.parse_statement()? {
                Some(stmt) => program.statements.push(stmt),
                None => debug!(
                    kind = %self.current.kind,
                    pos = %self.current.pos,
                    "no statement produced, skipping token"
                ),
            }
            self.advance()?;
        }
        debug!(
            statements = program.statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Ok(program)
    }

    fn advance(&mut self) -> Result<()> {
        let next = self.lexer.next_token()?;
        self.current = mem::replace(&mut self.peek, next);
        Ok(())
    }

    fn record(&mut self, msg: impl Into<String>, pos: Position) {
        let err = Error::at(msg, pos);
        debug!(error = %err, "parse error");
        self.errors.push(err);
    }

    fn error_at_current(&mut self, msg: impl Into<String>) {
        let pos = self.current.pos;
        self.record(msg, pos);
    }

    fn error_at_peek(&mut self, msg: impl Into<String>) {
        let pos = self.peek.pos;
        self.record(msg, pos);
    }

    fn skip_semicolon(&mut self) -> Result<()> {
        if self.peek.is(TokenKind::Semicolon) {
            self.advance()?;
        }
        Ok(())
    }

    /// Advances from the opening `open` at `current` to its matching `close`,
    /// or to Eof when the group never closes.
    fn skip_group(&mut self, open: TokenKind, close: TokenKind) -> Result<()> {
        let mut unclosed = 0usize;
        loop {
            if self.current.is(open) {
                unclosed += 1;
            } else if self.current.is(close) {
                unclosed -= 1;
                if unclosed == 0 {
                    return Ok(());
                }
            } else if self.current.is(TokenKind::Eof) {
                return Ok(());
            }
            self.advance()?;
        }
    }

    fn parse_statement(&mut self) -> Result<Option<Stmt>> {
        self.operators = 0;
        let stmt = match self.current.kind {
            TokenKind::Let => self.parse_let_statement()?.map(Stmt::Let),
            TokenKind::Return => self.parse_return_statement()?.map(Stmt::Return),
            TokenKind::If => self.parse_if_statement()?.map(Stmt::If),
            TokenKind::While => self.parse_while_statement()?.map(Stmt::While),
            TokenKind::Print => self.parse_print_statement()?.map(Stmt::Print),
            TokenKind::Illegal => {
                let msg = if self.current.lexeme.starts_with('"') {
                    "unterminated string literal".to_string()
                } else {
                    format!("illegal character '{}'", self.current.lexeme)
                };
                self.error_at_current(msg);
                None
            }
            _ => None,
        };
        Ok(stmt)
    }

    fn parse_let_statement(&mut self) -> Result<Option<LetStmt>> {
        let token = self.current.clone();
        self.advance()?;

        if !self.current.is(TokenKind::Ident) {
            self.error_at_current("expected identifier after 'postavi'");
            return Ok(None);
        }
        let name = Identifier {
            token: self.current.clone(),
            name: self.current.lexeme.clone(),
        };
        self.advance()?;

        if !self.current.is(TokenKind::Assign) {
            self.error_at_current("expected '=' after identifier");
            return Ok(None);
        }
        self.advance()?;

        let Some(value) = self.parse_expression()? else {
            return Ok(None);
        };
        self.skip_semicolon()?;
        Ok(Some(LetStmt { token, name, value }))
    }

    fn parse_return_statement(&mut self) -> Result<Option<ReturnStmt>> {
        let token = self.current.clone();
        self.advance()?;

        let Some(value) = self.parse_expression()? else {
            return Ok(None);
        };
        self.skip_semicolon()?;
        Ok(Some(ReturnStmt { token, value }))
    }

    fn parse_print_statement(&mut self) -> Result<Option<PrintStmt>> {
        let token = self.current.clone();
        self.advance()?;

        let Some(value) = self.parse_expression()? else {
            return Ok(None);
        };
        self.skip_semicolon()?;
        Ok(Some(PrintStmt { token, value }))
    }

    fn parse_if_statement(&mut self) -> Result<Option<IfStmt>> {
        let token = self.current.clone();

        if !self.peek.is(TokenKind::LParen) {
            self.error_at_peek("expected '(' after 'ako'");
            return Ok(None);
        }
        self.advance()?;
        self.advance()?;

        let Some(condition) = self.parse_expression()? else {
            return Ok(None);
        };

        if !self.peek.is(TokenKind::RParen) {
            self.error_at_peek("expected ')' after condition");
            return Ok(None);
        }
        self.advance()?;
        self.advance()?;

        if !self.current.is(TokenKind::LBrace) {
            self.error_at_current("expected '{' after condition");
            return Ok(None);
        }
        let Some(consequence) = self.parse_block()? else {
            return Ok(None);
        };

        let alternative = if self.peek.is(TokenKind::Else) {
            self.advance()?;
            self.advance()?;
            if !self.current.is(TokenKind::LBrace) {
                self.error_at_current("expected '{' after 'inace'");
                return Ok(None);
            }
            let Some(block) = self.parse_block()? else {
                return Ok(None);
            };
            Some(block)
        } else {
            None
        };

        Ok(Some(IfStmt {
            token,
            condition,
            consequence,
            alternative,
        }))
    }

    // The condition needs no parentheses: `dok x < 10 { ... }`.
    fn parse_while_statement(&mut self) -> Result<Option<WhileStmt>> {
        let token = self.current.clone();
        self.advance()?;

        let Some(condition) = self.parse_expression()? else {
            return Ok(None);
        };

        if !self.peek.is(TokenKind::LBrace) {
            self.error_at_peek("expected '{' after condition");
            return Ok(None);
        }
        self.advance()?;
        let Some(body) = self.parse_block()? else {
            return Ok(None);
        };

        Ok(Some(WhileStmt {
            token,
            condition,
            body,
        }))
    }

    /// Parses `{ ... }` starting at the `{`. Leaves the closing `}` (or Eof) as
    /// the current token.
    ///
    /// An unclosed block is still returned, with the error reported at its
    /// opening brace. A block past [`MAX_NESTING`] is skipped whole and yields
    /// `None`.
    fn parse_block(&mut self) -> Result<Option<Block>> {
        let token = self.current.clone();
        if self.depth == MAX_NESTING {
            self.error_at_current("block nested too deeply");
            self.skip_group(TokenKind::LBrace, TokenKind::RBrace)?;
            return Ok(None);
        }
        let mut statements = Vec::new();
        self.advance()?;

        self.depth += 1;
        while !self.current.is(TokenKind::RBrace) && !self.current.is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
            self.advance()?;
        }
        self.depth -= 1;

        if self.current.is(TokenKind::Eof) {
            self.record("expected '}' to close block", token.pos);
        }
        Ok(Some(Block { token, statements }))
    }

    /// Parses a primary followed by any number of `op primary` pairs, folding
    /// to the left. On return `current` is the last token of the expression.
    pub fn parse_expression(&mut self) -> Result<Option<Expr>> {
        let Some(mut left) = self.parse_primary()? else {
            return Ok(None);
        };

        while let Some(operator) = InfixOperator::from_token(self.peek.kind) {
            if self.operators == MAX_OPERATORS {
                self.error_at_peek("expression has too many operators");
                return Ok(None);
            }
            self.operators += 1;
            self.advance()?;
            let token = self.current.clone();
            self.advance()?;

            let Some(right) = self.parse_primary()? else {
                return Ok(None);
            };
            left = Expr::Infix(InfixExpr {
                token,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(Some(left))
    }

    fn parse_primary(&mut self) -> Result<Option<Expr>> {
        let token = self.current.clone();
        let expr = match token.kind {
            TokenKind::Ident => Expr::Identifier(Identifier {
                name: token.lexeme.clone(),
                token,
            }),
            TokenKind::Int => Expr::IntegerLiteral(IntegerLiteral {
                text: token.lexeme.clone(),
                token,
            }),
            TokenKind::String => Expr::StringLiteral(StringLiteral {
                text: token.lexeme.clone(),
                token,
            }),
            TokenKind::LParen => {
                if self.depth == MAX_NESTING {
                    self.error_at_current("expression nested too deeply");
                    self.skip_group(TokenKind::LParen, TokenKind::RParen)?;
                    return Ok(None);
                }
                self.advance()?;
                self.depth += 1;
                let inner = self.parse_expression()?;
                self.depth -= 1;
                let Some(inner) = inner else {
                    return Ok(None);
                };
                if self.peek.is(TokenKind::RParen) {
                    self.advance()?;
                } else {
                    self.error_at_peek("expected closing ')'");
                }
                return Ok(Some(inner));
            }
            _ => {
                let msg = format!("expected expression, found {}", describe(&token));
                self.error_at_current(msg);
                return Ok(None);
            }
        };
        Ok(Some(expr))
    }
}

fn describe(token: &Token) -> String {
    if token.is(TokenKind::Eof) {
        "end of input".to_string()
    } else {
        format!("'{}'", token.lexeme)
    }
}
