//! AST (abstract syntax tree) types for the Ferment language.
//!
//! The tree is strictly owned: a [`Program`] owns its statements, statements own
//! their sub-expressions and blocks, nothing is shared. Every node keeps the
//! token that introduced it.
//!
//! `Display` renders the tree back to canonical Ferment source. Infix
//! expressions are always parenthesized, so `a + b * c` renders as
//! `((a + b) * c)`.

use std::fmt;
use std::mem;

use serde::Serialize;

use crate::token::{Position, Token, TokenKind};

const INDENT: &str = "    ";

/// A variable name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

/// An integer literal, kept as its decimal source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegerLiteral {
    pub token: Token,
    pub text: String,
}

/// A string literal, kept as the raw text between its quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub token: Token,
    pub text: String,
}

/// Binary operators. All share one precedence level and group to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    LessThan,
    GreaterThan,
}

impl InfixOperator {
    /// The operator a token stands for when it appears between two operands.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(InfixOperator::Add),
            TokenKind::Minus => Some(InfixOperator::Subtract),
            TokenKind::Asterisk => Some(InfixOperator::Multiply),
            TokenKind::Slash => Some(InfixOperator::Divide),
            TokenKind::Lt => Some(InfixOperator::LessThan),
            TokenKind::Gt => Some(InfixOperator::GreaterThan),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::LessThan => "<",
            InfixOperator::GreaterThan => ">",
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `left operator right`; `token` is the operator token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfixExpr {
    pub token: Token,
    pub left: Box<Expr>,
    pub operator: InfixOperator,
    pub right: Box<Expr>,
}

// Operator chains grow down the left operand, so the derived drop would
// recurse once per operator. Nested infix operands are moved onto a worklist
// and freed one at a time instead.
impl Drop for InfixExpr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_operands(self, &mut pending);
        while let Some(mut expr) = pending.pop() {
            if let Expr::Infix(infix) = &mut expr {
                detach_operands(infix, &mut pending);
            }
        }
    }
}

fn detach_operands(infix: &mut InfixExpr, pending: &mut Vec<Expr>) {
    for operand in [&mut infix.left, &mut infix.right] {
        if matches!(**operand, Expr::Infix(_)) {
            pending.push(mem::replace(&mut **operand, Expr::vacant()));
        }
    }
}

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Identifier(Identifier),
    IntegerLiteral(IntegerLiteral),
    StringLiteral(StringLiteral),
    Infix(InfixExpr),
}

impl Expr {
    /// The token that introduced this expression.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(e) => &e.token,
            Expr::IntegerLiteral(e) => &e.token,
            Expr::StringLiteral(e) => &e.token,
            Expr::Infix(e) => &e.token,
        }
    }

    pub fn position(&self) -> Position {
        self.token().pos
    }

    fn vacant() -> Self {
        Expr::Identifier(Identifier {
            token: Token::eof(Position::default()),
            name: String::new(),
        })
    }
}

/// `postavi name = value;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetStmt {
    pub token: Token,
    pub name: Identifier,
    pub value: Expr,
}

/// `vrati value;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    pub token: Token,
    pub value: Expr,
}

/// `ako (condition) { ... } inace { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub token: Token,
    pub condition: Expr,
    pub consequence: Block,
    /// Present only when `inace` followed the consequence block.
    pub alternative: Option<Block>,
}

/// `dok condition { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStmt {
    pub token: Token,
    pub condition: Expr,
    pub body: Block,
}

/// `ispisi value;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintStmt {
    pub token: Token,
    pub value: Expr,
}

/// A braced statement list; `token` is the opening `{`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

/// Statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Let(LetStmt),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    Print(PrintStmt),
    Block(Block),
}

impl Stmt {
    /// The token that introduced this statement.
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Let(s) => &s.token,
            Stmt::Return(s) => &s.token,
            Stmt::If(s) => &s.token,
            Stmt::While(s) => &s.token,
            Stmt::Print(s) => &s.token,
            Stmt::Block(s) => &s.token,
        }
    }

    pub fn position(&self) -> Position {
        self.token().pos
    }
}

/// Entire program: the ordered top-level statements.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Lexeme of the first statement's token, or `""` for an empty program.
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|s| s.token().lexeme.as_str())
            .unwrap_or("")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(id) => f.write_str(&id.name),
            Expr::IntegerLiteral(lit) => f.write_str(&lit.text),
            Expr::StringLiteral(lit) => write!(f, "\"{}\"", lit.text),
            Expr::Infix(infix) => {
                // Walk the left spine in a loop; right operands are only
                // nested through parentheses.
                let mut spine = vec![infix];
                let mut leftmost = &*infix.left;
                while let Expr::Infix(inner) = leftmost {
                    spine.push(inner);
                    leftmost = &*inner.left;
                }
                for _ in 0..spine.len() {
                    f.write_str("(")?;
                }
                write!(f, "{}", leftmost)?;
                for node in spine.iter().rev() {
                    write!(f, " {} {})", node.operator, node.right)?;
                }
                Ok(())
            }
        }
    }
}

// Conditions always render inside one pair of parentheses.
fn write_condition(f: &mut fmt::Formatter<'_>, cond: &Expr) -> fmt::Result {
    match cond {
        Expr::Infix(_) => write!(f, "{}", cond),
        _ => write!(f, "({})", cond),
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    f.write_str("{\n")?;
    for stmt in &block.statements {
        write_stmt(f, stmt, depth + 1)?;
    }
    write!(f, "{}}}", INDENT.repeat(depth))
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    f.write_str(&INDENT.repeat(depth))?;
    match stmt {
        Stmt::Let(s) => write!(f, "postavi {} = {};", s.name.name, s.value)?,
        Stmt::Return(s) => write!(f, "vrati {};", s.value)?,
        Stmt::Print(s) => write!(f, "ispisi {};", s.value)?,
        Stmt::If(s) => {
            f.write_str("ako ")?;
            write_condition(f, &s.condition)?;
            f.write_str(" ")?;
            write_block(f, &s.consequence, depth)?;
            if let Some(alt) = &s.alternative {
                f.write_str(" inace ")?;
                write_block(f, alt, depth)?;
            }
        }
        Stmt::While(s) => {
            f.write_str("dok ")?;
            write_condition(f, &s.condition)?;
            f.write_str(" ")?;
            write_block(f, &s.body, depth)?;
        }
        Stmt::Block(b) => write_block(f, b, depth)?,
    }
    f.write_str("\n")
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write_stmt(f, stmt, 0)?;
        }
        Ok(())
    }
}
