use crate::parser::lexer::TokenKind;
use std::fmt;

// ============================================================================
// Program and Statement AST
// ============================================================================

/// A program is the ordered list of top-level statements of one translation unit
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            statements: Vec::new(),
        }
    }

    pub fn push(&mut self, stmt: Statement) {
        self.statements.push(stmt);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Top-level statements. The variant is the statement's leading marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// Variable assignment: x = 1 + 2
    Assign { name: String, value: Expr },

    /// Exchange two bindings: swap x y
    Swap { first: String, second: String },

    /// Print an expression: print x * 2
    Print(Expr),
}

impl Statement {
    /// Kind and spelling of the marker this statement is dispatched on
    pub fn marker(&self) -> (TokenKind, Option<&'static str>) {
        match self {
            Statement::Assign { .. } => (TokenKind::Assign, None),
            Statement::Swap { .. } => (TokenKind::Keyword, Some("SWAP")),
            Statement::Print(_) => (TokenKind::Keyword, Some("PRINT")),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign { name, value } => write!(f, "{} = {}", name, value),
            Statement::Swap { first, second } => write!(f, "swap {} {}", first, second),
            Statement::Print(expr) => write!(f, "print {}", expr),
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Map an operator token kind to its operator
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Multiply => Some(BinaryOp::Mul),
            TokenKind::Divide => Some(BinaryOp::Div),
            _ => None,
        }
    }

    /// Binding strength: multiplicative operators bind tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        };
        write!(f, "{}", symbol)
    }
}

/// Expression trees. Environment bindings hold these unevaluated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// Integer literal, kept as its source text: 42, 007
    Integer(String),

    /// Variable reference: x
    Identifier(String),

    /// Binary arithmetic: a + b, a / b
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Helper constructor for integer literals
    pub fn integer(text: impl Into<String>) -> Self {
        Expr::Integer(text.into())
    }

    /// Helper constructor for variable references
    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    /// Helper constructor for binary expressions
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Write `child` as an operand of `parent`, adding parentheses only where
    /// the tree shape would otherwise be lost
    fn fmt_operand(
        f: &mut fmt::Formatter<'_>,
        child: &Expr,
        parent: BinaryOp,
        is_right: bool,
    ) -> fmt::Result {
        let needs_parens = match child {
            Expr::Binary { op, .. } => {
                op.precedence() < parent.precedence()
                    || (is_right && op.precedence() == parent.precedence())
            }
            _ => false,
        };

        if needs_parens {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Integer(text) => write!(f, "{}", text),
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Binary { op, left, right } => {
                Expr::fmt_operand(f, left, *op, false)?;
                write!(f, " {} ", op)?;
                Expr::fmt_operand(f, right, *op, true)
            }
        }
    }
}
