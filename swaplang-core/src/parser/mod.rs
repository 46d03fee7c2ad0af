// swaplang-core/src/parser/mod.rs

pub mod ast;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{BinaryOp, Expr, Program, Statement};
pub use environment::Environment;
pub use error::{ArithmeticError, Error, EvalError, LexError, SyntaxError};
pub use interpreter::{interpret, Interpreter, Run, MAX_EVAL_DEPTH};
pub use lexer::{tokenize, Lexer, Span, Token, TokenKind};
pub use parser::{parse, parse_expression, Parser, MAX_EXPRESSION_DEPTH, MAX_NESTING_DEPTH};
pub use value::Value;
