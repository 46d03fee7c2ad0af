//! # swaplang Core
//!
//! Lexer, parser and tree-walking interpreter for swaplang, a tiny imperative
//! language of assignments, `swap` and `print` over integer arithmetic.
//!
//! Variables are bound to *unevaluated* expressions: reading a variable
//! re-runs its definition against the current bindings.
//!
//! ## Features
//!
//! - **serde**: Serialize tokens, trees and environments
//! - **colored**: Colored diagnostics from [`parser::Error::render`]
//!
//! ## Example
//!
//! ```
//! use swaplang_core::interpret;
//!
//! let run = interpret("x = 4\ny = 2\nswap x y\nprint x - y").unwrap();
//! assert_eq!(run.output, vec!["-2"]);
//! ```

pub mod parser;

// Re-export commonly used types
pub use parser::{interpret, Environment, Error, Expr, Interpreter, Program, Run, Statement, Value};
