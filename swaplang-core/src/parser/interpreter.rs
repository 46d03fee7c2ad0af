//! Interpreter for executing programs
//!
//! Walks statements in order against a session environment. Printed lines are
//! collected for the host, which decides where they go.

use crate::parser::ast::{BinaryOp, Expr, Program, Statement};
use crate::parser::environment::Environment;
use crate::parser::error::{ArithmeticError, Error, EvalError};
use crate::parser::lexer::Lexer;
use crate::parser::parser::Parser;
use crate::parser::value::Value;

/// Deepest chain of nested evaluations before giving up
pub const MAX_EVAL_DEPTH: usize = 1000;

/// Tree-walking interpreter holding one session's environment
#[derive(Debug, Default)]
pub struct Interpreter {
    /// Variable bindings, shared with the lexer and parser of each run
    environment: Environment,
    /// Lines printed since the last `take_output`
    output: Vec<String>,
}

impl Interpreter {
    /// Create a new interpreter with an empty environment
    pub fn new() -> Self {
        Interpreter {
            environment: Environment::new(),
            output: Vec::new(),
        }
    }

    /// Create an interpreter over an existing environment
    pub fn with_environment(environment: Environment) -> Self {
        Interpreter {
            environment,
            output: Vec::new(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn into_environment(self) -> Environment {
        self.environment
    }

    /// Take printed lines (clears internal list)
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Lex, parse and run one translation unit against this session.
    ///
    /// Lines printed before a runtime fault remain available through
    /// [`Interpreter::take_output`].
    pub fn run_source(&mut self, source: &str) -> Result<(), Error> {
        let tokens = Lexer::new(source).tokenize(&mut self.environment)?;
        let program = Parser::new(tokens).parse_program(&mut self.environment)?;
        self.run_program(&program)?;
        Ok(())
    }

    /// Run a complete program, stopping at the first fault
    pub fn run_program(&mut self, program: &Program) -> Result<(), EvalError> {
        for stmt in &program.statements {
            self.execute(stmt)?;
        }
        Ok(())
    }

    /// Run a single statement
    pub fn execute(&mut self, stmt: &Statement) -> Result<(), EvalError> {
        match stmt {
            // Bound while parsing; nothing left to do
            Statement::Assign { .. } => Ok(()),

            Statement::Swap { first, second } => self.environment.swap(first, second),

            Statement::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.output.push(value.to_string());
                Ok(())
            }
        }
    }

    /// Evaluate an expression against the current bindings
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, EvalError> {
        self.eval_at(expr, 0)
    }

    fn eval_at(&self, expr: &Expr, depth: usize) -> Result<Value, EvalError> {
        if depth >= MAX_EVAL_DEPTH {
            return Err(EvalError::RecursionLimit {
                depth: MAX_EVAL_DEPTH,
            });
        }

        match expr {
            Expr::Integer(text) => Ok(Value::Numeral(text.clone())),

            // Re-evaluated on every read
            Expr::Identifier(name) => {
                let bound = self
                    .environment
                    .get(name)
                    .ok_or_else(|| EvalError::UnboundVariable { name: name.clone() })?;
                self.eval_at(bound, depth + 1)
            }

            Expr::Binary { op, left, right } => {
                let left = self.eval_at(left, depth + 1)?.to_integer()?;
                let right = self.eval_at(right, depth + 1)?.to_integer()?;
                Ok(apply(*op, left, right)?)
            }
        }
    }
}

fn apply(op: BinaryOp, left: i64, right: i64) -> Result<Value, ArithmeticError> {
    let integral = match op {
        BinaryOp::Add => left.checked_add(right),
        BinaryOp::Sub => left.checked_sub(right),
        BinaryOp::Mul => left.checked_mul(right),
        BinaryOp::Div => {
            if right == 0 {
                return Err(ArithmeticError::DivisionByZero);
            }
            return Ok(Value::Float(true_divide(left, right)));
        }
    };

    integral.map(Value::Integer).ok_or(ArithmeticError::Overflow)
}

/// Largest magnitude every `i64` up to which converts to `f64` exactly
const EXACT_FLOAT_INT: u64 = 1 << 53;

/// Quotient of two integers rounded once to the nearest `f64`.
///
/// `right` must be non-zero.
fn true_divide(left: i64, right: i64) -> f64 {
    let (n, d) = (left.unsigned_abs(), right.unsigned_abs());
    if n <= EXACT_FLOAT_INT && d <= EXACT_FLOAT_INT {
        return left as f64 / right as f64;
    }

    let negative = (left < 0) != (right < 0);
    if n == 0 {
        return if negative { -0.0 } else { 0.0 };
    }

    // Scale the numerator so the integer quotient carries at least 64 bits,
    // then fold any remainder into the lowest bit so the single rounding in
    // `as f64` breaks ties the same way the exact quotient would.
    let shift = (n as u128).leading_zeros();
    let scaled = (n as u128) << shift;
    let d = d as u128;
    let mut quotient = scaled / d;
    if scaled % d != 0 {
        quotient |= 1;
    }

    let magnitude = quotient as f64 / 2f64.powi(shift as i32);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Everything a finished run leaves behind
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub output: Vec<String>,
    pub environment: Environment,
}

/// Convenience function to run a source string in a fresh environment
pub fn interpret(source: &str) -> Result<Run, Error> {
    let mut interpreter = Interpreter::new();
    interpreter.run_source(source)?;

    Ok(Run {
        output: interpreter.take_output(),
        environment: interpreter.into_environment(),
    })
}
