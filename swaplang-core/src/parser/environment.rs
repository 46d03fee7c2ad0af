//! Environment for variable bindings
//!
//! Maps each variable name to the *unevaluated* expression it was last
//! assigned. Reading a variable re-evaluates that expression against the
//! current bindings, so `y = x` keeps following `x` after `x` is reassigned.
//!
//! Names are kept in first-declaration order so dumps are deterministic.

use crate::parser::ast::Expr;
use crate::parser::error::EvalError;
use std::collections::HashMap;
use std::fmt;

/// Single global scope of name → expression bindings
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Environment {
    /// Declaration order of every known name
    order: Vec<String>,
    /// `None` until the name is first assigned
    bindings: HashMap<String, Option<Expr>>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Environment {
            order: Vec::new(),
            bindings: HashMap::new(),
        }
    }

    /// Forget every name and binding
    pub fn clear(&mut self) {
        self.order.clear();
        self.bindings.clear();
    }

    /// Make `name` known without binding it. Existing bindings are untouched.
    pub fn declare(&mut self, name: &str) {
        if !self.bindings.contains_key(name) {
            self.order.push(name.to_string());
            self.bindings.insert(name.to_string(), None);
        }
    }

    /// Bind `name` to an expression, declaring it if needed
    pub fn bind(&mut self, name: &str, expr: Expr) {
        self.declare(name);
        self.bindings.insert(name.to_string(), Some(expr));
    }

    /// Expression currently bound to `name`, if any
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.bindings.get(name).and_then(Option::as_ref)
    }

    /// Check if a name has been declared (bound or not)
    pub fn is_declared(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Check if a name currently has an expression bound
    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Exchange the bindings of two declared names.
    ///
    /// The expressions move as they are, so references inside them keep
    /// pointing at the same variables after the swap.
    pub fn swap(&mut self, first: &str, second: &str) -> Result<(), EvalError> {
        for name in [first, second] {
            if !self.is_declared(name) {
                return Err(EvalError::UnboundVariable {
                    name: name.to_string(),
                });
            }
        }

        if first == second {
            return Ok(());
        }

        let first_expr = self.bindings.insert(first.to_string(), None).flatten();
        let second_expr = self.bindings.insert(second.to_string(), first_expr).flatten();
        self.bindings.insert(first.to_string(), second_expr);
        Ok(())
    }

    /// All bindings in declaration order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, Option<&Expr>)> + '_ {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.get(name)))
    }

    /// Number of declared names
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One `name = expr` line per declared name
impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, expr)) in self.bindings().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match expr {
                Some(expr) => write!(f, "{} = {}", name, expr)?,
                None => write!(f, "{} = <unbound>", name)?,
            }
        }
        Ok(())
    }
}
