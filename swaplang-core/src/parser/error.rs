//! Faults raised by the lexer, parser and interpreter.
//!
//! Every stage fails fast: the first fault aborts the translation unit and is
//! handed to the host as an [`Error`].

use crate::parser::lexer::{Span, Token};
use std::fmt;

#[cfg(feature = "colored")]
use colored::Colorize;

/// A character that belongs to none of the recognized classes.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub character: char,
    pub span: Span,
}

impl LexError {
    pub fn new(character: char, span: Span) -> Self {
        Self { character, span }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown character '{}' at {}",
            self.character.escape_debug(),
            self.span
        )
    }
}

impl std::error::Error for LexError {}

/// The token sequence does not match the grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// A token that cannot start or continue the current rule.
    UnexpectedToken { token: Token, expected: &'static str },
    /// A parenthesized expression was not closed.
    ExpectedClosingParen { span: Span },
    /// The rule needed another token but the input ended.
    UnexpectedEndOfInput { expected: &'static str },
    /// Parentheses or operator chains nested deeper than the parser accepts.
    NestingTooDeep { span: Span },
}

impl SyntaxError {
    /// Where the fault was detected, if it points at a token.
    pub fn span(&self) -> Option<Span> {
        match self {
            SyntaxError::UnexpectedToken { token, .. } => Some(token.span),
            SyntaxError::ExpectedClosingParen { span } | SyntaxError::NestingTooDeep { span } => {
                Some(*span)
            }
            SyntaxError::UnexpectedEndOfInput { .. } => None,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedToken { token, expected } => write!(
                f,
                "Unexpected token {} at {}, expected {}",
                token, token.span, expected
            ),
            SyntaxError::ExpectedClosingParen { span } => {
                write!(f, "Expected closing parenthesis at {}", span)
            }
            SyntaxError::UnexpectedEndOfInput { expected } => {
                write!(f, "Unexpected end of input, expected {}", expected)
            }
            SyntaxError::NestingTooDeep { span } => {
                write!(f, "Expression nested too deeply at {}", span)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Failures of the numeric operators.
#[derive(Debug, Clone, PartialEq)]
pub enum ArithmeticError {
    DivisionByZero,
    /// An operand that could not be read as a base-10 integer.
    NotANumber(String),
    /// An operand or result outside the 64-bit integer range.
    Overflow,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticError::DivisionByZero => write!(f, "Division by zero"),
            ArithmeticError::NotANumber(text) => write!(f, "'{}' is not a number", text),
            ArithmeticError::Overflow => write!(f, "Integer overflow"),
        }
    }
}

impl std::error::Error for ArithmeticError {}

/// Faults raised while walking the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable read before any assignment reached it.
    UnboundVariable { name: String },
    Arithmetic(ArithmeticError),
    /// Operator nesting plus variable lookups went past the depth limit,
    /// usually because of a self-referential definition.
    RecursionLimit { depth: usize },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundVariable { name } => {
                write!(f, "Variable '{}' has no value", name)
            }
            EvalError::Arithmetic(err) => write!(f, "Arithmetic error: {}", err),
            EvalError::RecursionLimit { depth } => write!(
                f,
                "Evaluation exceeded {} levels of nested operators and variable lookups (is a variable defined in terms of itself?)",
                depth
            ),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Arithmetic(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArithmeticError> for EvalError {
    fn from(err: ArithmeticError) -> Self {
        EvalError::Arithmetic(err)
    }
}

/// Any fault that aborts a translation unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Syntax(SyntaxError),
    Eval(EvalError),
}

impl Error {
    /// Source location of the fault, when one is known.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lex(err) => Some(err.span),
            Error::Syntax(err) => err.span(),
            Error::Eval(_) => None,
        }
    }

    /// Short label naming the stage that failed.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Lex(_) => "Lex error",
            Error::Syntax(_) => "Syntax error",
            Error::Eval(_) => "Runtime error",
        }
    }

    /// Render the fault together with the offending source line and a caret.
    ///
    /// Faults without a location render as the bare message.
    pub fn render(&self, source: &str) -> String {
        let header = format!("{}: {}", self.kind(), self);

        let Some(span) = self.span() else {
            return paint_header(header);
        };
        let Some(line) = source.lines().nth(span.line.saturating_sub(1)) else {
            return paint_header(header);
        };

        let gutter = span.line.to_string();
        let padding = " ".repeat(gutter.len());
        // Tabs in the line prefix are repeated so the caret lines up when echoed
        let indent: String = line
            .chars()
            .take(span.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let caret = format!("{}^", indent);

        format!(
            "{}\n{} |\n{} | {}\n{} | {}",
            paint_header(header),
            padding,
            gutter,
            line,
            padding,
            paint_caret(caret)
        )
    }
}

#[cfg(feature = "colored")]
fn paint_header(header: String) -> String {
    header.bright_red().bold().to_string()
}

#[cfg(not(feature = "colored"))]
fn paint_header(header: String) -> String {
    header
}

#[cfg(feature = "colored")]
fn paint_caret(caret: String) -> String {
    caret.bright_yellow().to_string()
}

#[cfg(not(feature = "colored"))]
fn paint_caret(caret: String) -> String {
    caret
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(err) => write!(f, "{}", err),
            Error::Syntax(err) => write!(f, "{}", err),
            Error::Eval(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(err) => Some(err),
            Error::Syntax(err) => Some(err),
            Error::Eval(err) => Some(err),
        }
    }
}

impl From<LexError> for Error {
    fn from(err: LexError) -> Self {
        Error::Lex(err)
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Syntax(err)
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        Error::Eval(err)
    }
}

impl From<ArithmeticError> for Error {
    fn from(err: ArithmeticError) -> Self {
        Error::Eval(EvalError::Arithmetic(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_points_at_column() {
        colored_off();
        let err = Error::Lex(LexError::new('@', Span::new(2, 5)));
        let rendered = err.render("x = 4\ny = @\n");

        assert!(rendered.starts_with("Lex error: Unknown character '@' at 2:5"));
        assert!(rendered.contains("2 | y = @"));
        assert!(rendered.ends_with("  |     ^"));
    }

    #[test]
    fn test_render_keeps_tabs_before_caret() {
        colored_off();
        let err = Error::Lex(LexError::new('$', Span::new(1, 7)));
        let rendered = err.render("\tx = \t$");

        assert!(rendered.contains("1 | \tx = \t$"));
        assert!(rendered.ends_with("  | \t    \t^"));
    }

    #[test]
    fn test_recursion_limit_message() {
        let err = EvalError::RecursionLimit { depth: 1000 };
        let message = err.to_string();

        assert!(message.contains("1000 levels of nested operators and variable lookups"));
    }

    #[test]
    fn test_render_without_span_is_message_only() {
        colored_off();
        let err = Error::from(ArithmeticError::DivisionByZero);
        assert_eq!(
            err.render("print 1 / 0"),
            "Runtime error: Arithmetic error: Division by zero"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = Error::from(ArithmeticError::Overflow);
        let eval = err.source().unwrap();
        assert_eq!(eval.to_string(), "Arithmetic error: Integer overflow");
        assert_eq!(eval.source().unwrap().to_string(), "Integer overflow");
    }

    #[test]
    fn test_end_of_input_has_no_span() {
        let err = SyntaxError::UnexpectedEndOfInput {
            expected: "expression",
        };
        assert_eq!(err.span(), None);
        assert_eq!(
            err.to_string(),
            "Unexpected end of input, expected expression"
        );
    }

    fn colored_off() {
        #[cfg(feature = "colored")]
        colored::control::set_override(false);
    }
}
