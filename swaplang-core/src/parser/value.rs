//! Runtime values.
//!
//! Literals stay text until an operator forces them into integers. `+ - *`
//! stay integral and `/` always produces a float.

use crate::parser::error::ArithmeticError;
use std::fmt;

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Literal text of an integer leaf, returned untouched
    Numeral(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    /// Force this value into an integer operand.
    ///
    /// Numerals are parsed base 10 and floats are truncated toward zero.
    pub fn to_integer(&self) -> Result<i64, ArithmeticError> {
        match self {
            Value::Numeral(text) => text.parse::<i64>().map_err(|_| {
                if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                    ArithmeticError::Overflow
                } else {
                    ArithmeticError::NotANumber(text.clone())
                }
            }),
            Value::Integer(n) => Ok(*n),
            Value::Float(x) => {
                if !x.is_finite() {
                    return Err(ArithmeticError::NotANumber(format_float(*x)));
                }
                let truncated = x.trunc();
                if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                    return Err(ArithmeticError::Overflow);
                }
                Ok(truncated as i64)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeral(text) => write!(f, "{}", text),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

/// Shortest round-trip text for a float, always with a fractional part
/// (`3.0`, `3.5`) and in exponent form outside `[1e-4, 1e16)`.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", x);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    if x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}
