//! Values held on the execution stacks.
//!
//! A stack entry is either a signed arbitrary-range integer or an opaque
//! piece of text (pushed from the initial-stack header, produced by
//! concatenation, or tagged by the hash simulation). Numeric coercion is
//! the single conversion point every arithmetic opcode funnels through.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::interpreter::error::ExecError;

/// A single stack entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed arbitrary-range integer.
    Number(BigInt),
    /// Opaque text. Compares structurally; coerces to a number only if it
    /// parses as a numeric literal.
    Text(String),
}

impl Value {
    /// Build a number value from anything convertible to a `BigInt`.
    pub fn number(n: impl Into<BigInt>) -> Self {
        Value::Number(n.into())
    }

    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// The canonical boolean encoding: 1 for true, 0 for false.
    pub fn from_bool(v: bool) -> Self {
        Value::Number(BigInt::from(if v { 1 } else { 0 }))
    }

    /// Coerce to a number.
    ///
    /// `Text` is accepted only when it parses under the literal grammar
    /// (optional sign, decimal, `0x` hex, `0o` octal); anything else is
    /// `ExecError::NotANumber` rather than falsy-by-default.
    pub fn to_number(&self) -> Result<BigInt, ExecError> {
        match self {
            Value::Number(n) => Ok(n.clone()),
            Value::Text(s) => parse_number(s).ok_or_else(|| ExecError::NotANumber(s.clone())),
        }
    }

    /// A value is "zero" iff its numeric coercion equals 0.
    pub fn is_zero(&self) -> Result<bool, ExecError> {
        Ok(self.to_number()?.is_zero())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Parse a numeric literal: optional leading `-`, then decimal, `0x` hex,
/// or `0o` octal digits. Returns `None` for anything else.
pub fn parse_number(token: &str) -> Option<BigInt> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        BigInt::parse_bytes(hex.as_bytes(), 16)?
    } else if let Some(oct) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        BigInt::parse_bytes(oct.as_bytes(), 8)?
    } else {
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        BigInt::parse_bytes(body.as_bytes(), 10)?
    };
    Some(if negative { -magnitude } else { magnitude })
}
