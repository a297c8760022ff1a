//! Resolved cell values.
//!
//! Every evaluation produces a [`Value`]: a number, passthrough text, or one
//! of the fixed [`Sentinel`] error tokens. Failures are never raised.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::format::format_number;

/// In-band error tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentinel {
    /// The cell depends on itself, directly or transitively.
    Circular,
    /// The substituted expression contains characters outside the numeric grammar.
    Name,
    /// The arithmetic evaluator failed or produced a non-finite number.
    Eval,
}

impl Sentinel {
    pub fn token(self) -> &'static str {
        match self {
            Sentinel::Circular => "#CIRC!",
            Sentinel::Name => "#NAME?",
            Sentinel::Eval => "#ERROR!",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The value of a cell after evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(Sentinel),
}

impl Value {
    /// Missing cells resolve to empty text.
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            Value::Error(s) => Some(*s),
            _ => None,
        }
    }

    /// Numeric reading used by range sums and reference substitution.
    ///
    /// Text is read by its leading decimal number, so `"12kg"` reads as 12
    /// and `"x"` reads as nothing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => leading_number(s),
            Value::Error(_) => None,
        }
    }

    /// Text shown to the user.
    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Error(s) => s.token().to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Sentinel> for Value {
    fn from(s: Sentinel) -> Self {
        Value::Error(s)
    }
}

/// Parse the longest decimal number prefix of `text`, after leading whitespace.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    if let Some(m) = number_prefix_re().find(text) {
        return m.as_str().parse::<f64>().ok();
    }
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if rest.starts_with("Infinity") {
        Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        })
    } else {
        None
    }
}

fn number_prefix_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("number prefix regex must compile")
    })
}
