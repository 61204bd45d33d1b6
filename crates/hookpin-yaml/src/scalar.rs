//! Scalar values, their lexical styles, and the plain-scalar coding rules.

use std::fmt;

/// A decoded scalar value.
///
/// Equality is over the decoded value only; the lexical presentation of a
/// parsed scalar lives in [`ScalarStyle`] and in the node's original lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// `null`, `~`, or an empty value.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Integer in decimal notation.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Any other scalar text.
    Str(String),
}

impl ScalarValue {
    /// Borrow the string content, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Consume into the string content, if this is a string scalar.
    pub fn into_string(self) -> Option<String> {
        match self {
            ScalarValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer content, if this is an integer scalar.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric content widened to `f64`, for integer or float scalars.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScalarValue::Float(f) => Some(*f),
            ScalarValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// True for the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("null"),
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Float(v) => {
                // keep a decimal point so the text re-decodes as a float
                if v.fract() == 0.0 && v.is_finite() {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            ScalarValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Str(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

/// Lexical presentation of a scalar in the source document.
///
/// Recorded for re-emission decisions only; two scalars with the same value
/// but different styles compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Unquoted.
    Plain,
    /// `'single quoted'`.
    SingleQuoted,
    /// `"double quoted"`.
    DoubleQuoted,
    /// `|` block scalar.
    Literal,
    /// `>` block scalar.
    Folded,
}

/// Decode a plain (unquoted) lexeme into a value per the YAML 1.2 core schema
/// subset: null/bool/int/float forms, everything else a string.
pub(crate) fn decode_plain(lexeme: &str) -> ScalarValue {
    match lexeme {
        "" | "~" | "null" | "Null" | "NULL" => return ScalarValue::Null,
        "true" | "True" | "TRUE" => return ScalarValue::Bool(true),
        "false" | "False" | "FALSE" => return ScalarValue::Bool(false),
        _ => {}
    }
    if looks_like_int(lexeme) {
        if let Ok(i) = lexeme.parse::<i64>() {
            return ScalarValue::Int(i);
        }
    }
    if looks_like_float(lexeme) {
        if let Ok(f) = lexeme.parse::<f64>() {
            return ScalarValue::Float(f);
        }
    }
    ScalarValue::Str(lexeme.to_string())
}

fn looks_like_int(s: &str) -> bool {
    let t = s.strip_prefix(['-', '+']).unwrap_or(s);
    !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit())
}

fn looks_like_float(s: &str) -> bool {
    let t = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (mantissa, exponent) = match t.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (t, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, frac)) => {
            (!whole.is_empty() || !frac.is_empty())
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => !mantissa.is_empty() && mantissa.bytes().all(|b| b.is_ascii_digit()),
    };
    let fractional = mantissa.contains('.') || exponent.is_some();
    let exponent_ok = exponent.is_none_or(looks_like_int);
    mantissa_ok && fractional && exponent_ok
}

/// Render a synthesized scalar: plain where the text allows it, double-quoted
/// otherwise.
pub(crate) fn render_scalar(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Str(s) => {
            if plain_safe(s) {
                s.clone()
            } else {
                quote_double(s)
            }
        }
        other => other.to_string(),
    }
}

/// Render a synthesized mapping key.
pub(crate) fn render_key(key: &str) -> String {
    if plain_safe(key) {
        key.to_string()
    } else {
        quote_double(key)
    }
}

fn plain_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if s != s.trim() {
        return false;
    }
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return false;
    }
    if s.chars().any(|c| {
        matches!(
            c,
            ',' | '[' | ']' | '{' | '}' | '\n' | '\r' | '\t' | '"' | '\''
        )
    }) {
        return false;
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return false;
    }
    // text that would re-decode as null/bool/number must be quoted to stay a string
    matches!(decode_plain(s), ScalarValue::Str(_))
}

fn quote_double(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
