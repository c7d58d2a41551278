// src/utils/value.rs

//! Loose readings of query index values.
//!
//! Query index documents are authored in spreadsheets, so every field may
//! arrive as a string, a number or not at all. These helpers give the
//! falsiness and integer readings the blocks rely on.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid leading integer regex"));

/// Whether a value counts as "set": not null, not `false`, not `0`, not `""`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Integer reading of a value: leading digits of a string, truncated number.
///
/// Returns `None` where no integer can be read (e.g. `"abc"`, `true`).
pub fn leading_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Integer reading of a string: optional sign followed by digits.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    LEADING_INT
        .captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// String content of a value, if it is a string.
pub fn as_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

/// Display text for a scalar value.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
