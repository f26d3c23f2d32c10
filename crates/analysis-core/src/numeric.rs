//! Safe numeric coercion shared by every loosely-typed input path.
//!
//! Provider records and CSV cells arrive as whatever the upstream source
//! produced: JSON numbers, numeric strings, empty strings, `"NaN"`, `null`.
//! These helpers map all of that onto `Option<f64>` so missing or garbage
//! values surface as absence rather than as an error or a fake zero.

use serde_json::Value;

/// Keep a value only if it is finite.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Parse a textual cell into a finite number.
/// Surrounding whitespace and thousands separators are ignored.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().and_then(finite)
}

/// Coerce a JSON value into a finite number, treating anything else as absent.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Coerce a JSON value into non-empty trimmed text.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}
