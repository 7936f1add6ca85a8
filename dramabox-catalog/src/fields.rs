//! Lenient readers for loosely typed upstream fields.
//!
//! Upstream sends identifiers and counters as strings on some endpoints and
//! numbers on others, and flags as `0`/`1`, booleans or strings.

use serde_json::Value;

/// Reads a non-empty string, accepting numbers as their decimal text.
pub(crate) fn string_like(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a non-negative integer from a number or numeric string.
pub(crate) fn u32_like(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a float from a number or numeric string.
pub(crate) fn f64_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads an upstream flag: `true`, any non-zero number, `"1"` or `"true"`.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    }
}

/// Reads the first of `keys` present on `value` as a string.
pub(crate) fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| value.get(key).and_then(string_like))
}
