//! Cell Value Formatter Module
//!
//! This module renders report cell values (`serde_json::Value`) in a compact,
//! display-friendly format. The formatting is optimized for:
//!
//! - **Compactness**: Minimizes unnecessary whitespace and verbose labels
//! - **Readability**: Uses familiar Cypher-like syntax for nested records
//! - **Stable widths**: The same value always renders to the same string, so
//!   column-width tracking in layout sinks stays deterministic
//!
//! ## Examples
//!
//! - Scalar: `42`, `3.14`, `John Doe`
//! - Nested record: `{name: "John", age: 25}`
//! - List: `[1, 2, 3]`

use serde_json::Value;

/// Renders a cell value for display. Top-level strings are unquoted; nested
/// structures use the compact record syntax. Null renders as `null`.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        other => compact_value(other),
    }
}

/// Converts a raw row value to its "safe" pipeline representation:
/// null becomes the empty string, numbers stay numeric, everything else is
/// reduced to its display string.
pub fn safe_value(value: Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Number(n) => Value::Number(n),
        Value::String(s) => Value::String(s),
        other => Value::String(compact_value(&other)),
    }
}

/// Formats a single value in a readable, compact format. Strings are quoted
/// here so nested records remain unambiguous.
fn compact_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::Array(arr) => {
            let elements: Vec<String> = arr.iter().map(compact_value).collect();
            format!("[{}]", elements.join(", "))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, compact_value(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}
