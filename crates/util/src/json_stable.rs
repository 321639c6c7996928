//! json-stable — deterministic JSON serialization with sorted object keys.
//!
//! Two values that are the same JSON document serialize to the same string
//! regardless of key insertion order or integer/float representation of
//! whole numbers. [`crate::is_equal`] compares these strings.

use serde_json::{Number, Value};

/// Largest integer magnitude a JSON number holds exactly (2^53).
const MAX_SAFE_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Serialize `value` to a deterministic JSON string with sorted object keys.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use widget_diff_util::json_stable::stringify;
///
/// assert_eq!(stringify(&json!({"b": 2, "a": [1.0, "x"]})), r#"{"a":[1,"x"],"b":2}"#);
/// ```
pub fn stringify(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, &obj[key.as_str()]);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    // Display on a string Value emits the escaped, quoted JSON literal.
    out.push_str(&Value::String(s.to_owned()).to_string());
}

/// Formats a number in its shortest form, printing whole floats as integers.
pub(crate) fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < MAX_SAFE_FLOAT_INT => {
            // Avoid "-0": JSON has a single zero for equality purposes.
            if f == 0.0 {
                "0".to_owned()
            } else {
                format!("{}", f as i64)
            }
        }
        _ => n.to_string(),
    }
}
