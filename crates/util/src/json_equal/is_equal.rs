use std::borrow::Cow;

use serde_json::Value;

use crate::json_stable::{format_number, stringify};

/// Returns the string a value sorts by under default array ordering.
///
/// Strings sort as themselves, numbers by their shortest textual form,
/// nested arrays by their comma-joined elements (nulls render empty) and
/// every object as `[object Object]`. The last rule means arrays of objects
/// never reorder.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use widget_diff_util::json_equal::sort_key;
///
/// assert_eq!(sort_key(&json!(10)), "10");
/// assert_eq!(sort_key(&json!([1, null, "a"])), "1,,a");
/// assert_eq!(sort_key(&json!({"id": 1})), "[object Object]");
/// ```
pub fn sort_key(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => sort_key(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

/// Normalizes a possibly-missing value for array-aware comparison.
///
/// - missing (`None`) becomes an empty array;
/// - an array becomes a sorted shallow copy (stable, ordered by
///   [`sort_key`] compared as UTF-16 code units, so `[10, 9]` stays put);
/// - anything else is returned unchanged.
///
/// Sorting is only meaningful for arrays of strings and numbers. Arrays of
/// objects keep their original order and therefore compare order-sensitively.
pub fn normalize_array(value: Option<&Value>) -> Cow<'_, Value> {
    match value {
        None => Cow::Owned(Value::Array(Vec::new())),
        Some(Value::Array(items)) => {
            let mut keyed: Vec<(Vec<u16>, &Value)> = items
                .iter()
                .map(|item| (sort_key(item).encode_utf16().collect(), item))
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            Cow::Owned(Value::Array(
                keyed.into_iter().map(|(_, item)| item.clone()).collect(),
            ))
        }
        Some(other) => Cow::Borrowed(other),
    }
}

/// Field equality rule used by the diff tracker.
///
/// `None` stands for a missing value. When either side is missing or an
/// array, both sides go through [`normalize_array`] first; the results are
/// then compared by their stable serialized form. Consequently a missing
/// value equals `[]`, and arrays of primitives are equal regardless of
/// element order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use widget_diff_util::json_equal::is_equal;
///
/// assert!(is_equal(None, Some(&json!([]))));
/// assert!(is_equal(Some(&json!(["b", "a"])), Some(&json!(["a", "b"]))));
/// assert!(!is_equal(None, Some(&json!(""))));
/// ```
pub fn is_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) if !x.is_array() && !y.is_array() => stringify(x) == stringify(y),
        _ => stringify(&normalize_array(a)) == stringify(&normalize_array(b)),
    }
}
