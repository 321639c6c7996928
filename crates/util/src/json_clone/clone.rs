use serde_json::{Map, Value};

/// Creates a structurally independent copy of a JSON value.
///
/// Every nested array and object is rebuilt, so mutating the copy can never
/// be observed through the original. Snapshots taken by the diff tracker go
/// through this function.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use widget_diff_util::json_clone::deep_clone;
///
/// let original = json!({"tags": ["foo", "bar"]});
/// let mut copy = deep_clone(&original);
/// copy["tags"][0] = json!("baz");
///
/// assert_eq!(original["tags"][0], json!("foo"));
/// ```
pub fn deep_clone(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(deep_clone).collect()),
        Value::Object(obj) => Value::Object(deep_clone_object(obj)),
        scalar => scalar.clone(),
    }
}

/// Deep-clones a JSON object, e.g. an entity snapshot.
pub fn deep_clone_object(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .map(|(key, val)| (key.clone(), deep_clone(val)))
        .collect()
}
