//! Dotted-path access into a JSON property tree.

use crate::MsgError;
use serde_json::Value;

/// Resolves `path` inside `root`.
///
/// Segments are separated by `.`. A segment addresses an object key, or
/// an array index when the current node is an array. The empty path
/// returns `root` itself.
pub(crate) fn lookup<'a>(root: &'a Value, path: &str) -> Result<&'a Value, MsgError> {
    if path.is_empty() {
        return Ok(root);
    }

    let mut node = root;
    for segment in path.split('.') {
        node = match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
        .ok_or_else(|| MsgError::PropertyNotFound(path.to_string()))?;
    }
    Ok(node)
}

/// Serializes the subtree at `path` to compact JSON.
pub(crate) fn to_json(root: &Value, path: &str) -> Result<String, MsgError> {
    let node = lookup(root, path)?;
    serde_json::to_string(node).map_err(|e| MsgError::Serialize(e.to_string()))
}

/// Sets `value` at a top-level `key`, turning `root` into an object if needed.
pub(crate) fn insert(root: &mut Value, key: &str, value: Value) {
    if !root.is_object() {
        *root = Value::Object(serde_json::Map::new());
    }
    if let Value::Object(map) = root {
        map.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_path_is_root() {
        let v = json!({"a": 1});
        assert_eq!(lookup(&v, "").unwrap(), &v);
    }

    #[test]
    fn nested_object_and_array() {
        let v = json!({"a": {"b": [10, {"c": "x"}]}});
        assert_eq!(lookup(&v, "a.b.0").unwrap(), &json!(10));
        assert_eq!(lookup(&v, "a.b.1.c").unwrap(), &json!("x"));
    }

    #[test]
    fn missing_segment_errors() {
        let v = json!({"a": {"b": 1}});
        assert_eq!(
            lookup(&v, "a.c"),
            Err(MsgError::PropertyNotFound("a.c".into()))
        );
        assert!(lookup(&v, "a.b.c").is_err());
    }

    #[test]
    fn to_json_whole_tree() {
        let v = json!({"k": true});
        assert_eq!(to_json(&v, "").unwrap(), r#"{"k":true}"#);
    }

    #[test]
    fn insert_replaces_non_object_root() {
        let mut v = Value::Null;
        insert(&mut v, "k", json!(1));
        assert_eq!(v, json!({"k": 1}));
    }
}
