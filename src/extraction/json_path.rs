//! JSON path resolution.
//!
//! Resolves dot-notation paths like "odometer.start" to values in JSON.

use serde_json::Value;

/// Resolve a dot-notation path to a value in JSON.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use mileage_forensics::extraction::resolve_json_path;
/// let data = json!({"odometer": {"start": 18250}});
/// let value = resolve_json_path(&data, "odometer.start");
/// assert_eq!(value, Some(&json!(18250)));
/// ```
pub fn resolve_json_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(data);
    }

    let mut current = data;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Convert a JSON value to a plain string (ids and codes may arrive as numbers).
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(), // Arrays and objects as JSON strings
    }
}

/// Convert a JSON value to a float if possible.
pub fn value_to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_path() {
        let data = json!({"status": "completed"});
        assert_eq!(resolve_json_path(&data, "status"), Some(&json!("completed")));
    }

    #[test]
    fn test_nested_path() {
        let data = json!({
            "odometer": {
                "start": 18250,
                "end": 18410.5
            }
        });
        assert_eq!(resolve_json_path(&data, "odometer.end"), Some(&json!(18410.5)));
    }

    #[test]
    fn test_arrays_are_not_traversed() {
        let data = json!({"readings": [{"value": 100}, {"value": 250}]});
        assert_eq!(resolve_json_path(&data, "readings.1.value"), None);
        assert_eq!(resolve_json_path(&data, "readings"), Some(&data["readings"]));
    }

    #[test]
    fn test_missing_path() {
        let data = json!({"status": "completed"});
        assert_eq!(resolve_json_path(&data, "missing"), None);
        assert_eq!(resolve_json_path(&data, "status.nested"), None);
    }

    #[test]
    fn test_empty_path() {
        let data = json!({"status": "completed"});
        assert_eq!(resolve_json_path(&data, ""), Some(&data));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(value_to_float(&json!(1.5)), Some(1.5));
        assert_eq!(value_to_float(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(value_to_float(&json!("n/a")), None);
        assert_eq!(value_to_float(&json!(null)), None);
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!("BK-1")), "BK-1");
        assert_eq!(value_to_string(&json!(null)), "");
    }
}
