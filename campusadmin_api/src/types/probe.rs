//! Ordered lookups over loosely-typed JSON bodies.
//!
//! Backends disagree on where things live (`data.products` vs `products`) and
//! on what they are called (`total` vs `Count`). Every lookup here takes an
//! ordered list of candidates and returns the first one that is present and
//! not `null`.

use serde_json::Value;

/// Resolves a dotted path (`data.pagination.total`) against `value`.
///
/// An empty path is the value itself. Numeric segments index into arrays.
/// `null` counts as missing.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    if !path.is_empty() {
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Returns the value found at the first path that resolves.
pub fn first_path<'a, S: AsRef<str>>(value: &'a Value, paths: &[S]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(value, path.as_ref()))
}

/// Probes each container in order, and within a container each synonym key
/// in order, returning the first value that reads as a non-negative count.
pub fn probe_count(value: &Value, containers: &[&str], keys: &[&str]) -> Option<u64> {
    containers.iter().find_map(|container| {
        let map = lookup(value, container)?.as_object()?;
        keys.iter().find_map(|key| map.get(*key).and_then(as_count))
    })
}

/// Reads a JSON number or numeric string as a non-negative integer.
pub fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Renders a scalar for display or equality checks. Objects and arrays
/// render as compact JSON, `null` as an empty string.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lookup_walks_objects_and_arrays() {
        let body = json!({"data": {"items": [{"name": "first"}]}});
        assert_eq!(lookup(&body, "data.items.0.name"), Some(&json!("first")));
        assert_eq!(lookup(&body, ""), Some(&body));
        assert_eq!(lookup(&body, "data.missing"), None);
        assert_eq!(lookup(&body, "data.items.x"), None);
    }

    #[test]
    fn lookup_treats_null_as_missing() {
        let body = json!({"total": null});
        assert_eq!(lookup(&body, "total"), None);
    }

    #[test]
    fn first_path_respects_order() {
        let body = json!({"data": {"jobs": [1]}, "jobs": [1, 2]});
        assert_eq!(first_path(&body, &["data.jobs", "jobs"]), Some(&json!([1])));
        assert_eq!(first_path(&body, &["nope", "jobs"]), Some(&json!([1, 2])));
    }

    #[test]
    fn probe_count_prefers_earlier_containers_then_earlier_keys() {
        let body = json!({"count": 7, "meta": {"total": 9}});
        assert_eq!(probe_count(&body, &["", "meta"], &["total", "count"]), Some(7));
        assert_eq!(probe_count(&body, &["meta", ""], &["total", "count"]), Some(9));
    }

    #[test]
    fn probe_count_skips_non_numeric_values() {
        let body = json!({"total": "n/a", "count": "12"});
        assert_eq!(probe_count(&body, &[""], &["total", "count"]), Some(12));
    }

    #[test]
    fn as_count_accepts_integral_floats_only() {
        assert_eq!(as_count(&json!(3.0)), Some(3));
        assert_eq!(as_count(&json!(3.5)), None);
        assert_eq!(as_count(&json!(-1)), None);
        assert_eq!(as_count(&json!(true)), None);
    }

    #[test]
    fn scalar_text_formats() {
        assert_eq!(scalar_text(&json!("a")), "a");
        assert_eq!(scalar_text(&json!(4)), "4");
        assert_eq!(scalar_text(&json!(false)), "false");
        assert_eq!(scalar_text(&Value::Null), "");
    }
}
