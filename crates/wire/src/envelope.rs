//! Response envelope handling.
//!
//! The backend is inconsistent about how it wraps payloads. A list endpoint may answer with
//! any of:
//!
//! ```text
//! [ {...}, {...} ]
//! { "data": [ {...} ] }
//! { "data": { "items": [ {...} ] } }
//! { "success": true, "emergencyBeds": [ {...} ] }
//! ```
//!
//! The functions here dig the payload out without ever failing. A body that does not contain
//! anything recognisable yields an empty collection (or `None` / `0`).

use serde_json::{Map, Value};

/// Wrapper keys checked, in order, before any resource-specific key.
pub const DEFAULT_ENVELOPE_KEYS: &[&str] = &[
    "data", "Data", "items", "Items", "results", "Results", "records", "Records",
];

/// Keys that carry a count in dashboard responses.
const COUNT_KEYS: &[&str] = &[
    "count",
    "Count",
    "total",
    "Total",
    "totalCount",
    "TotalCount",
    "value",
    "Value",
];

/// Maximum nesting of wrapper objects that will be searched.
const MAX_DEPTH: usize = 3;

/// Extracts the record array from a list response.
///
/// # Arguments
///
/// * `body` - Parsed JSON response body of unknown shape
/// * `resource_keys` - Resource-specific wrapper keys (e.g. `"emergencyBeds"`), checked after
///   [`DEFAULT_ENVELOPE_KEYS`]
///
/// # Returns
///
/// The elements of the first array found, in this order:
/// 1. the body itself if it is an array,
/// 2. an array under a prioritised key (an object under such a key is searched recursively),
/// 3. the first array-valued property in document order.
///
/// Otherwise an empty vector.
pub fn extract_records<'a>(body: &'a Value, resource_keys: &[&str]) -> Vec<&'a Value> {
    find_array(body, resource_keys, 0)
        .map(|items| items.iter().collect())
        .unwrap_or_default()
}

fn find_array<'a>(body: &'a Value, resource_keys: &[&str], depth: usize) -> Option<&'a Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(map) if depth <= MAX_DEPTH => {
            let prioritised = DEFAULT_ENVELOPE_KEYS.iter().chain(resource_keys.iter());

            for key in prioritised.clone() {
                if let Some(Value::Array(items)) = map.get(*key) {
                    return Some(items);
                }
            }

            for key in prioritised {
                if let Some(nested @ Value::Object(_)) = map.get(*key) {
                    if let Some(items) = find_array(nested, resource_keys, depth + 1) {
                        return Some(items);
                    }
                }
            }

            let detected = map.iter().find_map(|(key, value)| match value {
                Value::Array(items) => Some((key, items)),
                _ => None,
            });
            if let Some((key, items)) = detected {
                tracing::debug!(key = %key, "auto-detected record array");
                return Some(items);
            }
            None
        }
        _ => None,
    }
}

/// Extracts a single record object from a response.
///
/// Returns the innermost object reached by following `data` wrappers, or the body itself when
/// it is an object without one. A one-element array is unwrapped as well.
pub fn extract_record(body: &Value) -> Option<&Map<String, Value>> {
    let mut current = body;
    for _ in 0..=MAX_DEPTH {
        match current {
            Value::Object(map) => match map.get("data").or_else(|| map.get("Data")) {
                Some(inner @ (Value::Object(_) | Value::Array(_))) => current = inner,
                _ => return Some(map),
            },
            Value::Array(items) if items.len() == 1 => current = &items[0],
            _ => return None,
        }
    }
    current.as_object()
}

/// Extracts a count from a dashboard response.
///
/// Accepts a bare number, a numeric string, a known count key, a `data` wrapper, or as a last
/// resort the first numeric property. Negative or unreadable values give `0`.
pub fn extract_count(body: &Value) -> u64 {
    count_at(body, 0).unwrap_or(0)
}

fn count_at(body: &Value, depth: usize) -> Option<u64> {
    match body {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Object(map) if depth <= MAX_DEPTH => {
            for key in COUNT_KEYS {
                if let Some(n) = map.get(*key).and_then(|v| count_at(v, depth + 1)) {
                    return Some(n);
                }
            }
            for key in ["data", "Data"] {
                if let Some(n) = map.get(key).and_then(|v| count_at(v, depth + 1)) {
                    return Some(n);
                }
            }
            let numeric = |(_, v): (&String, &Value)| match v {
                Value::Number(_) => count_at(v, depth + 1),
                _ => None,
            };
            map.iter()
                .filter(|(k, _)| is_count_like(k))
                .find_map(numeric)
                .or_else(|| map.iter().find_map(numeric))
        }
        _ => None,
    }
}

/// `totalPatients`, `patient_count` and the like.
fn is_count_like(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("count") || key.contains("total")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_is_returned_as_is() {
        let body = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(extract_records(&body, &[]).len(), 2);
    }

    #[test]
    fn data_wrapper_wins_over_other_arrays() {
        let body = json!({"errors": [], "data": [{"id": 1}]});
        let records = extract_records(&body, &[]);
        assert_eq!(records, vec![&json!({"id": 1})]);
    }

    #[test]
    fn resource_key_is_checked_after_defaults() {
        let body = json!({"success": true, "emergencyBeds": [{"id": 1}, {"id": 2}]});
        assert_eq!(extract_records(&body, &["emergencyBeds"]).len(), 2);
    }

    #[test]
    fn nested_wrapper_objects_are_searched() {
        let body = json!({"data": {"page": 1, "items": [{"id": 9}]}});
        let records = extract_records(&body, &[]);
        assert_eq!(records, vec![&json!({"id": 9})]);
    }

    #[test]
    fn unknown_array_key_is_auto_detected_in_document_order() {
        let body = json!({"message": "ok", "rows": [{"id": 3}], "later": [{"id": 4}]});
        let records = extract_records(&body, &[]);
        assert_eq!(records, vec![&json!({"id": 3})]);
    }

    #[test]
    fn unrecognised_shapes_yield_nothing() {
        assert!(extract_records(&json!({"message": "nope"}), &[]).is_empty());
        assert!(extract_records(&json!("text"), &[]).is_empty());
        assert!(extract_records(&Value::Null, &[]).is_empty());
    }

    #[test]
    fn single_record_unwraps_data() {
        let body = json!({"success": true, "data": {"PatientId": 5}});
        let record = extract_record(&body).expect("record");
        assert_eq!(record.get("PatientId"), Some(&json!(5)));

        let bare = json!({"PatientId": 6});
        assert_eq!(
            extract_record(&bare).and_then(|m| m.get("PatientId")),
            Some(&json!(6))
        );

        let listed = json!({"data": [{"PatientId": 7}]});
        assert_eq!(
            extract_record(&listed).and_then(|m| m.get("PatientId")),
            Some(&json!(7))
        );

        assert!(extract_record(&json!([])).is_none());
    }

    #[test]
    fn counts_tolerate_every_shape() {
        assert_eq!(extract_count(&json!(12)), 12);
        assert_eq!(extract_count(&json!("12")), 12);
        assert_eq!(extract_count(&json!({"count": 4})), 4);
        assert_eq!(extract_count(&json!({"data": {"TotalCount": 8}})), 8);
        assert_eq!(extract_count(&json!({"data": 3})), 3);
        assert_eq!(extract_count(&json!({"totalPatients": 41})), 41);
        assert_eq!(extract_count(&json!({"message": "none"})), 0);
        assert_eq!(extract_count(&json!(-2)), 0);
    }

    #[test]
    fn count_like_keys_beat_other_numbers() {
        assert_eq!(
            extract_count(&json!({"statusCode": 200, "totalPatients": 41})),
            41
        );
        assert_eq!(extract_count(&json!({"page": 1, "bed_count": 9})), 9);
        assert_eq!(extract_count(&json!({"statusCode": 200})), 200);
    }
}
