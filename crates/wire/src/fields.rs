//! Tolerant field access over loosely-typed JSON records.
//!
//! Every logical field is read from an ordered list of key spellings. The backend's own
//! convention is PascalCase (`EmergencyBedId`), older endpoints and hand-written fixtures use
//! camelCase (`emergencyBedId`), and a few use bare names (`id`). The first key whose value can
//! be coerced to the requested type wins; if none can, the field falls back to its zero value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use hms_types::RecordId;
use serde_json::{Map, Value};

/// Read-only view over one JSON record.
#[derive(Clone, Copy, Debug)]
pub struct FieldReader<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// Returns a reader if `value` is a JSON object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    /// First non-null raw value among `keys`.
    pub fn raw(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.map.get(*key))
            .find(|value| !value.is_null())
    }

    fn first<T>(&self, keys: &[&str], coerce: impl Fn(&Value) -> Option<T>) -> Option<T> {
        keys.iter()
            .filter_map(|key| self.map.get(*key))
            .find_map(|value| coerce(value))
    }

    pub fn string(&self, keys: &[&str]) -> String {
        self.opt_string(keys).unwrap_or_default()
    }

    /// Trimmed text, `None` when missing or blank.
    pub fn opt_string(&self, keys: &[&str]) -> Option<String> {
        self.first(keys, coerce_string)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
    }

    pub fn int(&self, keys: &[&str]) -> i64 {
        self.opt_int(keys).unwrap_or(0)
    }

    pub fn opt_int(&self, keys: &[&str]) -> Option<i64> {
        self.first(keys, coerce_i64)
    }

    /// Non-negative integer that fits in `u32`, else `0`.
    pub fn uint(&self, keys: &[&str]) -> u32 {
        self.first(keys, |v| coerce_i64(v).and_then(|n| u32::try_from(n).ok()))
            .unwrap_or(0)
    }

    pub fn float(&self, keys: &[&str]) -> f64 {
        self.first(keys, coerce_f64).unwrap_or(0.0)
    }

    pub fn bool(&self, keys: &[&str]) -> bool {
        self.opt_bool(keys).unwrap_or(false)
    }

    pub fn opt_bool(&self, keys: &[&str]) -> Option<bool> {
        self.first(keys, coerce_bool)
    }

    pub fn id(&self, keys: &[&str]) -> RecordId {
        self.first(keys, coerce_id).unwrap_or_default()
    }

    /// Reference to another record. Missing, unparseable and zero ids are all `None`.
    pub fn opt_id(&self, keys: &[&str]) -> Option<RecordId> {
        self.first(keys, coerce_id).filter(|id| !id.is_unset())
    }

    pub fn opt_datetime(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        self.first(keys, coerce_datetime)
    }
}

/// Coerces strings, numbers and booleans to text.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerces integers, integral floats and numeric strings.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Coerces booleans, `0`/`1`, and the usual textual spellings.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn coerce_id(value: &Value) -> Option<RecordId> {
    match value {
        Value::Number(_) => coerce_i64(value).map(RecordId::Int),
        Value::String(s) => RecordId::parse(s).ok(),
        _ => None,
    }
}

/// Parses RFC 3339, naive date-times, and plain dates (all read as UTC).
pub fn coerce_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
