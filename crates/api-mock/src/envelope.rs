//! Response envelopes the mock backend can wrap records in.
//!
//! The real backend is inconsistent about envelopes, so the mock can be switched between the
//! shapes seen in the wild to exercise the client's normalizers.

use hms_core::{HmsError, HmsResult};
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `[ ... ]`
    Bare,
    /// `{"data": [ ... ]}`
    #[default]
    Data,
    /// `{"items": [ ... ], "total": n}`
    Items,
    /// `{"success": true, "<collection>": [ ... ]}`
    Named,
}

impl EnvelopeShape {
    pub fn from_wire(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "bare" => Some(EnvelopeShape::Bare),
            "data" => Some(EnvelopeShape::Data),
            "items" => Some(EnvelopeShape::Items),
            "named" => Some(EnvelopeShape::Named),
            _ => None,
        }
    }

    /// Wraps a collection. `name` is the key used by [`EnvelopeShape::Named`].
    pub fn wrap_list(self, name: &str, records: Vec<Value>) -> Value {
        match self {
            EnvelopeShape::Bare => Value::Array(records),
            EnvelopeShape::Data => json!({ "data": records }),
            EnvelopeShape::Items => {
                let total = records.len();
                json!({ "items": records, "total": total })
            }
            EnvelopeShape::Named => {
                let mut body = serde_json::Map::new();
                body.insert("success".into(), Value::Bool(true));
                body.insert(name.to_owned(), Value::Array(records));
                Value::Object(body)
            }
        }
    }

    /// Wraps a single record.
    pub fn wrap_one(self, record: Value) -> Value {
        match self {
            EnvelopeShape::Bare => record,
            EnvelopeShape::Data | EnvelopeShape::Items => json!({ "data": record }),
            EnvelopeShape::Named => json!({ "success": true, "data": record }),
        }
    }

    /// Wraps a dashboard count.
    pub fn wrap_count(self, count: u64) -> Value {
        match self {
            EnvelopeShape::Bare => json!(count),
            EnvelopeShape::Data => json!({ "data": { "count": count } }),
            EnvelopeShape::Items => json!({ "count": count }),
            EnvelopeShape::Named => json!({ "success": true, "total": count }),
        }
    }
}

/// Parse `HMS_MOCK_ENVELOPE`. Missing or blank gives [`EnvelopeShape::Data`].
pub fn envelope_from_env_value(value: Option<String>) -> HmsResult<EnvelopeShape> {
    match value.filter(|v| !v.trim().is_empty()) {
        None => Ok(EnvelopeShape::default()),
        Some(raw) => EnvelopeShape::from_wire(&raw).ok_or_else(|| {
            HmsError::InvalidInput(format!(
                "HMS_MOCK_ENVELOPE must be one of bare, data, items, named; got {raw:?}"
            ))
        }),
    }
}
