//! Wire boundary for the HMS REST backend.
//!
//! This crate turns loosely-shaped backend JSON into strongly-typed records and builds the
//! payloads sent back. It does no I/O.
//!
//! This crate focuses on:
//! - digging record arrays, single records and counts out of arbitrary envelopes
//! - tolerant field reading across PascalCase / camelCase spellings
//! - per-resource normalizers implementing [`Resource`]
//! - write payloads in the backend's PascalCase convention
//!
//! Normalization never fails. Shapes it cannot make sense of produce empty collections and
//! zero-valued fields; the caller decides whether that is worth surfacing.

pub mod emergency;
pub mod envelope;
pub mod fields;
pub mod icu;
pub mod ot;
pub mod patient;
pub mod room;
pub mod staff;
pub mod status;

pub use emergency::{
    EmergencyAdmission, EmergencyBed, EmergencyBedSlot, EmergencyStatusUpdate,
    NewEmergencyAdmission, NewEmergencyBed,
};
pub use envelope::{extract_count, extract_record, extract_records, DEFAULT_ENVELOPE_KEYS};
pub use fields::FieldReader;
pub use icu::{IcuAdmission, IcuBed};
pub use ot::{OperationTheatre, OtAllocation};
pub use patient::{NewPatient, Patient};
pub use room::{RoomAdmission, RoomBed};
pub use staff::{NewStaff, Staff};
pub use status::{AdmissionStatus, Priority, RecordStatus, TransferTarget};

pub use hms_types::{NonEmptyText, RecordId};

use serde_json::Value;

/// A REST resource that can be normalized from backend JSON.
pub trait Resource: Sized {
    /// Short name used in logs and as the fixture key (e.g. `"emergency_beds"`).
    const NAME: &'static str;

    /// Collection path relative to the API base (e.g. `"emergency-beds"`).
    const PATH: &'static str;

    /// Resource-specific wrapper keys, checked after [`DEFAULT_ENVELOPE_KEYS`].
    const ENVELOPE_KEYS: &'static [&'static str];

    /// Builds a record from one JSON object. Must not fail.
    fn from_fields(fields: &FieldReader<'_>) -> Self;

    fn id(&self) -> RecordId;
}

/// Normalizes a list response into records.
///
/// Array elements that are not objects are skipped.
pub fn normalize_list<R: Resource>(body: &Value) -> Vec<R> {
    let raw = extract_records(body, R::ENVELOPE_KEYS);
    let total = raw.len();

    let records: Vec<R> = raw
        .into_iter()
        .filter_map(FieldReader::from_value)
        .map(|fields| R::from_fields(&fields))
        .collect();

    if records.len() < total {
        tracing::warn!(
            resource = R::NAME,
            skipped = total - records.len(),
            "skipped non-object entries in response"
        );
    }
    records
}

/// Normalizes a single-record response.
pub fn normalize_one<R: Resource>(body: &Value) -> Option<R> {
    extract_record(body).map(|map| R::from_fields(&FieldReader::new(map)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_shape_does_not_change_records() {
        let records = json!([
            {"PatientId": 1, "PatientName": "Asha Rao", "Age": 34},
            {"patientId": 2, "patientName": "Ben Okafor", "age": "61"}
        ]);

        let bare: Vec<Patient> = normalize_list(&records);
        let wrapped: Vec<Patient> = normalize_list(&json!({"data": records.clone()}));
        let named: Vec<Patient> = normalize_list(&json!({"success": true, "rows": records}));

        assert_eq!(bare.len(), 2);
        assert_eq!(bare, wrapped);
        assert_eq!(bare, named);
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let body = json!({"data": [{"PatientId": 1}, 7, "x", null]});
        let patients: Vec<Patient> = normalize_list(&body);
        assert_eq!(patients.len(), 1);
    }

    #[test]
    fn single_record_is_unwrapped() {
        let body = json!({"data": {"PatientId": 9, "PatientName": "Chen Li"}});
        let patient: Patient = normalize_one(&body).expect("patient");
        assert_eq!(patient.id, RecordId::Int(9));
        assert_eq!(patient.name, "Chen Li");

        assert!(normalize_one::<Patient>(&json!("gone")).is_none());
    }
}
