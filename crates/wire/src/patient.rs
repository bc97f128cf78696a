//! Patient records.

use chrono::{DateTime, Utc};
use hms_types::{NonEmptyText, RecordId};
use serde::Serialize;

use crate::fields::FieldReader;
use crate::status::RecordStatus;
use crate::Resource;

const ID: &[&str] = &["PatientId", "patientId", "Id", "id"];
const NAME: &[&str] = &[
    "PatientName",
    "patientName",
    "FullName",
    "fullName",
    "Name",
    "name",
];
const AGE: &[&str] = &["Age", "age"];
const GENDER: &[&str] = &["Gender", "gender", "Sex", "sex"];
const PHONE: &[&str] = &[
    "PhoneNo",
    "phoneNo",
    "ContactNumber",
    "contactNumber",
    "Phone",
    "phone",
];
const ADDRESS: &[&str] = &["Address", "address"];
const BLOOD_GROUP: &[&str] = &["BloodGroup", "bloodGroup"];
const PATIENT_TYPE: &[&str] = &["PatientType", "patientType"];
const REGISTERED_AT: &[&str] = &[
    "RegisteredDate",
    "registeredDate",
    "CreatedDate",
    "createdDate",
    "CreatedAt",
    "createdAt",
];
const STATUS: &[&str] = &["Status", "status"];

/// A registered patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub blood_group: String,
    /// OPD / IPD / Emergency, as the backend spells it.
    pub patient_type: String,
    pub registered_at: Option<DateTime<Utc>>,
    pub status: RecordStatus,
}

impl Patient {
    /// Case-insensitive match on name, phone or id.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.phone.contains(&query)
            || self.id.to_string() == query
    }
}

impl Resource for Patient {
    const NAME: &'static str = "patients";
    const PATH: &'static str = "patients";
    const ENVELOPE_KEYS: &'static [&'static str] = &["patients", "Patients"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        Patient {
            id: fields.id(ID),
            name: fields.string(NAME),
            age: fields.uint(AGE),
            gender: fields.string(GENDER),
            phone: fields.string(PHONE),
            address: fields.string(ADDRESS),
            blood_group: fields.string(BLOOD_GROUP),
            patient_type: fields.string(PATIENT_TYPE),
            registered_at: fields.opt_datetime(REGISTERED_AT),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Payload for registering or updating a patient.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewPatient {
    pub patient_name: NonEmptyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_type: Option<String>,
    pub status: &'static str,
}

impl NewPatient {
    pub fn new(patient_name: NonEmptyText) -> Self {
        Self {
            patient_name,
            age: None,
            gender: None,
            phone_no: None,
            address: None,
            blood_group: None,
            patient_type: None,
            status: "Active",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize_one;
    use serde_json::json;

    #[test]
    fn pascal_and_camel_records_normalize_identically() {
        let pascal = json!({
            "PatientId": 12,
            "PatientName": "Asha Rao",
            "Age": 34,
            "Gender": "Female",
            "PhoneNo": "9876500001",
            "BloodGroup": "O+",
            "PatientType": "OPD",
            "RegisteredDate": "2026-01-05",
            "Status": "Active"
        });
        let camel = json!({
            "patientId": "12",
            "patientName": "Asha Rao",
            "age": "34",
            "gender": "Female",
            "phoneNo": 9876500001u64,
            "bloodGroup": "O+",
            "patientType": "OPD",
            "registeredDate": "2026-01-05T00:00:00Z",
            "status": "active"
        });

        let a: Patient = normalize_one(&pascal).expect("pascal");
        let b: Patient = normalize_one(&camel).expect("camel");
        assert_eq!(a, b);
        assert_eq!(a.id, RecordId::Int(12));
        assert_eq!(a.phone, "9876500001");
    }

    #[test]
    fn missing_fields_default_to_zero_values() {
        let patient: Patient = normalize_one(&json!({})).expect("empty object");
        assert_eq!(patient.id, RecordId::Int(0));
        assert_eq!(patient.name, "");
        assert_eq!(patient.age, 0);
        assert_eq!(patient.status, RecordStatus::Active);
        assert!(patient.registered_at.is_none());
    }

    #[test]
    fn search_matches_name_phone_and_id() {
        let patient: Patient =
            normalize_one(&json!({"PatientId": 3, "PatientName": "Ben Okafor", "PhoneNo": "555"}))
                .expect("patient");
        assert!(patient.matches_search("okaf"));
        assert!(patient.matches_search("555"));
        assert!(patient.matches_search("3"));
        assert!(patient.matches_search("  "));
        assert!(!patient.matches_search("asha"));
    }

    #[test]
    fn new_patient_uses_backend_spelling() {
        let mut payload = NewPatient::new(NonEmptyText::new("Chen Li").expect("name"));
        payload.age = Some(50);
        payload.phone_no = Some("555-0101".into());

        let body = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            body,
            json!({"PatientName": "Chen Li", "Age": 50, "PhoneNo": "555-0101", "Status": "Active"})
        );
    }
}
