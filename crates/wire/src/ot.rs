//! Operation theatres and patient theatre allocations.

use chrono::{DateTime, Utc};
use hms_types::RecordId;
use serde::Serialize;

use crate::fields::FieldReader;
use crate::status::{AdmissionStatus, RecordStatus};
use crate::Resource;

const OT_ID: &[&str] = &["OTId", "otId", "OtId"];
const STATUS: &[&str] = &["Status", "status"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationTheatre {
    pub id: RecordId,
    pub name: String,
    pub ot_type: String,
    pub description: String,
    pub status: RecordStatus,
}

impl Resource for OperationTheatre {
    const NAME: &'static str = "operation_theatres";
    const PATH: &'static str = "ot";
    const ENVELOPE_KEYS: &'static [&'static str] = &["ot", "OT", "ots", "theatres"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        OperationTheatre {
            id: fields.id(&["OTId", "otId", "OtId", "Id", "id"]),
            name: fields.string(&["OTName", "otName", "OTNo", "otNo", "Name", "name"]),
            ot_type: fields.string(&["OTType", "otType", "Type", "type"]),
            description: fields.string(&["Description", "description"]),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtAllocation {
    pub id: RecordId,
    pub patient_id: Option<RecordId>,
    pub patient_name: String,
    pub ot_id: Option<RecordId>,
    pub surgery_at: Option<DateTime<Utc>>,
    pub lifecycle: AdmissionStatus,
    pub status: RecordStatus,
}

impl Resource for OtAllocation {
    const NAME: &'static str = "ot_allocations";
    const PATH: &'static str = "patient-ot-allocations";
    const ENVELOPE_KEYS: &'static [&'static str] = &["otAllocations", "OTAllocations", "allocations"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        OtAllocation {
            id: fields.id(&["PatientOTAllocationId", "patientOTAllocationId", "Id", "id"]),
            patient_id: fields.opt_id(&["PatientId", "patientId"]),
            patient_name: fields.string(&["PatientName", "patientName"]),
            ot_id: fields.opt_id(OT_ID),
            surgery_at: fields.opt_datetime(&[
                "OperationDate",
                "operationDate",
                "SurgeryDate",
                "surgeryDate",
            ]),
            lifecycle: AdmissionStatus::read(fields, &["OperationStatus", "operationStatus"]),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize_list;
    use serde_json::json;

    #[test]
    fn allocations_track_theatre_and_outcome() {
        let allocations: Vec<OtAllocation> = normalize_list(&json!({
            "allocations": [
                {"PatientOTAllocationId": 1, "OTId": 2, "OperationStatus": "In Progress"},
                {"patientOTAllocationId": 2, "otId": 2, "operationStatus": "Completed"}
            ]
        }));

        assert_eq!(allocations[0].ot_id, Some(RecordId::Int(2)));
        assert_eq!(allocations[0].lifecycle, AdmissionStatus::InProgress);
        assert!(allocations[1].lifecycle.is_terminal());
    }
}
