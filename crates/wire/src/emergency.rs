//! Emergency department beds, bed slots and admissions.
//!
//! Current backends attach an admission to an `EmergencyBedId`. Older data attaches it to an
//! `EmergencyBedSlotId` instead; both references are kept so occupancy can honour either.

use chrono::{DateTime, Utc};
use hms_types::{NonEmptyText, RecordId};
use serde::Serialize;

use crate::fields::FieldReader;
use crate::status::{AdmissionStatus, Priority, RecordStatus, TransferTarget};
use crate::Resource;

const STATUS: &[&str] = &["Status", "status"];
const REPORTED_OCCUPIED: &[&str] = &["IsOccupied", "isOccupied", "Occupied", "occupied"];
const BED_ID: &[&str] = &["EmergencyBedId", "emergencyBedId"];
const SLOT_ID: &[&str] = &["EmergencyBedSlotId", "emergencyBedSlotId"];
const PATIENT_ID: &[&str] = &["PatientId", "patientId"];
const PATIENT_NAME: &[&str] = &["PatientName", "patientName"];

// ============================================================================
// Beds
// ============================================================================

const BED_NO: &[&str] = &[
    "EmergencyBedNo",
    "emergencyBedNo",
    "BedNo",
    "bedNo",
    "BedNumber",
    "bedNumber",
];
const ROOM_NO: &[&str] = &[
    "EmergencyRoomNameNo",
    "emergencyRoomNameNo",
    "RoomNo",
    "roomNo",
];
const BED_TYPE: &[&str] = &["BedType", "bedType"];
const DESCRIPTION: &[&str] = &[
    "EmergencyRoomDescription",
    "emergencyRoomDescription",
    "Description",
    "description",
];
const CHARGES: &[&str] = &["ChargesPerDay", "chargesPerDay"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyBed {
    pub id: RecordId,
    pub bed_no: String,
    pub room_no: String,
    pub bed_type: String,
    pub description: String,
    pub charges_per_day: f64,
    /// What the backend claims. Occupancy views derive their own answer from admissions.
    pub reported_occupied: bool,
    pub status: RecordStatus,
}

impl Resource for EmergencyBed {
    const NAME: &'static str = "emergency_beds";
    const PATH: &'static str = "emergency-beds";
    const ENVELOPE_KEYS: &'static [&'static str] = &["emergencyBeds", "EmergencyBeds", "beds"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        EmergencyBed {
            id: fields.id(&["EmergencyBedId", "emergencyBedId", "Id", "id"]),
            bed_no: fields.string(BED_NO),
            room_no: fields.string(ROOM_NO),
            bed_type: fields.string(BED_TYPE),
            description: fields.string(DESCRIPTION),
            charges_per_day: fields.float(CHARGES),
            reported_occupied: fields.bool(REPORTED_OCCUPIED),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

// ============================================================================
// Bed slots
// ============================================================================

const SLOT_NO: &[&str] = &[
    "ESlotNo",
    "eSlotNo",
    "EmergencyBedSlotNo",
    "emergencyBedSlotNo",
    "SlotNo",
    "slotNo",
];
const SLOT_START: &[&str] = &[
    "ESlotStartTime",
    "eSlotStartTime",
    "SlotStartTime",
    "slotStartTime",
];
const SLOT_END: &[&str] = &["ESlotEndTime", "eSlotEndTime", "SlotEndTime", "slotEndTime"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyBedSlot {
    pub id: RecordId,
    /// Parent bed, when the backend reports it.
    pub bed_id: Option<RecordId>,
    pub slot_no: String,
    pub start_time: String,
    pub end_time: String,
    pub reported_occupied: bool,
    pub status: RecordStatus,
}

impl Resource for EmergencyBedSlot {
    const NAME: &'static str = "emergency_bed_slots";
    const PATH: &'static str = "emergency-bed-slots";
    const ENVELOPE_KEYS: &'static [&'static str] =
        &["emergencyBedSlots", "EmergencyBedSlots", "slots"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        EmergencyBedSlot {
            id: fields.id(&["EmergencyBedSlotId", "emergencyBedSlotId", "Id", "id"]),
            bed_id: fields.opt_id(&["EmergencyBedId", "emergencyBedId", "BedId", "bedId"]),
            slot_no: fields.string(SLOT_NO),
            start_time: fields.string(SLOT_START),
            end_time: fields.string(SLOT_END),
            reported_occupied: fields.bool(REPORTED_OCCUPIED),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

// ============================================================================
// Admissions
// ============================================================================

const ADMISSION_ID: &[&str] = &[
    "EmergencyAdmissionId",
    "emergencyAdmissionId",
    "Id",
    "id",
];
const DOCTOR_ID: &[&str] = &["DoctorId", "doctorId"];
const DOCTOR_NAME: &[&str] = &["DoctorName", "doctorName"];
const ADMITTED_AT: &[&str] = &[
    "EmergencyAdmissionDate",
    "emergencyAdmissionDate",
    "AdmissionDate",
    "admissionDate",
];
const PRIORITY: &[&str] = &["Priority", "priority", "TriageLevel", "triageLevel"];
const CONDITION: &[&str] = &["Diagnosis", "diagnosis", "Condition", "condition"];
const LIFECYCLE: &[&str] = &[
    "EmergencyStatus",
    "emergencyStatus",
    "AdmissionStatus",
    "admissionStatus",
];
const TRANSFER_TO: &[&str] = &["TransferTo", "transferTo"];
const TRANSFERRED: &[&str] = &[
    "TransferToIPDOTICU",
    "transferToIPDOTICU",
    "Transferred",
    "transferred",
];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAdmission {
    pub id: RecordId,
    pub patient_id: Option<RecordId>,
    pub patient_name: String,
    pub doctor_id: Option<RecordId>,
    pub doctor_name: String,
    pub bed_id: Option<RecordId>,
    /// Legacy slot reference.
    pub slot_id: Option<RecordId>,
    pub admitted_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub condition: String,
    pub lifecycle: AdmissionStatus,
    pub transfer_to: Option<TransferTarget>,
    pub transferred: bool,
    pub status: RecordStatus,
}

impl EmergencyAdmission {
    /// Handed over to IPD, OT or ICU, by flag, target, or lifecycle.
    pub fn is_transferred(&self) -> bool {
        self.transferred
            || self.transfer_to.is_some()
            || self.lifecycle == AdmissionStatus::Transferred
    }
}

impl Resource for EmergencyAdmission {
    const NAME: &'static str = "emergency_admissions";
    const PATH: &'static str = "emergency-admissions";
    const ENVELOPE_KEYS: &'static [&'static str] =
        &["emergencyAdmissions", "EmergencyAdmissions", "admissions"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        EmergencyAdmission {
            id: fields.id(ADMISSION_ID),
            patient_id: fields.opt_id(PATIENT_ID),
            patient_name: fields.string(PATIENT_NAME),
            doctor_id: fields.opt_id(DOCTOR_ID),
            doctor_name: fields.string(DOCTOR_NAME),
            bed_id: fields.opt_id(BED_ID),
            slot_id: fields.opt_id(SLOT_ID),
            admitted_at: fields.opt_datetime(ADMITTED_AT),
            priority: Priority::read(fields, PRIORITY),
            condition: fields.string(CONDITION),
            lifecycle: AdmissionStatus::read(fields, LIFECYCLE),
            transfer_to: TransferTarget::read(fields, TRANSFER_TO),
            transferred: fields.bool(TRANSFERRED),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Payload for creating or updating an emergency bed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewEmergencyBed {
    pub emergency_bed_no: NonEmptyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_room_name_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charges_per_day: Option<f64>,
    pub status: &'static str,
}

impl NewEmergencyBed {
    pub fn new(emergency_bed_no: NonEmptyText) -> Self {
        Self {
            emergency_bed_no,
            emergency_room_name_no: None,
            bed_type: None,
            charges_per_day: None,
            status: "Active",
        }
    }
}

/// Payload for admitting a patient to an emergency bed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewEmergencyAdmission {
    pub patient_id: RecordId,
    pub emergency_bed_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<RecordId>,
    pub emergency_admission_date: DateTime<Utc>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    pub emergency_status: AdmissionStatus,
    pub status: &'static str,
}

impl NewEmergencyAdmission {
    pub fn new(patient_id: RecordId, emergency_bed_id: RecordId, priority: Priority) -> Self {
        Self {
            patient_id,
            emergency_bed_id,
            doctor_id: None,
            emergency_admission_date: Utc::now(),
            priority,
            diagnosis: None,
            emergency_status: AdmissionStatus::Admitted,
            status: "Active",
        }
    }
}

/// Partial update moving an admission through its lifecycle.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmergencyStatusUpdate {
    pub emergency_status: AdmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_to: Option<TransferTarget>,
    #[serde(rename = "TransferToIPDOTICU")]
    pub transferred: bool,
}

impl EmergencyStatusUpdate {
    pub fn discharge() -> Self {
        Self {
            emergency_status: AdmissionStatus::Discharged,
            transfer_to: None,
            transferred: false,
        }
    }

    pub fn transfer(target: TransferTarget) -> Self {
        Self {
            emergency_status: AdmissionStatus::Transferred,
            transfer_to: Some(target),
            transferred: true,
        }
    }
}
