//! Ward room beds and in-patient room admissions.

use chrono::{DateTime, Utc};
use hms_types::RecordId;
use serde::Serialize;

use crate::fields::FieldReader;
use crate::status::{AdmissionStatus, RecordStatus};
use crate::Resource;

const ROOM_BED_ID: &[&str] = &["RoomBedsId", "roomBedsId", "RoomBedId", "roomBedId"];
const STATUS: &[&str] = &["Status", "status"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBed {
    pub id: RecordId,
    pub room_no: String,
    pub bed_no: String,
    pub category: String,
    pub charges_per_day: f64,
    pub reported_occupied: bool,
    pub status: RecordStatus,
}

impl Resource for RoomBed {
    const NAME: &'static str = "room_beds";
    const PATH: &'static str = "room-beds";
    const ENVELOPE_KEYS: &'static [&'static str] = &["roomBeds", "RoomBeds", "beds"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        // Some deployments flag occupancy with a boolean, others with BedStatus text.
        let reported_occupied = fields.bool(&["IsOccupied", "isOccupied"])
            || fields
                .string(&["BedStatus", "bedStatus"])
                .eq_ignore_ascii_case("occupied");

        RoomBed {
            id: fields.id(&["RoomBedsId", "roomBedsId", "RoomBedId", "roomBedId", "Id", "id"]),
            room_no: fields.string(&["RoomNo", "roomNo"]),
            bed_no: fields.string(&["BedNo", "bedNo"]),
            category: fields.string(&["RoomCategory", "roomCategory", "RoomType", "roomType"]),
            charges_per_day: fields.float(&["ChargesPerDay", "chargesPerDay"]),
            reported_occupied,
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAdmission {
    pub id: RecordId,
    pub patient_id: Option<RecordId>,
    pub patient_name: String,
    pub room_bed_id: Option<RecordId>,
    pub admitted_at: Option<DateTime<Utc>>,
    pub lifecycle: AdmissionStatus,
    pub status: RecordStatus,
}

impl Resource for RoomAdmission {
    const NAME: &'static str = "room_admissions";
    const PATH: &'static str = "room-admissions";
    const ENVELOPE_KEYS: &'static [&'static str] =
        &["roomAdmissions", "RoomAdmissions", "admissions"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        RoomAdmission {
            id: fields.id(&["RoomAdmissionId", "roomAdmissionId", "Id", "id"]),
            patient_id: fields.opt_id(&["PatientId", "patientId"]),
            patient_name: fields.string(&["PatientName", "patientName"]),
            room_bed_id: fields.opt_id(ROOM_BED_ID),
            admitted_at: fields.opt_datetime(&[
                "AdmissionDateTime",
                "admissionDateTime",
                "AdmissionDate",
                "admissionDate",
            ]),
            lifecycle: AdmissionStatus::read(fields, &["AdmissionStatus", "admissionStatus"]),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
