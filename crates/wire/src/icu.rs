//! ICU beds and ICU admissions.

use chrono::{DateTime, Utc};
use hms_types::RecordId;
use serde::Serialize;

use crate::fields::FieldReader;
use crate::status::{AdmissionStatus, RecordStatus, TransferTarget};
use crate::Resource;

const ICU_ID: &[&str] = &["ICUId", "icuId", "IcuId"];
const STATUS: &[&str] = &["Status", "status"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IcuBed {
    pub id: RecordId,
    pub bed_no: String,
    pub icu_type: String,
    pub room_no: String,
    pub description: String,
    pub ventilator_attached: bool,
    pub reported_occupied: bool,
    pub status: RecordStatus,
}

impl Resource for IcuBed {
    const NAME: &'static str = "icu_beds";
    const PATH: &'static str = "icu";
    const ENVELOPE_KEYS: &'static [&'static str] = &["icu", "ICU", "icus", "beds"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        IcuBed {
            id: fields.id(&["ICUId", "icuId", "IcuId", "Id", "id"]),
            bed_no: fields.string(&["ICUBedNo", "icuBedNo", "BedNo", "bedNo"]),
            icu_type: fields.string(&["ICUType", "icuType", "Type", "type"]),
            room_no: fields.string(&["ICURoomNameNo", "icuRoomNameNo", "RoomNo", "roomNo"]),
            description: fields.string(&["ICUDescription", "icuDescription", "Description", "description"]),
            ventilator_attached: fields.bool(&["IsVentilatorAttached", "isVentilatorAttached"]),
            reported_occupied: fields.bool(&["IsOccupied", "isOccupied"]),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IcuAdmission {
    pub id: RecordId,
    pub patient_id: Option<RecordId>,
    pub patient_name: String,
    pub icu_id: Option<RecordId>,
    pub admitted_at: Option<DateTime<Utc>>,
    pub lifecycle: AdmissionStatus,
    pub transfer_to: Option<TransferTarget>,
    pub transferred: bool,
    pub status: RecordStatus,
}

impl IcuAdmission {
    pub fn is_transferred(&self) -> bool {
        self.transferred
            || self.transfer_to.is_some()
            || self.lifecycle == AdmissionStatus::Transferred
    }
}

impl Resource for IcuAdmission {
    const NAME: &'static str = "icu_admissions";
    const PATH: &'static str = "patient-icu-admissions";
    const ENVELOPE_KEYS: &'static [&'static str] = &["icuAdmissions", "ICUAdmissions", "admissions"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        IcuAdmission {
            id: fields.id(&[
                "PatientICUAdmissionId",
                "patientICUAdmissionId",
                "ICUAdmissionId",
                "icuAdmissionId",
                "Id",
                "id",
            ]),
            patient_id: fields.opt_id(&["PatientId", "patientId"]),
            patient_name: fields.string(&["PatientName", "patientName"]),
            icu_id: fields.opt_id(ICU_ID),
            admitted_at: fields.opt_datetime(&[
                "ICUAdmissionDate",
                "icuAdmissionDate",
                "AdmissionDate",
                "admissionDate",
            ]),
            lifecycle: AdmissionStatus::read(
                fields,
                &["ICUPatientStatus", "icuPatientStatus", "AdmissionStatus", "admissionStatus"],
            ),
            transfer_to: TransferTarget::read(fields, &["TransferTo", "transferTo"]),
            transferred: fields.bool(&["Transferred", "transferred"]),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}
