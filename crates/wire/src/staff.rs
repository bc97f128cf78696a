//! Staff accounts (served from `/users`).

use hms_types::{NonEmptyText, RecordId};
use serde::Serialize;

use crate::fields::FieldReader;
use crate::status::RecordStatus;
use crate::Resource;

const ID: &[&str] = &["UserId", "userId", "StaffId", "staffId", "Id", "id"];
const NAME: &[&str] = &["UserName", "userName", "StaffName", "staffName", "Name", "name"];
const ROLE: &[&str] = &["RoleName", "roleName", "Role", "role"];
const DEPARTMENT: &[&str] = &["DepartmentName", "departmentName", "Department", "department"];
const SPECIALISATION: &[&str] = &[
    "Specialisation",
    "specialisation",
    "Specialization",
    "specialization",
];
const PHONE: &[&str] = &["PhoneNo", "phoneNo", "Phone", "phone"];
const EMAIL: &[&str] = &["Email", "email", "EmailId", "emailId"];
const STATUS: &[&str] = &["Status", "status"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: RecordId,
    pub name: String,
    pub role: String,
    pub department: String,
    pub specialisation: String,
    pub phone: String,
    pub email: String,
    pub status: RecordStatus,
}

impl Staff {
    /// Case-insensitive role comparison (`"doctor"` matches `"Doctor"`).
    pub fn has_role(&self, role: &str) -> bool {
        self.role.trim().eq_ignore_ascii_case(role.trim())
    }
}

impl Resource for Staff {
    const NAME: &'static str = "staff";
    const PATH: &'static str = "users";
    const ENVELOPE_KEYS: &'static [&'static str] = &["users", "Users", "staff", "Staff"];

    fn from_fields(fields: &FieldReader<'_>) -> Self {
        Staff {
            id: fields.id(ID),
            name: fields.string(NAME),
            role: fields.string(ROLE),
            department: fields.string(DEPARTMENT),
            specialisation: fields.string(SPECIALISATION),
            phone: fields.string(PHONE),
            email: fields.string(EMAIL),
            status: RecordStatus::read(fields, STATUS),
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Payload for creating or updating a staff account.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewStaff {
    pub user_name: NonEmptyText,
    pub role_name: NonEmptyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: &'static str,
}

impl NewStaff {
    pub fn new(user_name: NonEmptyText, role_name: NonEmptyText) -> Self {
        Self {
            user_name,
            role_name,
            department_name: None,
            phone_no: None,
            email: None,
            status: "Active",
        }
    }
}
