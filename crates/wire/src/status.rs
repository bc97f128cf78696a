//! Status vocabularies shared by several resources.
//!
//! Backend status strings vary in case and spacing (`"Moved Out"`, `"MOVEDOUT"`, `"moved_out"`),
//! so every parser compares on a folded form: lowercase ASCII letters and digits only.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::fields::FieldReader;

fn fold(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ============================================================================
// Record status
// ============================================================================

/// Soft-delete flag carried by every resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum RecordStatus {
    /// Record is live. Also the value used when the backend omits the field.
    #[default]
    Active,
    /// Record has been deactivated or soft-deleted.
    Inactive,
}

impl RecordStatus {
    /// Parse from a raw wire value. Booleans and `0`/`1` are accepted.
    pub fn from_wire(value: &Value) -> Self {
        match value {
            Value::Bool(false) => RecordStatus::Inactive,
            Value::Number(n) if n.as_i64() == Some(0) => RecordStatus::Inactive,
            Value::String(s) => match fold(s).as_str() {
                "inactive" | "deleted" | "disabled" | "false" | "0" | "archived" => {
                    RecordStatus::Inactive
                }
                _ => RecordStatus::Active,
            },
            _ => RecordStatus::Active,
        }
    }

    pub fn read(fields: &FieldReader<'_>, keys: &[&str]) -> Self {
        fields.raw(keys).map(Self::from_wire).unwrap_or_default()
    }

    pub fn is_active(self) -> bool {
        self == RecordStatus::Active
    }
}

// ============================================================================
// Admission lifecycle
// ============================================================================

/// Where an admission currently stands.
///
/// `Discharged` and `Movedout` end an admission. `Completed` and `Cancelled` only occur on
/// theatre allocations and end those the same way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AdmissionStatus {
    Registered,
    Admitted,
    Observation,
    Scheduled,
    InProgress,
    Transferred,
    Discharged,
    Movedout,
    Completed,
    Cancelled,
    /// The backend sent no lifecycle status.
    #[default]
    Unspecified,
    /// Anything the parser does not know, kept verbatim.
    Other(String),
}

impl AdmissionStatus {
    pub fn from_wire(text: &str) -> Self {
        match fold(text).as_str() {
            "" => AdmissionStatus::Unspecified,
            "registered" | "new" => AdmissionStatus::Registered,
            "admitted" | "occupied" | "active" => AdmissionStatus::Admitted,
            "observation" | "underobservation" => AdmissionStatus::Observation,
            "scheduled" | "booked" => AdmissionStatus::Scheduled,
            "inprogress" | "ongoing" => AdmissionStatus::InProgress,
            "discharged" => AdmissionStatus::Discharged,
            "movedout" => AdmissionStatus::Movedout,
            "completed" | "done" => AdmissionStatus::Completed,
            "cancelled" | "canceled" => AdmissionStatus::Cancelled,
            folded if folded.starts_with("transferred") || folded.starts_with("movedto") => {
                AdmissionStatus::Transferred
            }
            _ => AdmissionStatus::Other(text.trim().to_owned()),
        }
    }

    pub fn to_wire(&self) -> &str {
        match self {
            AdmissionStatus::Registered => "Registered",
            AdmissionStatus::Admitted => "Admitted",
            AdmissionStatus::Observation => "Observation",
            AdmissionStatus::Scheduled => "Scheduled",
            AdmissionStatus::InProgress => "InProgress",
            AdmissionStatus::Transferred => "Transferred",
            AdmissionStatus::Discharged => "Discharged",
            AdmissionStatus::Movedout => "Movedout",
            AdmissionStatus::Completed => "Completed",
            AdmissionStatus::Cancelled => "Cancelled",
            AdmissionStatus::Unspecified => "",
            AdmissionStatus::Other(text) => text,
        }
    }

    pub fn read(fields: &FieldReader<'_>, keys: &[&str]) -> Self {
        fields
            .opt_string(keys)
            .map(|s| Self::from_wire(&s))
            .unwrap_or_default()
    }

    /// True once the admission no longer holds its bed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AdmissionStatus::Discharged
                | AdmissionStatus::Movedout
                | AdmissionStatus::Completed
                | AdmissionStatus::Cancelled
        )
    }
}

impl Serialize for AdmissionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_wire())
    }
}

// ============================================================================
// Transfers
// ============================================================================

/// Department an admission was handed over to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TransferTarget {
    #[serde(rename = "IPD")]
    Ipd,
    #[serde(rename = "OT")]
    Ot,
    #[serde(rename = "ICU")]
    Icu,
}

impl TransferTarget {
    pub fn from_wire(text: &str) -> Option<Self> {
        let folded = fold(text);
        let target = folded.strip_prefix("movedto").unwrap_or(&folded);
        match target {
            "ipd" => Some(TransferTarget::Ipd),
            "ot" => Some(TransferTarget::Ot),
            "icu" => Some(TransferTarget::Icu),
            _ => None,
        }
    }

    pub fn read(fields: &FieldReader<'_>, keys: &[&str]) -> Option<Self> {
        fields.opt_string(keys).and_then(|s| Self::from_wire(&s))
    }
}

// ============================================================================
// Triage priority
// ============================================================================

/// Emergency triage priority, most urgent first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unspecified,
}

impl Priority {
    pub fn from_wire(text: &str) -> Self {
        match fold(text).as_str() {
            "critical" | "emergency" | "red" | "p1" | "1" => Priority::Critical,
            "high" | "urgent" | "orange" | "p2" | "2" => Priority::High,
            "medium" | "moderate" | "normal" | "yellow" | "p3" | "3" => Priority::Medium,
            "low" | "minor" | "green" | "p4" | "4" => Priority::Low,
            _ => Priority::Unspecified,
        }
    }

    pub fn read(fields: &FieldReader<'_>, keys: &[&str]) -> Self {
        fields
            .opt_string(keys)
            .map(|s| Self::from_wire(&s))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "Critical"),
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
            Priority::Unspecified => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_status_defaults_to_active() {
        assert_eq!(RecordStatus::from_wire(&json!("Active")), RecordStatus::Active);
        assert_eq!(RecordStatus::from_wire(&json!("whatever")), RecordStatus::Active);
        assert_eq!(RecordStatus::from_wire(&json!(null)), RecordStatus::Active);
        assert_eq!(RecordStatus::from_wire(&json!("INACTIVE")), RecordStatus::Inactive);
        assert_eq!(RecordStatus::from_wire(&json!(false)), RecordStatus::Inactive);
        assert_eq!(RecordStatus::from_wire(&json!(0)), RecordStatus::Inactive);
    }

    #[test]
    fn admission_status_folds_spelling_variants() {
        for spelling in ["Movedout", "Moved Out", "MOVED_OUT", "moved-out"] {
            assert_eq!(AdmissionStatus::from_wire(spelling), AdmissionStatus::Movedout);
        }
        assert_eq!(
            AdmissionStatus::from_wire("Transferred to ICU"),
            AdmissionStatus::Transferred
        );
        assert_eq!(AdmissionStatus::from_wire(""), AdmissionStatus::Unspecified);
        assert_eq!(
            AdmissionStatus::from_wire("Awaiting Bed"),
            AdmissionStatus::Other("Awaiting Bed".into())
        );
    }

    #[test]
    fn only_discharge_like_statuses_are_terminal() {
        assert!(AdmissionStatus::Discharged.is_terminal());
        assert!(AdmissionStatus::Movedout.is_terminal());
        assert!(!AdmissionStatus::Admitted.is_terminal());
        assert!(!AdmissionStatus::Transferred.is_terminal());
        assert!(!AdmissionStatus::Unspecified.is_terminal());
    }

    #[test]
    fn transfer_target_accepts_moved_to_prefix() {
        assert_eq!(TransferTarget::from_wire("ICU"), Some(TransferTarget::Icu));
        assert_eq!(TransferTarget::from_wire("Moved to IPD"), Some(TransferTarget::Ipd));
        assert_eq!(TransferTarget::from_wire("ot"), Some(TransferTarget::Ot));
        assert_eq!(TransferTarget::from_wire("ward"), None);
    }

    #[test]
    fn priority_orders_most_urgent_first() {
        assert!(Priority::Critical < Priority::High);
        assert!(Priority::Low < Priority::Unspecified);
        assert_eq!(Priority::from_wire("URGENT"), Priority::High);
        assert_eq!(Priority::from_wire("?"), Priority::Unspecified);
        assert_eq!(Priority::from_wire("critical"), Priority::Critical);
    }
}
