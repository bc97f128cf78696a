//! Stub fixtures served when the live backend is unavailable.
//!
//! Fixtures are a YAML document keyed by [`Resource::NAME`], plus a `dashboard` map of metric
//! counts. Each value is fed through the same normalizers as a live response, so fixtures may use
//! any envelope or key spelling the backend does.

use std::path::Path;

use hms_wire::{extract_count, normalize_list, RecordId, Resource};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::constants::{DASHBOARD_FIXTURE_KEY, EMBEDDED_FIXTURES};
use crate::{HmsError, HmsResult};

/// Parsed fixture document.
#[derive(Clone, Debug, Default)]
pub struct StubStore {
    root: Value,
}

impl StubStore {
    /// Fixtures compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns [`HmsError::FixtureParse`] if the embedded document is malformed.
    pub fn embedded() -> HmsResult<Self> {
        Self::from_yaml(EMBEDDED_FIXTURES)
    }

    /// Parses fixtures from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`HmsError::FixtureParse`] if the text is not valid YAML, and
    /// [`HmsError::InvalidInput`] if the top level is not a mapping.
    pub fn from_yaml(text: &str) -> HmsResult<Self> {
        let root: Value = serde_yaml::from_str(text).map_err(HmsError::FixtureParse)?;
        match root {
            Value::Object(_) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            other => Err(HmsError::InvalidInput(format!(
                "stub fixtures must be a mapping keyed by resource, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Reads fixtures from a YAML file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`HmsError::FixtureRead`] if the file cannot be read, otherwise as
    /// [`StubStore::from_yaml`].
    pub fn from_file(path: &Path) -> HmsResult<Self> {
        let text = std::fs::read_to_string(path).map_err(HmsError::FixtureRead)?;
        Self::from_yaml(&text)
    }

    /// Loads the fixture file named in config, or the embedded fixtures when none is set.
    pub fn load(cfg: &ClientConfig) -> HmsResult<Self> {
        match cfg.stub_fixtures() {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading stub fixtures from file");
                Self::from_file(path)
            }
            None => Self::embedded(),
        }
    }

    /// Raw fixture value stored under `name`.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// All fixture records for `R`, or `None` when the fixtures have no entry for it.
    pub fn collection<R: Resource>(&self) -> Option<Vec<R>> {
        self.raw(R::NAME).map(normalize_list)
    }

    /// All fixture records for `R`. Missing fixtures give an empty list.
    pub fn records<R: Resource>(&self) -> Vec<R> {
        self.collection().unwrap_or_default()
    }

    /// One fixture record by id.
    pub fn find<R: Resource>(&self, id: RecordId) -> Option<R> {
        self.records::<R>().into_iter().find(|r| r.id() == id)
    }

    /// Dashboard count for `metric`, if the fixtures carry one.
    pub fn count(&self, metric: &str) -> Option<u64> {
        self.raw(DASHBOARD_FIXTURE_KEY)
            .and_then(|dashboard| dashboard.get(metric))
            .map(extract_count)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_HTTP_TIMEOUT;
    use hms_wire::{AdmissionStatus, EmergencyAdmission, EmergencyBed, Patient, Staff};
    use std::io::Write;

    #[test]
    fn embedded_fixtures_cover_every_board() {
        let stubs = StubStore::embedded().expect("embedded fixtures parse");

        assert_eq!(stubs.records::<Patient>().len(), 3);
        assert_eq!(stubs.records::<Staff>().len(), 5);
        assert_eq!(stubs.records::<EmergencyBed>().len(), 4);
        assert!(!stubs.records::<hms_wire::EmergencyBedSlot>().is_empty());
        assert!(!stubs.records::<hms_wire::IcuBed>().is_empty());
        assert!(!stubs.records::<hms_wire::RoomBed>().is_empty());
        assert!(!stubs.records::<hms_wire::OperationTheatre>().is_empty());
        assert_eq!(stubs.count("total-patients"), Some(6));
    }

    #[test]
    fn camel_and_pascal_fixtures_normalize_alike() {
        let stubs = StubStore::embedded().expect("embedded fixtures parse");
        let chen: Patient = stubs.find(RecordId::Int(3)).expect("camelCase patient");
        assert_eq!(chen.name, "Chen Li");
        assert_eq!(chen.age, 47);

        let discharged: EmergencyAdmission = stubs.find(RecordId::Int(3)).expect("admission");
        assert_eq!(discharged.lifecycle, AdmissionStatus::Discharged);
    }

    #[test]
    fn missing_resource_and_metric_are_empty() {
        let stubs = StubStore::from_yaml("patients: []\n").expect("parse");
        assert!(stubs.records::<Staff>().is_empty());
        assert!(stubs.collection::<Staff>().is_none());
        assert_eq!(stubs.collection::<Patient>(), Some(Vec::new()));
        assert_eq!(stubs.count("total-staff"), None);

        let empty = StubStore::from_yaml("").expect("empty document");
        assert!(empty.records::<Patient>().is_empty());
    }

    #[test]
    fn rejects_non_mapping_documents() {
        let err = StubStore::from_yaml("- 1\n- 2\n").expect_err("list root");
        assert!(matches!(err, HmsError::InvalidInput(_)));

        let err = StubStore::from_yaml("patients: [unclosed").expect_err("bad yaml");
        assert!(matches!(err, HmsError::FixtureParse(_)));
    }

    #[test]
    fn load_prefers_configured_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "patients:\n  data:\n    - PatientId: 42\n      PatientName: Only One\ndashboard:\n  total-patients: \"1\""
        )
        .expect("write fixtures");

        let cfg = ClientConfig::new(
            "http://localhost:5000/api",
            true,
            DEFAULT_HTTP_TIMEOUT,
            Some(file.path().to_path_buf()),
        )
        .expect("config");

        let stubs = StubStore::load(&cfg).expect("load");
        let patients: Vec<Patient> = stubs.records();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].id, RecordId::Int(42));
        assert_eq!(stubs.count("total-patients"), Some(1));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = StubStore::from_file(&dir.path().join("missing.yaml")).expect_err("missing");
        assert!(matches!(err, HmsError::FixtureRead(_)));
    }
}
