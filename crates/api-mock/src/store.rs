//! In-memory record store behind the mock backend.
//!
//! Records are kept as the raw JSON objects they were seeded or posted with, keyed by collection
//! path. Ids are read with the same tolerant field reader the client uses, so seeded fixtures may
//! mix key spellings.

use std::collections::HashMap;

use hms_core::{
    derive_occupancy, holds_unit, resolve_legacy_slots, DashboardMetric, OccupancyRule,
    OccupancySummary, StubStore,
};
use hms_wire::{
    extract_records, normalize_list, EmergencyAdmission, EmergencyBed, EmergencyBedSlot,
    FieldReader, IcuAdmission, IcuBed, OperationTheatre, OtAllocation, Patient, RecordId,
    Resource, RoomAdmission, RoomBed, Staff,
};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown collection {0:?}")]
    UnknownCollection(String),
    #[error("{collection} {id} not found")]
    NotFound { collection: String, id: RecordId },
    #[error("{collection} {id} already exists")]
    Conflict { collection: String, id: RecordId },
    #[error("request body must be a JSON object")]
    NotAnObject,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Static description of one served collection.
#[derive(Clone, Copy, Debug)]
pub struct CollectionSpec {
    pub path: &'static str,
    pub name: &'static str,
    /// Id field spellings; the first is written on insert.
    pub id_keys: &'static [&'static str],
}

const fn spec<R: Resource>(id_keys: &'static [&'static str]) -> CollectionSpec {
    CollectionSpec {
        path: R::PATH,
        name: R::NAME,
        id_keys,
    }
}

pub const COLLECTIONS: [CollectionSpec; 11] = [
    spec::<Patient>(&["PatientId", "patientId"]),
    spec::<Staff>(&["UserId", "userId"]),
    spec::<EmergencyBed>(&["EmergencyBedId", "emergencyBedId"]),
    spec::<EmergencyBedSlot>(&["EmergencyBedSlotId", "emergencyBedSlotId"]),
    spec::<EmergencyAdmission>(&["EmergencyAdmissionId", "emergencyAdmissionId"]),
    spec::<IcuBed>(&["ICUId", "icuId"]),
    spec::<IcuAdmission>(&["PatientICUAdmissionId", "patientICUAdmissionId"]),
    spec::<RoomBed>(&["RoomBedsId", "roomBedsId"]),
    spec::<RoomAdmission>(&["RoomAdmissionId", "roomAdmissionId"]),
    spec::<OperationTheatre>(&["OTId", "otId"]),
    spec::<OtAllocation>(&["PatientOTAllocationId", "patientOTAllocationId"]),
];

#[derive(Clone, Debug)]
struct Collection {
    spec: CollectionSpec,
    records: Vec<Map<String, Value>>,
    next_id: i64,
}

impl Collection {
    fn new(spec: CollectionSpec, records: Vec<Map<String, Value>>) -> Self {
        let mut collection = Self {
            spec,
            records,
            next_id: 1,
        };
        collection.next_id = collection
            .records
            .iter()
            .filter_map(|r| match collection.id_of(r) {
                RecordId::Int(n) => Some(n),
                RecordId::Uuid(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        collection
    }

    fn id_of(&self, record: &Map<String, Value>) -> RecordId {
        FieldReader::new(record).id(self.spec.id_keys)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| self.id_of(r) == id)
    }

    fn not_found(&self, id: RecordId) -> StoreError {
        StoreError::NotFound {
            collection: self.spec.name.to_owned(),
            id,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockStore {
    collections: HashMap<&'static str, Collection>,
}

impl MockStore {
    /// Store seeded from fixture records.
    pub fn seeded(stubs: &StubStore) -> Self {
        let collections = COLLECTIONS
            .iter()
            .map(|spec| {
                let records = stubs
                    .raw(spec.name)
                    .map(|raw| {
                        extract_records(raw, &[])
                            .into_iter()
                            .filter_map(|v| v.as_object().cloned())
                            .collect()
                    })
                    .unwrap_or_default();
                (spec.path, Collection::new(*spec, records))
            })
            .collect();
        Self { collections }
    }

    pub fn spec(&self, path: &str) -> StoreResult<CollectionSpec> {
        self.collection(path).map(|c| c.spec)
    }

    fn collection(&self, path: &str) -> StoreResult<&Collection> {
        self.collections
            .get(path)
            .ok_or_else(|| StoreError::UnknownCollection(path.to_owned()))
    }

    fn collection_mut(&mut self, path: &str) -> StoreResult<&mut Collection> {
        self.collections
            .get_mut(path)
            .ok_or_else(|| StoreError::UnknownCollection(path.to_owned()))
    }

    pub fn list(&self, path: &str) -> StoreResult<Vec<Value>> {
        let collection = self.collection(path)?;
        Ok(collection
            .records
            .iter()
            .cloned()
            .map(Value::Object)
            .collect())
    }

    pub fn get(&self, path: &str, id: RecordId) -> StoreResult<Value> {
        let collection = self.collection(path)?;
        collection
            .position(id)
            .map(|i| Value::Object(collection.records[i].clone()))
            .ok_or_else(|| collection.not_found(id))
    }

    /// Stores a new record, assigning the next integer id when the body carries none.
    ///
    /// A body carrying an id already in the collection is refused. Zero and negative integer
    /// ids count as none.
    pub fn insert(&mut self, path: &str, body: Value) -> StoreResult<Value> {
        let Value::Object(mut record) = body else {
            return Err(StoreError::NotAnObject);
        };
        let collection = self.collection_mut(path)?;

        match collection.id_of(&record) {
            id @ (RecordId::Int(1..) | RecordId::Uuid(_)) if !id.is_unset() => {
                if collection.position(id).is_some() {
                    return Err(StoreError::Conflict {
                        collection: collection.spec.name.to_owned(),
                        id,
                    });
                }
                if let RecordId::Int(n) = id {
                    collection.next_id = collection.next_id.max(n + 1);
                }
            }
            _ => {
                for key in collection.spec.id_keys {
                    record.remove(*key);
                }
                record.insert(
                    collection.spec.id_keys[0].to_owned(),
                    Value::from(collection.next_id),
                );
                collection.next_id += 1;
            }
        }

        collection.records.push(record.clone());
        Ok(Value::Object(record))
    }

    /// Merges `body` into an existing record. Id fields in the body are ignored.
    pub fn update(&mut self, path: &str, id: RecordId, body: Value) -> StoreResult<Value> {
        let Value::Object(patch) = body else {
            return Err(StoreError::NotAnObject);
        };
        let collection = self.collection_mut(path)?;
        let index = collection
            .position(id)
            .ok_or_else(|| collection.not_found(id))?;

        let id_keys = collection.spec.id_keys;
        let record = &mut collection.records[index];
        for (key, value) in patch {
            if !id_keys.contains(&key.as_str()) {
                record.insert(key, value);
            }
        }
        Ok(Value::Object(record.clone()))
    }

    pub fn remove(&mut self, path: &str, id: RecordId) -> StoreResult<()> {
        let collection = self.collection_mut(path)?;
        let index = collection
            .position(id)
            .ok_or_else(|| collection.not_found(id))?;
        collection.records.remove(index);
        Ok(())
    }

    /// Typed view of a collection, normalized the way the client would see it.
    pub fn records<R: Resource>(&self) -> Vec<R> {
        self.list(R::PATH)
            .map(|records| normalize_list(&Value::Array(records)))
            .unwrap_or_default()
    }

    /// Dashboard count derived from current records.
    pub fn count(&self, metric: DashboardMetric) -> u64 {
        let n = match metric {
            DashboardMetric::TotalPatients => self
                .records::<Patient>()
                .iter()
                .filter(|p| p.status.is_active())
                .count(),
            DashboardMetric::TotalStaff => self.active_staff(None),
            DashboardMetric::TotalDoctors => self.active_staff(Some("doctor")),
            DashboardMetric::TotalNurses => self.active_staff(Some("nurse")),
            DashboardMetric::EmergencyAdmissions => self
                .records::<EmergencyAdmission>()
                .iter()
                .filter(|a| holds_unit(*a, OccupancyRule::EMERGENCY))
                .count(),
            DashboardMetric::AvailableBeds => self.available_beds(),
        };
        n as u64
    }

    fn active_staff(&self, role: Option<&str>) -> usize {
        self.records::<Staff>()
            .iter()
            .filter(|s| s.status.is_active() && role.map_or(true, |r| s.has_role(r)))
            .count()
    }

    /// Free in-service beds across emergency, ICU and wards.
    fn available_beds(&self) -> usize {
        let slots = self.records::<EmergencyBedSlot>();
        let emergency = derive_occupancy(
            self.records::<EmergencyBed>(),
            &self.records::<EmergencyAdmission>(),
            OccupancyRule::EMERGENCY,
            resolve_legacy_slots(&slots),
        );
        let icu = derive_occupancy(
            self.records::<IcuBed>(),
            &self.records::<IcuAdmission>(),
            OccupancyRule::ICU,
            |a: &IcuAdmission| a.icu_id,
        );
        let rooms = derive_occupancy(
            self.records::<RoomBed>(),
            &self.records::<RoomAdmission>(),
            OccupancyRule::ROOM,
            |a: &RoomAdmission| a.room_bed_id,
        );

        OccupancySummary::of(&emergency).available
            + OccupancySummary::of(&icu).available
            + OccupancySummary::of(&rooms).available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> MockStore {
        MockStore::seeded(&StubStore::embedded().expect("embedded fixtures"))
    }

    #[test]
    fn seeds_every_collection_from_fixtures() {
        let store = seeded();
        for spec in COLLECTIONS {
            assert!(store.list(spec.path).is_ok(), "{}", spec.path);
        }
        assert_eq!(store.list("patients").expect("patients").len(), 3);
        assert!(matches!(
            store.list("visitors"),
            Err(StoreError::UnknownCollection(_))
        ));
    }

    #[test]
    fn insert_assigns_next_id() {
        let mut store = seeded();
        let created = store
            .insert("patients", json!({"PatientName": "Dana Scott"}))
            .expect("insert");
        assert_eq!(created["PatientId"], json!(4));

        let fetched = store.get("patients", RecordId::Int(4)).expect("get");
        assert_eq!(fetched["PatientName"], json!("Dana Scott"));

        assert!(matches!(
            store.insert("patients", json!([1, 2])),
            Err(StoreError::NotAnObject)
        ));
    }

    #[test]
    fn insert_refuses_taken_ids_and_replaces_non_positive_ones() {
        let mut store = seeded();
        let err = store
            .insert("patients", json!({"PatientId": 1, "PatientName": "Impostor"}))
            .expect_err("patient 1 exists");
        assert!(matches!(err, StoreError::Conflict { id: RecordId::Int(1), .. }));
        // camelCase seed record 3 is matched too.
        assert!(matches!(
            store.insert("patients", json!({"PatientId": 3})),
            Err(StoreError::Conflict { .. })
        ));
        assert_eq!(store.list("patients").expect("patients").len(), 3);
        assert_eq!(
            store.get("patients", RecordId::Int(1)).expect("original")["PatientName"],
            json!("Asha Rao")
        );

        let created = store
            .insert("patients", json!({"PatientId": -7, "PatientName": "Dana Scott"}))
            .expect("negative id is replaced");
        assert_eq!(created["PatientId"], json!(4));

        let created = store
            .insert("patients", json!({"PatientId": 10, "PatientName": "Eli Hart"}))
            .expect("free explicit id");
        assert_eq!(created["PatientId"], json!(10));
        let next = store
            .insert("patients", json!({"PatientName": "Fay Moss"}))
            .expect("assigned");
        assert_eq!(next["PatientId"], json!(11));
    }

    #[test]
    fn camel_case_seed_records_are_addressable() {
        let store = seeded();
        let chen = store.get("patients", RecordId::Int(3)).expect("camelCase record");
        assert_eq!(chen["patientName"], json!("Chen Li"));
    }

    #[test]
    fn update_merges_and_keeps_id() {
        let mut store = seeded();
        let updated = store
            .update(
                "emergency-admissions",
                RecordId::Int(1),
                json!({"EmergencyStatus": "Discharged", "EmergencyAdmissionId": 500}),
            )
            .expect("update");
        assert_eq!(updated["EmergencyStatus"], json!("Discharged"));
        assert_eq!(updated["EmergencyAdmissionId"], json!(1));

        let err = store
            .update("emergency-admissions", RecordId::Int(500), json!({}))
            .expect_err("missing");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn counts_follow_the_records() {
        let mut store = seeded();
        assert_eq!(store.count(DashboardMetric::TotalPatients), 3);
        assert_eq!(store.count(DashboardMetric::TotalStaff), 4);
        assert_eq!(store.count(DashboardMetric::TotalDoctors), 2);
        assert_eq!(store.count(DashboardMetric::TotalNurses), 2);
        assert_eq!(store.count(DashboardMetric::EmergencyAdmissions), 2);
        // Emergency: 3 in service, beds 1 and 2 held. ICU: 1 of 2 free. Rooms: all 3 free.
        assert_eq!(store.count(DashboardMetric::AvailableBeds), 5);

        store
            .remove("emergency-admissions", RecordId::Int(1))
            .expect("remove");
        assert_eq!(store.count(DashboardMetric::EmergencyAdmissions), 1);
        assert_eq!(store.count(DashboardMetric::AvailableBeds), 6);
    }
}
