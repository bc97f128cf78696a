//! Occupancy derived from admission records.
//!
//! The backend's own occupied flags are not trusted. A unit (bed, slot, theatre) is occupied when
//! at least one claim on it is active, not in a terminal lifecycle state and, for boards whose
//! rule says so, not transferred away. A unit with no such claim is free.
//!
//! Which unit a claim points at depends on the board: an emergency admission holds a bed on the
//! bed board and a slot on the slot board. Callers therefore pass a key function next to the
//! claims rather than the claim deciding for itself.

use std::collections::HashMap;

use hms_wire::{
    AdmissionStatus, EmergencyAdmission, EmergencyBed, EmergencyBedSlot, IcuAdmission, IcuBed,
    OperationTheatre, OtAllocation, RecordId, RecordStatus, RoomAdmission, RoomBed,
};
use serde::Serialize;

/// Something a patient can occupy.
pub trait Occupiable {
    fn unit_id(&self) -> RecordId;

    /// False for units that are switched off; they are left out of summaries.
    fn is_in_service(&self) -> bool {
        true
    }
}

/// A record that may hold a unit.
pub trait OccupancyClaim {
    fn claim_id(&self) -> RecordId;
    fn record_status(&self) -> RecordStatus;
    fn lifecycle(&self) -> &AdmissionStatus;

    fn is_transferred(&self) -> bool {
        false
    }
}

/// Per-board occupancy rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OccupancyRule {
    /// Ignore claims handed over to IPD, OT or ICU.
    pub exclude_transferred: bool,
}

impl OccupancyRule {
    pub const EMERGENCY: Self = Self {
        exclude_transferred: true,
    };
    pub const ICU: Self = Self {
        exclude_transferred: true,
    };
    pub const ROOM: Self = Self {
        exclude_transferred: false,
    };
    pub const OT: Self = Self {
        exclude_transferred: false,
    };
}

/// True if `claim` currently holds whatever unit it points at.
pub fn holds_unit<C: OccupancyClaim>(claim: &C, rule: OccupancyRule) -> bool {
    claim.record_status().is_active()
        && !claim.lifecycle().is_terminal()
        && !(rule.exclude_transferred && claim.is_transferred())
}

/// Maps each occupied unit id to the ids of the claims holding it.
pub fn occupied_ids<C, K>(claims: &[C], rule: OccupancyRule, key: K) -> HashMap<RecordId, Vec<RecordId>>
where
    C: OccupancyClaim,
    K: Fn(&C) -> Option<RecordId>,
{
    let mut held: HashMap<RecordId, Vec<RecordId>> = HashMap::new();
    for claim in claims.iter().filter(|c| holds_unit(*c, rule)) {
        if let Some(unit) = key(claim).filter(|id| !id.is_unset()) {
            held.entry(unit).or_default().push(claim.claim_id());
        }
    }
    held
}

/// A unit paired with its derived occupancy.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOccupancy<U> {
    pub unit: U,
    pub occupied: bool,
    pub occupied_by: Vec<RecordId>,
}

/// Derives occupancy for every unit, keeping the input order.
///
/// # Arguments
///
/// * `units` - Beds, slots or theatres on the board.
/// * `claims` - Every admission or allocation fetched for the board, in any state.
/// * `rule` - The board's [`OccupancyRule`].
/// * `key` - Picks the unit id a claim points at on this board.
pub fn derive_occupancy<U, C, K>(
    units: Vec<U>,
    claims: &[C],
    rule: OccupancyRule,
    key: K,
) -> Vec<UnitOccupancy<U>>
where
    U: Occupiable,
    C: OccupancyClaim,
    K: Fn(&C) -> Option<RecordId>,
{
    let held = occupied_ids(claims, rule, key);
    units
        .into_iter()
        .map(|unit| {
            // Joined listings can repeat a unit; every row shares the claims.
            let occupied_by = held.get(&unit.unit_id()).cloned().unwrap_or_default();
            UnitOccupancy {
                occupied: !occupied_by.is_empty(),
                occupied_by,
                unit,
            }
        })
        .collect()
}

/// Counts over in-service units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OccupancySummary {
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
}

impl OccupancySummary {
    pub fn of<U: Occupiable>(units: &[UnitOccupancy<U>]) -> Self {
        let in_service = units.iter().filter(|u| u.unit.is_in_service());
        let (total, occupied) = in_service.fold((0, 0), |(total, occupied), u| {
            (total + 1, occupied + usize::from(u.occupied))
        });
        Self {
            total,
            occupied,
            available: total - occupied,
        }
    }
}

/// Bed-board key for emergency admissions.
///
/// Older admissions only reference an emergency bed slot. Those are traced to the slot's parent
/// bed using `slots`; admissions whose slot is unknown claim nothing on the bed board.
pub fn resolve_legacy_slots(
    slots: &[EmergencyBedSlot],
) -> impl Fn(&EmergencyAdmission) -> Option<RecordId> {
    let parents: HashMap<RecordId, RecordId> = slots
        .iter()
        .filter_map(|slot| slot.bed_id.map(|bed| (slot.id, bed)))
        .collect();

    move |admission| {
        admission
            .bed_id
            .or_else(|| admission.slot_id.and_then(|slot| parents.get(&slot).copied()))
    }
}

// ============================================================================
// Wire record impls
// ============================================================================

macro_rules! occupiable_by_status {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Occupiable for $ty {
                fn unit_id(&self) -> RecordId {
                    self.id
                }

                fn is_in_service(&self) -> bool {
                    self.status.is_active()
                }
            }
        )*
    };
}

occupiable_by_status!(EmergencyBed, EmergencyBedSlot, IcuBed, RoomBed, OperationTheatre);

impl OccupancyClaim for EmergencyAdmission {
    fn claim_id(&self) -> RecordId {
        self.id
    }

    fn record_status(&self) -> RecordStatus {
        self.status
    }

    fn lifecycle(&self) -> &AdmissionStatus {
        &self.lifecycle
    }

    fn is_transferred(&self) -> bool {
        EmergencyAdmission::is_transferred(self)
    }
}

impl OccupancyClaim for IcuAdmission {
    fn claim_id(&self) -> RecordId {
        self.id
    }

    fn record_status(&self) -> RecordStatus {
        self.status
    }

    fn lifecycle(&self) -> &AdmissionStatus {
        &self.lifecycle
    }

    fn is_transferred(&self) -> bool {
        IcuAdmission::is_transferred(self)
    }
}

impl OccupancyClaim for RoomAdmission {
    fn claim_id(&self) -> RecordId {
        self.id
    }

    fn record_status(&self) -> RecordStatus {
        self.status
    }

    fn lifecycle(&self) -> &AdmissionStatus {
        &self.lifecycle
    }
}

impl OccupancyClaim for OtAllocation {
    fn claim_id(&self) -> RecordId {
        self.id
    }

    fn record_status(&self) -> RecordStatus {
        self.status
    }

    fn lifecycle(&self) -> &AdmissionStatus {
        &self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hms_wire::{normalize_list, TransferTarget};
    use serde_json::json;

    fn beds() -> Vec<EmergencyBed> {
        normalize_list(&json!([
            {"EmergencyBedId": 1, "EmergencyBedNo": "ER-01"},
            {"EmergencyBedId": 2, "EmergencyBedNo": "ER-02", "IsOccupied": true},
            {"EmergencyBedId": 3, "EmergencyBedNo": "ER-03", "Status": "Inactive"}
        ]))
    }

    fn admission(id: i64, bed: i64, lifecycle: &str) -> EmergencyAdmission {
        let mut list: Vec<EmergencyAdmission> = normalize_list(&json!([{
            "EmergencyAdmissionId": id,
            "EmergencyBedId": bed,
            "EmergencyStatus": lifecycle,
            "Status": "Active"
        }]));
        list.remove(0)
    }

    fn by_bed(a: &EmergencyAdmission) -> Option<RecordId> {
        a.bed_id
    }

    #[test]
    fn no_claims_means_nothing_occupied() {
        let board = derive_occupancy(beds(), &[], OccupancyRule::EMERGENCY, by_bed);
        assert!(board.iter().all(|u| !u.occupied));
        // The backend flag on bed 2 is ignored.
        assert!(!board[1].occupied);
    }

    #[test]
    fn one_active_claim_is_enough() {
        let claims = vec![admission(10, 1, "Admitted")];
        let board = derive_occupancy(beds(), &claims, OccupancyRule::EMERGENCY, by_bed);

        assert!(board[0].occupied);
        assert_eq!(board[0].occupied_by, vec![RecordId::Int(10)]);
        assert!(!board[1].occupied);
    }

    #[test]
    fn terminal_inactive_and_transferred_claims_release_the_unit() {
        let mut inactive = admission(11, 1, "Admitted");
        inactive.status = RecordStatus::Inactive;

        let mut transferred = admission(12, 1, "Admitted");
        transferred.transfer_to = Some(TransferTarget::Icu);
        transferred.transferred = true;

        let claims = vec![
            admission(13, 1, "Discharged"),
            admission(14, 1, "Moved Out"),
            inactive,
            transferred.clone(),
        ];
        let board = derive_occupancy(beds(), &claims, OccupancyRule::EMERGENCY, by_bed);
        assert!(!board[0].occupied);

        // Room and OT boards keep transferred claims.
        let board = derive_occupancy(beds(), &[transferred], OccupancyRule::ROOM, by_bed);
        assert!(board[0].occupied);
    }

    #[test]
    fn repeated_unit_rows_are_all_occupied() {
        let rows: Vec<EmergencyBed> = normalize_list(&json!([
            {"EmergencyBedId": 1, "EmergencyBedNo": "ER-01"},
            {"EmergencyBedId": 1, "EmergencyBedNo": "ER-01"}
        ]));
        let claims = vec![admission(16, 1, "Admitted")];
        let board = derive_occupancy(rows, &claims, OccupancyRule::EMERGENCY, by_bed);

        assert!(board.iter().all(|u| u.occupied));
        assert!(board.iter().all(|u| u.occupied_by == vec![RecordId::Int(16)]));
        let summary = OccupancySummary::of(&board);
        assert_eq!((summary.occupied, summary.available), (2, 0));
    }

    #[test]
    fn unspecified_lifecycle_still_holds() {
        let claims = vec![admission(15, 2, "")];
        let board = derive_occupancy(beds(), &claims, OccupancyRule::EMERGENCY, by_bed);
        assert!(board[1].occupied);
    }

    #[test]
    fn legacy_slot_claims_resolve_to_parent_bed() {
        let slots: Vec<EmergencyBedSlot> = normalize_list(&json!([
            {"EmergencyBedSlotId": 21, "EmergencyBedId": 2},
            {"EmergencyBedSlotId": 99}
        ]));
        let claims: Vec<EmergencyAdmission> = normalize_list(&json!([
            {"EmergencyAdmissionId": 1, "EmergencyBedSlotId": 21, "EmergencyStatus": "Admitted"},
            {"EmergencyAdmissionId": 2, "EmergencyBedSlotId": 99, "EmergencyStatus": "Admitted"}
        ]));

        let beds = derive_occupancy(beds(), &claims, OccupancyRule::EMERGENCY, resolve_legacy_slots(&slots));
        assert!(!beds[0].occupied);
        assert!(beds[1].occupied);
        assert_eq!(beds[1].occupied_by, vec![RecordId::Int(1)]);

        let slot_board = derive_occupancy(slots, &claims, OccupancyRule::EMERGENCY, |a: &EmergencyAdmission| a.slot_id);
        assert!(slot_board.iter().all(|u| u.occupied));
    }

    #[test]
    fn summary_counts_in_service_units_only() {
        let claims = vec![admission(10, 1, "Admitted"), admission(16, 3, "Admitted")];
        let board = derive_occupancy(beds(), &claims, OccupancyRule::EMERGENCY, by_bed);

        // Bed 3 is occupied but out of service.
        assert!(board[2].occupied);
        assert_eq!(
            OccupancySummary::of(&board),
            OccupancySummary {
                total: 2,
                occupied: 1,
                available: 1
            }
        );
    }
}
