//! Triage ordering for emergency admissions.

use std::cmp::Ordering;

use hms_wire::EmergencyAdmission;

use crate::occupancy::{holds_unit, OccupancyRule};

/// Sorts most urgent first.
///
/// Order is by priority (`Critical` first, `Unspecified` last), then earlier admission time
/// with missing times last, then id. The sort is stable.
pub fn sort_by_priority(admissions: &mut [EmergencyAdmission]) {
    admissions.sort_by(triage_order);
}

fn triage_order(a: &EmergencyAdmission, b: &EmergencyAdmission) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| match (a.admitted_at, b.admitted_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Admissions still holding an emergency bed, most urgent first.
pub fn triage_queue(admissions: Vec<EmergencyAdmission>) -> Vec<EmergencyAdmission> {
    let mut queue: Vec<EmergencyAdmission> = admissions
        .into_iter()
        .filter(|a| holds_unit(a, OccupancyRule::EMERGENCY))
        .collect();
    sort_by_priority(&mut queue);
    queue
}
