//! ICU beds and admissions.

use hms_wire::{IcuAdmission, IcuBed};

use crate::fallback::Loaded;
use crate::occupancy::OccupancyRule;
use crate::resources::{load_board, Board, ResourceService};
use crate::HmsResult;

#[derive(Clone, Debug)]
pub struct IcuService {
    pub beds: ResourceService<IcuBed>,
    pub admissions: ResourceService<IcuAdmission>,
}

impl IcuService {
    /// ICU bed occupancy. Patients moved out to another unit no longer hold their bed.
    pub async fn board(&self) -> HmsResult<Loaded<Board<IcuBed>>> {
        load_board(&self.beds, &self.admissions, OccupancyRule::ICU, |a: &IcuAdmission| {
            a.icu_id
        })
        .await
    }
}
