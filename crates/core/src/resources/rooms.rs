//! Ward room beds and admissions.

use hms_wire::{RoomAdmission, RoomBed};

use crate::fallback::Loaded;
use crate::occupancy::OccupancyRule;
use crate::resources::{load_board, Board, ResourceService};
use crate::HmsResult;

#[derive(Clone, Debug)]
pub struct RoomService {
    pub beds: ResourceService<RoomBed>,
    pub admissions: ResourceService<RoomAdmission>,
}

impl RoomService {
    pub async fn board(&self) -> HmsResult<Loaded<Board<RoomBed>>> {
        load_board(
            &self.beds,
            &self.admissions,
            OccupancyRule::ROOM,
            |a: &RoomAdmission| a.room_bed_id,
        )
        .await
    }
}
