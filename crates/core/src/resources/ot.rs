//! Operation theatres and patient allocations.

use hms_wire::{OperationTheatre, OtAllocation};

use crate::fallback::Loaded;
use crate::occupancy::OccupancyRule;
use crate::resources::{load_board, Board, ResourceService};
use crate::HmsResult;

#[derive(Clone, Debug)]
pub struct OtService {
    pub theatres: ResourceService<OperationTheatre>,
    pub allocations: ResourceService<OtAllocation>,
}

impl OtService {
    /// Theatres in use. Scheduled and in-progress allocations hold a theatre; completed and
    /// cancelled ones do not.
    pub async fn board(&self) -> HmsResult<Loaded<Board<OperationTheatre>>> {
        load_board(
            &self.theatres,
            &self.allocations,
            OccupancyRule::OT,
            |a: &OtAllocation| a.ot_id,
        )
        .await
    }
}
