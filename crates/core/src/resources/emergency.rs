//! Emergency department: beds, slots, admissions and the triage queue.

use hms_wire::{
    EmergencyAdmission, EmergencyBed, EmergencyBedSlot, EmergencyStatusUpdate,
    NewEmergencyAdmission, RecordId, Resource, TransferTarget,
};
use serde::Serialize;

use crate::fallback::{merge_sources, Loaded};
use crate::occupancy::{derive_occupancy, occupied_ids, resolve_legacy_slots, OccupancyRule};
use crate::priority::triage_queue;
use crate::resources::{Board, ResourceService};
use crate::{HmsError, HmsResult};

/// Emergency beds and their slots with derived occupancy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmergencyBoard {
    pub beds: Board<EmergencyBed>,
    pub slots: Board<EmergencyBedSlot>,
}

#[derive(Clone, Debug)]
pub struct EmergencyService {
    pub beds: ResourceService<EmergencyBed>,
    pub slots: ResourceService<EmergencyBedSlot>,
    pub admissions: ResourceService<EmergencyAdmission>,
}

impl EmergencyService {
    /// Bed and slot occupancy, derived from the admission list.
    ///
    /// Admissions that only carry a slot id are counted against the slot's parent bed.
    pub async fn board(&self) -> HmsResult<Loaded<EmergencyBoard>> {
        let (beds, slots, admissions) = tokio::try_join!(
            self.beds.list(),
            self.slots.list(),
            self.admissions.list()
        )?;
        let source = merge_sources(
            merge_sources(beds.source, slots.source),
            admissions.source,
        );

        let rule = OccupancyRule::EMERGENCY;
        let bed_key = resolve_legacy_slots(&slots.data);
        let beds = Board::new(derive_occupancy(beds.data, &admissions.data, rule, bed_key));
        let slots = Board::new(derive_occupancy(
            slots.data,
            &admissions.data,
            rule,
            |a: &EmergencyAdmission| a.slot_id,
        ));

        Ok(Loaded {
            data: EmergencyBoard { beds, slots },
            source,
        })
    }

    /// Admissions still holding a bed, most urgent first.
    pub async fn active_admissions(&self) -> HmsResult<Loaded<Vec<EmergencyAdmission>>> {
        Ok(self.admissions.list().await?.map(triage_queue))
    }

    /// Admits a patient to an emergency bed.
    ///
    /// Occupancy is checked against live data first; stub data is never consulted for writes.
    ///
    /// # Errors
    ///
    /// Returns [`HmsError::Occupied`] if an active admission already holds the bed, directly or
    /// through one of its slots.
    pub async fn admit(
        &self,
        admission: &NewEmergencyAdmission,
    ) -> HmsResult<Option<EmergencyAdmission>> {
        let bed = admission.emergency_bed_id;
        if bed.is_unset() {
            return Err(HmsError::InvalidInput("an emergency bed is required".into()));
        }

        let (slots, admissions) =
            tokio::try_join!(self.slots.fetch_all(), self.admissions.fetch_all())?;
        let held = occupied_ids(
            &admissions,
            OccupancyRule::EMERGENCY,
            resolve_legacy_slots(&slots),
        );
        if let Some(holders) = held.get(&bed) {
            tracing::warn!(%bed, ?holders, "refusing admission to occupied bed");
            return Err(HmsError::Occupied {
                resource: EmergencyBed::NAME,
                id: bed,
            });
        }

        self.admissions.create(admission).await
    }

    pub async fn discharge(&self, id: RecordId) -> HmsResult<Option<EmergencyAdmission>> {
        self.admissions
            .update(id, &EmergencyStatusUpdate::discharge())
            .await
    }

    /// Hands an admission over to another department, releasing its emergency bed.
    pub async fn transfer(
        &self,
        id: RecordId,
        target: TransferTarget,
    ) -> HmsResult<Option<EmergencyAdmission>> {
        self.admissions
            .update(id, &EmergencyStatusUpdate::transfer(target))
            .await
    }
}
