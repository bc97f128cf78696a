//! Generic CRUD over backend resources, plus the board and dashboard services built on it.
//!
//! Reads fall back to stub fixtures when enabled (see [`crate::fallback`]). Writes always go to
//! the live backend and never fall back.

pub mod dashboard;
pub mod emergency;
pub mod icu;
pub mod ot;
pub mod rooms;

use std::marker::PhantomData;

use hms_wire::{normalize_list, normalize_one, Patient, RecordId, Resource, Staff};
use serde::Serialize;

use crate::client::ApiClient;
use crate::fallback::{merge_sources, Fallback, Loaded};
use crate::occupancy::{
    derive_occupancy, OccupancyClaim, OccupancyRule, OccupancySummary, Occupiable, UnitOccupancy,
};
use crate::{HmsError, HmsResult};

/// CRUD access to one backend collection.
#[derive(Clone, Debug)]
pub struct ResourceService<R> {
    client: ApiClient,
    fallback: Fallback,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: ApiClient, fallback: Fallback) -> Self {
        Self {
            client,
            fallback,
            _resource: PhantomData,
        }
    }

    fn item_path(id: RecordId) -> String {
        format!("{}/{id}", R::PATH)
    }

    fn not_found(id: RecordId) -> HmsError {
        HmsError::NotFound {
            resource: R::NAME,
            id,
        }
    }

    /// Fetches the whole collection from the live backend, without fallback.
    pub async fn fetch_all(&self) -> HmsResult<Vec<R>> {
        let body = self.client.get_json(R::PATH).await?;
        let records: Vec<R> = normalize_list(&body);
        tracing::debug!(resource = R::NAME, count = records.len(), "fetched collection");
        Ok(records)
    }

    /// Lists every record, falling back to fixtures if the backend is unreachable.
    ///
    /// # Errors
    ///
    /// Returns the live error when fallback is off or the fixtures have no entry for `R`.
    pub async fn list(&self) -> HmsResult<Loaded<Vec<R>>> {
        self.fallback
            .run(R::NAME, self.fetch_all(), |stubs| stubs.collection::<R>())
            .await
    }

    /// Fetches one record by id.
    ///
    /// # Errors
    ///
    /// Returns [`HmsError::NotFound`] when the backend answers 404 or with no record, and no
    /// fixture stands in for it.
    pub async fn get(&self, id: RecordId) -> HmsResult<Loaded<R>> {
        let live = async {
            let body = self
                .client
                .get_json(&Self::item_path(id))
                .await
                .map_err(|e| match e {
                    HmsError::Status { status: 404, .. } => Self::not_found(id),
                    other => other,
                })?;
            normalize_one(&body).ok_or_else(|| Self::not_found(id))
        };

        self.fallback
            .run(R::NAME, live, |stubs| stubs.find::<R>(id))
            .await
    }

    /// Creates a record. Returns the stored record when the backend echoes it.
    pub async fn create<P>(&self, payload: &P) -> HmsResult<Option<R>>
    where
        P: Serialize + ?Sized,
    {
        let body = self.client.post_json(R::PATH, payload).await?;
        tracing::info!(resource = R::NAME, "created record");
        Ok(normalize_one(&body))
    }

    /// Updates a record. Returns the stored record when the backend echoes it.
    pub async fn update<P>(&self, id: RecordId, payload: &P) -> HmsResult<Option<R>>
    where
        P: Serialize + ?Sized,
    {
        let body = self
            .client
            .put_json(&Self::item_path(id), payload)
            .await
            .map_err(|e| match e {
                HmsError::Status { status: 404, .. } => Self::not_found(id),
                other => other,
            })?;
        tracing::info!(resource = R::NAME, %id, "updated record");
        Ok(normalize_one(&body))
    }

    pub async fn delete(&self, id: RecordId) -> HmsResult<()> {
        self.client
            .delete(&Self::item_path(id))
            .await
            .map_err(|e| match e {
                HmsError::Status { status: 404, .. } => Self::not_found(id),
                other => other,
            })?;
        tracing::info!(resource = R::NAME, %id, "deleted record");
        Ok(())
    }
}

impl ResourceService<Patient> {
    /// Patients whose name, phone or id contains `query`. A blank query lists everyone.
    pub async fn search(&self, query: &str) -> HmsResult<Loaded<Vec<Patient>>> {
        let query = query.trim();
        Ok(self.list().await?.map(|patients| {
            patients
                .into_iter()
                .filter(|p| query.is_empty() || p.matches_search(query))
                .collect()
        }))
    }
}

impl ResourceService<Staff> {
    /// Active staff holding `role`, compared case-insensitively.
    pub async fn with_role(&self, role: &str) -> HmsResult<Loaded<Vec<Staff>>> {
        Ok(self.list().await?.map(|staff| {
            staff
                .into_iter()
                .filter(|s| s.status.is_active() && s.has_role(role))
                .collect()
        }))
    }
}

// ============================================================================
// Boards
// ============================================================================

/// Units of one kind with derived occupancy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board<U> {
    pub units: Vec<UnitOccupancy<U>>,
    pub summary: OccupancySummary,
}

impl<U: Occupiable> Board<U> {
    pub fn new(units: Vec<UnitOccupancy<U>>) -> Self {
        let summary = OccupancySummary::of(&units);
        Self { units, summary }
    }
}

/// Loads units and claims concurrently and derives a board from them.
pub(crate) async fn load_board<U, C, K>(
    units: &ResourceService<U>,
    claims: &ResourceService<C>,
    rule: OccupancyRule,
    key: K,
) -> HmsResult<Loaded<Board<U>>>
where
    U: Resource + Occupiable,
    C: Resource + OccupancyClaim,
    K: Fn(&C) -> Option<RecordId>,
{
    let (units, claims) = tokio::try_join!(units.list(), claims.list())?;
    let source = merge_sources(units.source, claims.source);
    let board = Board::new(derive_occupancy(units.data, &claims.data, rule, key));
    Ok(Loaded {
        data: board,
        source,
    })
}
