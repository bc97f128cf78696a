//! # HMS Core
//!
//! Client-side services for the Hospital Management System REST backend.
//!
//! This crate focuses on:
//! - fetching and writing resources over HTTP ([`client`], [`resources`])
//! - falling back to stub fixtures when the backend is unreachable ([`fallback`], [`stubs`])
//! - deriving bed, slot and theatre occupancy from admission records ([`occupancy`])
//! - ordering the emergency triage queue ([`priority`])
//!
//! Response shapes are handled by `hms-wire`; nothing here inspects raw JSON field names.
//!
//! **No presentation concerns**: rendering belongs in `hms-cli`, serving in `api-mock`.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod fallback;
pub mod occupancy;
pub mod priority;
pub mod resources;
pub mod stubs;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{HmsError, HmsResult};
pub use fallback::{DataSource, Fallback, Loaded};
pub use occupancy::{
    derive_occupancy, holds_unit, occupied_ids, resolve_legacy_slots, OccupancyClaim,
    OccupancyRule, OccupancySummary, Occupiable, UnitOccupancy,
};
pub use priority::{sort_by_priority, triage_queue};
pub use resources::dashboard::{DashboardMetric, DashboardService, DashboardSummary};
pub use resources::emergency::{EmergencyBoard, EmergencyService};
pub use resources::icu::IcuService;
pub use resources::ot::OtService;
pub use resources::rooms::RoomService;
pub use resources::{Board, ResourceService};
pub use stubs::StubStore;

use std::sync::Arc;

use hms_wire::{Patient, Resource, Staff};

/// Entry point handing out per-resource services that share one HTTP client and fixture set.
#[derive(Clone, Debug)]
pub struct HmsService {
    client: ApiClient,
    fallback: Fallback,
}

impl HmsService {
    /// Creates a new `HmsService`.
    ///
    /// # Arguments
    ///
    /// * `cfg` - Configuration resolved at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, or stub fallback is on and the
    /// fixtures cannot be loaded.
    pub fn new(cfg: Arc<ClientConfig>) -> HmsResult<Self> {
        let client = ApiClient::new(&cfg)?;
        // Fixtures are only read when they can be served.
        let stubs = if cfg.use_stub_data() {
            StubStore::load(&cfg)?
        } else {
            StubStore::default()
        };
        let fallback = Fallback::new(cfg.use_stub_data(), Arc::new(stubs));

        tracing::debug!(
            base_url = %cfg.base_url(),
            stub_fallback = cfg.use_stub_data(),
            "HMS client ready"
        );
        Ok(Self { client, fallback })
    }

    pub fn resource<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(self.client.clone(), self.fallback.clone())
    }

    pub fn patients(&self) -> ResourceService<Patient> {
        self.resource()
    }

    pub fn staff(&self) -> ResourceService<Staff> {
        self.resource()
    }

    pub fn emergency(&self) -> EmergencyService {
        EmergencyService {
            beds: self.resource(),
            slots: self.resource(),
            admissions: self.resource(),
        }
    }

    pub fn icu(&self) -> IcuService {
        IcuService {
            beds: self.resource(),
            admissions: self.resource(),
        }
    }

    pub fn rooms(&self) -> RoomService {
        RoomService {
            beds: self.resource(),
            admissions: self.resource(),
        }
    }

    pub fn theatres(&self) -> OtService {
        OtService {
            theatres: self.resource(),
            allocations: self.resource(),
        }
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.client.clone(), self.fallback.clone())
    }
}
