//! Mock backend settings, resolved once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use hms_core::constants::ENV_STUB_FIXTURES;
use hms_core::{HmsError, HmsResult, StubStore};

use crate::envelope::{envelope_from_env_value, EnvelopeShape};

pub const DEFAULT_MOCK_ADDR: &str = "0.0.0.0:5000";
pub const ENV_MOCK_ADDR: &str = "HMS_MOCK_ADDR";
pub const ENV_MOCK_ENVELOPE: &str = "HMS_MOCK_ENVELOPE";

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub addr: SocketAddr,
    pub envelope: EnvelopeShape,
    /// Seed fixture file; the embedded fixtures are used when unset.
    pub fixtures: Option<PathBuf>,
}

impl MockConfig {
    /// Reads `HMS_MOCK_ADDR`, `HMS_MOCK_ENVELOPE` and `HMS_STUB_FIXTURES`.
    pub fn from_env() -> HmsResult<Self> {
        Ok(Self {
            addr: mock_addr_from_env_value(std::env::var(ENV_MOCK_ADDR).ok())?,
            envelope: envelope_from_env_value(std::env::var(ENV_MOCK_ENVELOPE).ok())?,
            fixtures: std::env::var(ENV_STUB_FIXTURES)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Loads the seed fixtures this config points at.
    pub fn seed(&self) -> HmsResult<StubStore> {
        match &self.fixtures {
            Some(path) => StubStore::from_file(path),
            None => StubStore::embedded(),
        }
    }
}

/// Parse the bind address. Missing or blank gives [`DEFAULT_MOCK_ADDR`].
pub fn mock_addr_from_env_value(value: Option<String>) -> HmsResult<SocketAddr> {
    let raw = value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_MOCK_ADDR.to_owned());
    raw.parse().map_err(|e| {
        HmsError::InvalidInput(format!("{ENV_MOCK_ADDR} must be host:port, got {raw:?}: {e}"))
    })
}
