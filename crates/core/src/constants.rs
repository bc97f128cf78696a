//! Constants used throughout the HMS core crate.

use std::time::Duration;

/// API base URL used when `HMS_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Request timeout used when `HMS_HTTP_TIMEOUT_SECS` is not set.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable naming the API base URL.
pub const ENV_API_BASE_URL: &str = "HMS_API_BASE_URL";

/// Environment variable toggling stub fallback.
pub const ENV_USE_STUB_DATA: &str = "HMS_USE_STUB_DATA";

/// Environment variable holding the request timeout in whole seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HMS_HTTP_TIMEOUT_SECS";

/// Environment variable pointing at a YAML fixture file that replaces the embedded one.
pub const ENV_STUB_FIXTURES: &str = "HMS_STUB_FIXTURES";

/// Fixture key holding dashboard counts.
pub const DASHBOARD_FIXTURE_KEY: &str = "dashboard";

/// Fixtures compiled into the binary.
pub const EMBEDDED_FIXTURES: &str = include_str!("../fixtures/stub_data.yaml");
