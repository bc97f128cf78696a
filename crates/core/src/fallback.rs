//! Stub fallback for read calls.
//!
//! A read runs against the live backend first. If that fails and stub data is enabled, the
//! matching fixtures are returned instead and the result is marked [`DataSource::Stub`]. A live
//! call that succeeds is always returned as is, even when it carries no records.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::stubs::StubStore;
use crate::HmsResult;

/// Where a loaded value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Stub,
}

/// A value together with its [`DataSource`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Loaded<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Loaded<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    pub fn stub(data: T) -> Self {
        Self {
            data,
            source: DataSource::Stub,
        }
    }

    pub fn is_stub(&self) -> bool {
        self.source == DataSource::Stub
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Combines two loads; the result is stub-sourced if either part is.
pub fn merge_sources(a: DataSource, b: DataSource) -> DataSource {
    if a == DataSource::Stub || b == DataSource::Stub {
        DataSource::Stub
    } else {
        DataSource::Live
    }
}

#[derive(Clone, Debug)]
pub struct Fallback {
    enabled: bool,
    stubs: Arc<StubStore>,
}

impl Fallback {
    pub fn new(enabled: bool, stubs: Arc<StubStore>) -> Self {
        Self { enabled, stubs }
    }

    /// Awaits `live`; on error, answers from `stub` when fallback is enabled.
    ///
    /// # Arguments
    ///
    /// * `label` - Name of the call, used in logs.
    /// * `live` - The backend request.
    /// * `stub` - Produces fixture data. `None` means the fixtures have nothing to offer.
    ///
    /// # Errors
    ///
    /// Returns the live error when fallback is disabled or `stub` yields `None`.
    pub async fn run<T, Fut, S>(&self, label: &str, live: Fut, stub: S) -> HmsResult<Loaded<T>>
    where
        Fut: Future<Output = HmsResult<T>>,
        S: FnOnce(&StubStore) -> Option<T>,
    {
        let err = match live.await {
            Ok(data) => return Ok(Loaded::live(data)),
            Err(err) => err,
        };
        tracing::warn!(call = label, error = %err, "live call failed");

        if !self.enabled {
            return Err(err);
        }
        match stub(&self.stubs) {
            Some(data) => {
                tracing::warn!(call = label, "serving stub data");
                Ok(Loaded::stub(data))
            }
            None => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HmsError;

    fn stubs() -> Arc<StubStore> {
        Arc::new(StubStore::from_yaml("dashboard:\n  total-staff: 12\n").expect("fixtures"))
    }

    fn unreachable() -> HmsError {
        HmsError::Status {
            status: 503,
            url: "http://hms.local/api/users".into(),
        }
    }

    #[tokio::test]
    async fn live_success_is_never_replaced() {
        let fallback = Fallback::new(true, stubs());

        let loaded = fallback
            .run("staff", async { Ok(Vec::<u64>::new()) }, |_| Some(vec![1, 2, 3]))
            .await
            .expect("live result");

        assert_eq!(loaded.source, DataSource::Live);
        assert!(loaded.data.is_empty());
    }

    #[tokio::test]
    async fn failure_uses_stub_only_when_enabled() {
        let enabled = Fallback::new(true, stubs());
        let loaded = enabled
            .run("total-staff", async { Err(unreachable()) }, |s| {
                s.count("total-staff")
            })
            .await
            .expect("stub result");
        assert_eq!(loaded, Loaded::stub(12));

        let disabled = Fallback::new(false, stubs());
        let err = disabled
            .run("total-staff", async { Err::<u64, _>(unreachable()) }, |s| {
                s.count("total-staff")
            })
            .await
            .expect_err("error propagates");
        assert!(matches!(err, HmsError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn failure_without_fixture_propagates() {
        let fallback = Fallback::new(true, stubs());
        let err = fallback
            .run("total-doctors", async { Err::<u64, _>(unreachable()) }, |s| {
                s.count("total-doctors")
            })
            .await
            .expect_err("no fixture to fall back on");
        assert!(matches!(err, HmsError::Status { .. }));
    }

    #[test]
    fn merged_source_is_stub_if_any_part_is() {
        assert_eq!(merge_sources(DataSource::Live, DataSource::Live), DataSource::Live);
        assert_eq!(merge_sources(DataSource::Live, DataSource::Stub), DataSource::Stub);
        assert_eq!(merge_sources(DataSource::Stub, DataSource::Live), DataSource::Stub);
    }
}
