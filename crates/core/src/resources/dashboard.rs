//! Dashboard headline counts.

use hms_wire::extract_count;
use serde::Serialize;

use crate::client::ApiClient;
use crate::fallback::{merge_sources, Fallback, Loaded};
use crate::{HmsError, HmsResult};

/// A count served under `/dashboard/{key}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DashboardMetric {
    TotalPatients,
    TotalStaff,
    TotalDoctors,
    TotalNurses,
    EmergencyAdmissions,
    AvailableBeds,
}

impl DashboardMetric {
    pub const ALL: [DashboardMetric; 6] = [
        DashboardMetric::TotalPatients,
        DashboardMetric::TotalStaff,
        DashboardMetric::TotalDoctors,
        DashboardMetric::TotalNurses,
        DashboardMetric::EmergencyAdmissions,
        DashboardMetric::AvailableBeds,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DashboardMetric::TotalPatients => "total-patients",
            DashboardMetric::TotalStaff => "total-staff",
            DashboardMetric::TotalDoctors => "total-doctors",
            DashboardMetric::TotalNurses => "total-nurses",
            DashboardMetric::EmergencyAdmissions => "emergency-admissions",
            DashboardMetric::AvailableBeds => "available-beds",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn path(self) -> String {
        format!("dashboard/{}", self.key())
    }
}

/// Every dashboard count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_patients: u64,
    pub total_staff: u64,
    pub total_doctors: u64,
    pub total_nurses: u64,
    pub emergency_admissions: u64,
    pub available_beds: u64,
}

#[derive(Clone, Debug)]
pub struct DashboardService {
    client: ApiClient,
    fallback: Fallback,
}

impl DashboardService {
    pub fn new(client: ApiClient, fallback: Fallback) -> Self {
        Self { client, fallback }
    }

    /// One count. Bodies without a recognisable number count as zero.
    pub async fn count(&self, metric: DashboardMetric) -> HmsResult<Loaded<u64>> {
        let live = async {
            let body = self.client.get_json(&metric.path()).await?;
            Ok::<_, HmsError>(extract_count(&body))
        };
        self.fallback
            .run(metric.key(), live, |stubs| stubs.count(metric.key()))
            .await
    }

    /// All counts, fetched concurrently.
    pub async fn summary(&self) -> HmsResult<Loaded<DashboardSummary>> {
        let (patients, staff, doctors, nurses, emergency, beds) = tokio::try_join!(
            self.count(DashboardMetric::TotalPatients),
            self.count(DashboardMetric::TotalStaff),
            self.count(DashboardMetric::TotalDoctors),
            self.count(DashboardMetric::TotalNurses),
            self.count(DashboardMetric::EmergencyAdmissions),
            self.count(DashboardMetric::AvailableBeds),
        )?;

        let source = [&staff, &doctors, &nurses, &emergency, &beds]
            .iter()
            .fold(patients.source, |acc, l| merge_sources(acc, l.source));

        Ok(Loaded {
            data: DashboardSummary {
                total_patients: patients.data,
                total_staff: staff.data,
                total_doctors: doctors.data,
                total_nurses: nurses.data,
                emergency_admissions: emergency.data,
                available_beds: beds.data,
            },
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_keys_round_trip() {
        for metric in DashboardMetric::ALL {
            assert_eq!(DashboardMetric::from_key(metric.key()), Some(metric));
        }
        assert_eq!(DashboardMetric::from_key("total-visitors"), None);
        assert_eq!(
            DashboardMetric::AvailableBeds.path(),
            "dashboard/available-beds"
        );
    }
}
