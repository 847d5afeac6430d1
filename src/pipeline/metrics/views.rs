use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetric {
    pub key: String,
    pub eligible: usize,
    pub taken: usize,
    pub ineligible: usize,
    pub rate_pct: f64,
}

/// Adoption counts for one cohort, optionally split by a dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSet {
    pub total_eligible: usize,
    pub total_taken: usize,
    pub total_ineligible: usize,
    pub adoption_rate_pct: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupMetric>,
}

impl MetricSet {
    pub fn group(&self, key: &str) -> Option<&GroupMetric> {
        self.groups.iter().find(|group| group.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelGroup {
    pub key: String,
    pub invited: usize,
    pub scheduled: usize,
    pub completed: usize,
    pub feedback_provided: usize,
    pub completion_rate_pct: f64,
}

/// Invite → schedule → complete → feedback progression.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunnelMetrics {
    pub invited: usize,
    pub scheduled: usize,
    pub completed: usize,
    pub feedback_provided: usize,
    pub completion_rate_pct: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<FunnelGroup>,
}

impl FunnelMetrics {
    pub fn group(&self, key: &str) -> Option<&FunnelGroup> {
        self.groups.iter().find(|group| group.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingGroup {
    pub key: String,
    pub samples: usize,
    pub missing: usize,
    pub mean_days: f64,
    pub median_days: f64,
    pub mean_business_days: f64,
}

/// Elapsed time between two events per record, in calendar and business days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimingStats {
    pub samples: usize,
    pub missing: usize,
    pub mean_days: f64,
    pub median_days: f64,
    pub mean_business_days: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<TimingGroup>,
}

impl TimingStats {
    pub fn group(&self, key: &str) -> Option<&TimingGroup> {
        self.groups.iter().find(|group| group.key == key)
    }
}

/// A record that has waited longer than the SLA allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlaBreach {
    pub profile_id: String,
    pub position_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub since: DateTime<Utc>,
    pub business_days: u32,
}
