//! Reductions from classified cohorts to report-ready numbers.

mod adoption;
mod funnel;
mod timing;
pub mod views;

pub use adoption::aggregate;
pub use funnel::funnel;
pub use timing::{SlaRule, TimingAggregator};
pub use views::{
    FunnelGroup, FunnelMetrics, GroupMetric, MetricSet, SlaBreach, TimingGroup, TimingStats,
};

use super::record::RawRecord;
use std::collections::HashMap;

/// Bucket label for records whose grouping field is missing or blank.
pub const UNASSIGNED_GROUP: &str = "Unassigned";

/// Percentage of `part` in `whole`, rounded half-up to one decimal; zero when `whole` is zero.
pub fn rate_pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let part = part as u128;
    let whole = whole as u128;
    // tenths of a percent, rounded half-up in integer space
    let tenths = (2000 * part + whole) / (2 * whole);
    tenths as f64 / 10.0
}

/// Round half-up to one decimal; non-finite input yields zero.
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Partition records by a column, ordered by key ascending ignoring case.
///
/// Keys equal under case folding keep first-appearance order. `Unassigned` sorts at its
/// ordinary alphabetical position.
pub(crate) fn group_by_field<'r, R>(records: &'r [R], field: &str) -> Vec<(String, Vec<&'r R>)>
where
    R: AsRef<RawRecord>,
{
    let mut groups: Vec<(String, Vec<&'r R>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = record
            .as_ref()
            .text(field)
            .unwrap_or_else(|| UNASSIGNED_GROUP.to_string());
        match positions.get(&key) {
            Some(&index) => groups[index].1.push(record),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![record]));
            }
        }
    }

    groups.sort_by_cached_key(|(key, _)| key.to_lowercase());
    groups
}
