use super::super::business_days::BusinessDayCalculator;
use super::super::dates::DateNormalizer;
use super::super::record::{CanonicalRecord, RawRecord};
use super::views::{SlaBreach, TimingGroup, TimingStats};
use super::{group_by_field, round1};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Which records to watch and how long they may wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaRule {
    pub since_field: String,
    pub threshold_business_days: u32,
    pub owner_field: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    days: f64,
    business_days: u32,
}

/// Time-to-event statistics and SLA checks built on the shared date handling.
#[derive(Debug, Clone, Default)]
pub struct TimingAggregator {
    normalizer: DateNormalizer,
    calculator: BusinessDayCalculator,
}

impl TimingAggregator {
    pub fn new(normalizer: DateNormalizer, calculator: BusinessDayCalculator) -> Self {
        Self {
            normalizer,
            calculator,
        }
    }

    /// Elapsed time from `from_field` to `to_field`.
    ///
    /// Records missing either instant, or where the second precedes the first, count as
    /// `missing` instead of contributing a sample.
    pub fn time_to_event<R>(
        &self,
        records: &[R],
        from_field: &str,
        to_field: &str,
        group_by: Option<&str>,
    ) -> TimingStats
    where
        R: AsRef<RawRecord>,
    {
        let (samples, missing) =
            self.collect_samples(records.iter().map(|r| r.as_ref()), from_field, to_field);
        let total = summarize(samples, missing);

        let groups = group_by
            .map(|field| {
                group_by_field(records, field)
                    .into_iter()
                    .map(|(key, members)| {
                        let (samples, missing) = self.collect_samples(
                            members.into_iter().map(|r| r.as_ref()),
                            from_field,
                            to_field,
                        );
                        let stats = summarize(samples, missing);
                        TimingGroup {
                            key,
                            samples: stats.samples,
                            missing: stats.missing,
                            mean_days: stats.mean_days,
                            median_days: stats.median_days,
                            mean_business_days: stats.mean_business_days,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        TimingStats { groups, ..total }
    }

    /// Records accepted by `filter` that have waited more than the allowed business days.
    ///
    /// Sorted longest wait first, then by profile and position id.
    pub fn sla_breaches<F>(
        &self,
        records: &[CanonicalRecord],
        rule: &SlaRule,
        as_of: DateTime<Utc>,
        filter: F,
    ) -> Vec<SlaBreach>
    where
        F: Fn(&CanonicalRecord) -> bool,
    {
        let mut breaches: Vec<SlaBreach> = records
            .iter()
            .filter(|record| filter(*record))
            .filter_map(|record| {
                let Some(since) = self.normalizer.normalize_opt(record.get(&rule.since_field))
                else {
                    debug!(
                        row_number = record.row_number(),
                        field = %rule.since_field,
                        "cannot check SLA without a start date"
                    );
                    return None;
                };
                let business_days = self.calculator.between(Some(since), Some(as_of));
                (business_days > rule.threshold_business_days).then(|| SlaBreach {
                    profile_id: record.key().subject.clone(),
                    position_id: record.key().position.clone(),
                    owner: rule
                        .owner_field
                        .as_deref()
                        .and_then(|field| record.text(field)),
                    since,
                    business_days,
                })
            })
            .collect();

        breaches.sort_by(|a, b| {
            b.business_days
                .cmp(&a.business_days)
                .then_with(|| a.profile_id.cmp(&b.profile_id))
                .then_with(|| a.position_id.cmp(&b.position_id))
        });
        breaches
    }

    fn collect_samples<'r>(
        &self,
        records: impl Iterator<Item = &'r RawRecord>,
        from_field: &str,
        to_field: &str,
    ) -> (Vec<Sample>, usize) {
        let mut samples = Vec::new();
        let mut missing = 0;

        for record in records {
            let from = self.normalizer.normalize_opt(record.get(from_field));
            let to = self.normalizer.normalize_opt(record.get(to_field));
            match (from, to) {
                (Some(from), Some(to)) if to >= from => samples.push(Sample {
                    days: (to - from).num_seconds() as f64 / 86_400.0,
                    business_days: self.calculator.between(Some(from), Some(to)),
                }),
                _ => missing += 1,
            }
        }

        (samples, missing)
    }
}

fn summarize(mut samples: Vec<Sample>, missing: usize) -> TimingStats {
    if samples.is_empty() {
        return TimingStats {
            missing,
            ..TimingStats::default()
        };
    }

    let count = samples.len() as f64;
    let mean_days = samples.iter().map(|sample| sample.days).sum::<f64>() / count;
    let mean_business_days = samples
        .iter()
        .map(|sample| f64::from(sample.business_days))
        .sum::<f64>()
        / count;

    samples.sort_by(|a, b| a.days.total_cmp(&b.days));
    let middle = samples.len() / 2;
    let median_days = if samples.len() % 2 == 0 {
        (samples[middle - 1].days + samples[middle].days) / 2.0
    } else {
        samples[middle].days
    };

    TimingStats {
        samples: samples.len(),
        missing,
        mean_days: round1(mean_days),
        median_days: round1(median_days),
        mean_business_days: round1(mean_business_days),
        groups: Vec::new(),
    }
}
