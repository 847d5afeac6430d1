use super::super::eligibility::EligibilityLabel;
use super::super::record::RawRecord;
use super::views::{GroupMetric, MetricSet};
use super::{group_by_field, rate_pct};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    taken: usize,
    not_taken: usize,
    ineligible: usize,
}

impl Tally {
    fn add(&mut self, label: EligibilityLabel) {
        match label {
            EligibilityLabel::Taken => self.taken += 1,
            EligibilityLabel::EligibleNotTaken => self.not_taken += 1,
            EligibilityLabel::Ineligible => self.ineligible += 1,
        }
    }

    fn eligible(&self) -> usize {
        self.taken + self.not_taken
    }
}

/// Reduce a cohort to adoption counts.
///
/// Ineligible records stay out of the rate; they are only reported as a count. With
/// `group_by` set, the same reduction runs per distinct value of that column.
pub fn aggregate<R, F>(records: &[R], classify: F, group_by: Option<&str>) -> MetricSet
where
    R: AsRef<RawRecord>,
    F: Fn(&RawRecord) -> EligibilityLabel,
{
    let mut total = Tally::default();
    for record in records {
        total.add(classify(record.as_ref()));
    }

    let groups = match group_by {
        Some(field) => group_by_field(records, field)
            .into_iter()
            .map(|(key, members)| {
                let mut tally = Tally::default();
                for record in members {
                    tally.add(classify(record.as_ref()));
                }
                GroupMetric {
                    key,
                    eligible: tally.eligible(),
                    taken: tally.taken,
                    ineligible: tally.ineligible,
                    rate_pct: rate_pct(tally.taken, tally.eligible()),
                }
            })
            .collect(),
        None => Vec::new(),
    };

    MetricSet {
        total_eligible: total.eligible(),
        total_taken: total.taken,
        total_ineligible: total.ineligible,
        adoption_rate_pct: rate_pct(total.taken, total.eligible()),
        groups,
    }
}
