use super::super::record::RawRecord;
use super::super::status::StatusTier;
use super::views::{FunnelGroup, FunnelMetrics};
use super::{group_by_field, rate_pct};

#[derive(Debug, Default, Clone, Copy)]
struct Stages {
    invited: usize,
    scheduled: usize,
    completed: usize,
    feedback_provided: usize,
}

impl Stages {
    fn add(&mut self, tier: StatusTier, feedback_provided: bool) {
        self.invited += 1;
        if tier.is_scheduled_or_later() {
            self.scheduled += 1;
        }
        if tier == StatusTier::Completed {
            self.completed += 1;
        }
        if feedback_provided {
            self.feedback_provided += 1;
        }
    }
}

/// Count how far each record progressed through the interview funnel.
///
/// Every record counts as invited. `tier` places it on the status ladder and
/// `feedback_provided` reports whether a reviewer closed the loop.
pub fn funnel<R, T, F>(
    records: &[R],
    tier: T,
    feedback_provided: F,
    group_by: Option<&str>,
) -> FunnelMetrics
where
    R: AsRef<RawRecord>,
    T: Fn(&R) -> StatusTier,
    F: Fn(&R) -> bool,
{
    let total = tally(records.iter(), &tier, &feedback_provided);

    let groups = group_by
        .map(|field| {
            group_by_field(records, field)
                .into_iter()
                .map(|(key, members)| {
                    let stages = tally(members, &tier, &feedback_provided);
                    FunnelGroup {
                        key,
                        invited: stages.invited,
                        scheduled: stages.scheduled,
                        completed: stages.completed,
                        feedback_provided: stages.feedback_provided,
                        completion_rate_pct: rate_pct(stages.completed, stages.invited),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    FunnelMetrics {
        invited: total.invited,
        scheduled: total.scheduled,
        completed: total.completed,
        feedback_provided: total.feedback_provided,
        completion_rate_pct: rate_pct(total.completed, total.invited),
        groups,
    }
}

fn tally<'r, R, T, F>(members: impl IntoIterator<Item = &'r R>, tier: &T, feedback: &F) -> Stages
where
    R: 'r,
    T: Fn(&R) -> StatusTier,
    F: Fn(&R) -> bool,
{
    let mut stages = Stages::default();
    for record in members {
        stages.add(tier(record), feedback(record));
    }
    stages
}
