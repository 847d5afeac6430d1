use super::super::cohort::{Cohort, SegmentDiagnostics};
use super::super::metrics::{FunnelMetrics, MetricSet, SlaBreach, TimingStats};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Row-level problems seen during a run. None of them abort the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunDiagnostics {
    pub application_rows: usize,
    pub interview_rows: usize,
    pub short_rows: usize,
    pub missing_key: usize,
    pub superseded: usize,
    /// Canonical records whose cohort date could not be read, once per source.
    pub unparseable_date: usize,
    /// Filter exclusions summed over every cohort.
    pub filtered: usize,
}

impl RunDiagnostics {
    /// Cohorts over the same source read the same date column, so each source
    /// contributes its worst cohort count rather than a sum.
    pub(crate) fn absorb_source<'a>(
        &mut self,
        segments: impl IntoIterator<Item = &'a SegmentDiagnostics>,
    ) {
        self.unparseable_date += segments
            .into_iter()
            .map(|segment| segment.unparseable_date)
            .max()
            .unwrap_or(0);
    }

    pub(crate) fn absorb_filtered(&mut self, segment: &SegmentDiagnostics) {
        self.filtered += segment.filtered;
    }

    /// Rows dropped for data problems, as opposed to rows outside a cohort's scope.
    pub fn skipped(&self) -> usize {
        self.short_rows + self.missing_key + self.unparseable_date
    }

    pub fn total_rows(&self) -> usize {
        self.application_rows + self.interview_rows
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortReport {
    pub name: String,
    pub size: usize,
    pub adoption: MetricSet,
    pub diagnostics: SegmentDiagnostics,
}

impl CohortReport {
    pub(crate) fn new(cohort: &Cohort, adoption: MetricSet) -> Self {
        Self {
            name: cohort.name.clone(),
            size: cohort.len(),
            adoption,
            diagnostics: cohort.diagnostics,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewReport {
    pub name: String,
    pub size: usize,
    pub diagnostics: SegmentDiagnostics,
    pub funnel_by_recruiter: FunnelMetrics,
    pub funnel_by_job_function: FunnelMetrics,
    pub funnel_by_country: FunnelMetrics,
    pub time_to_completion: TimingStats,
    pub feedback_sla_breaches: Vec<SlaBreach>,
}

/// Output of one engine run, handed to whatever renders or delivers it.
#[derive(Debug, Clone, Serialize)]
pub struct AdoptionReport {
    pub as_of: DateTime<Utc>,
    pub launch_at: DateTime<Utc>,
    pub pre_launch: CohortReport,
    pub post_launch: CohortReport,
    pub interviews: InterviewReport,
    pub diagnostics: RunDiagnostics,
}
