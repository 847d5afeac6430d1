mod config;
mod report;

pub use config::{ApplicationColumns, EngineConfig, InterviewColumns};
pub use report::{AdoptionReport, CohortReport, InterviewReport, RunDiagnostics};

use super::business_days::BusinessDayCalculator;
use super::cohort::{CohortRule, CohortSegmenter, FieldPredicate};
use super::dates::DateNormalizer;
use super::dedup::{DedupOutcome, Deduplicator, KeyFields};
use super::eligibility::EligibilityClassifier;
use super::metrics::{aggregate, funnel, SlaRule, TimingAggregator};
use super::record::{CanonicalRecord, RawRecord, Table};
use super::status::{fold, StatusRanker, StatusTier};
use crate::source::{SchemaError, SourceError, SourceKind, TabularSource};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

/// Share of input rows that may be skipped before a run logs a warning.
const SKIPPED_ROWS_WARN_RATIO: f64 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Reconciles application and interview snapshots into an [`AdoptionReport`].
///
/// Stateless between runs: identical inputs and configuration give identical reports.
#[derive(Debug, Clone)]
pub struct AdoptionEngine {
    config: EngineConfig,
    normalizer: DateNormalizer,
    deduplicator: Deduplicator,
    segmenter: CohortSegmenter,
    classifier: EligibilityClassifier,
    timing: TimingAggregator,
    feedback_provided: Vec<String>,
}

impl AdoptionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let normalizer = DateNormalizer::new(config.default_offset);
        let calculator = BusinessDayCalculator::new(config.default_offset);
        let feedback_provided = config
            .feedback_provided_statuses
            .iter()
            .map(|value| fold(value))
            .collect();

        Self {
            normalizer,
            deduplicator: Deduplicator::new(StatusRanker::new(&config.statuses)),
            segmenter: CohortSegmenter::new(normalizer),
            classifier: EligibilityClassifier::new(&config.eligibility),
            timing: TimingAggregator::new(normalizer, calculator),
            feedback_provided,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &CohortSegmenter {
        &self.segmenter
    }

    pub fn timing(&self) -> &TimingAggregator {
        &self.timing
    }

    /// Fetch both sources and build the report. Only schema and source errors abort.
    pub fn run<S>(&self, source: &S, as_of: DateTime<Utc>) -> Result<AdoptionReport, EngineError>
    where
        S: TabularSource + ?Sized,
    {
        let (required, optional) = self.config.application_schema();
        let applications = Table::from_data(
            SourceKind::Applications,
            source.fetch(SourceKind::Applications)?,
            &required,
            &optional,
        )?;

        let (required, optional) = self.config.interview_schema();
        let interviews = Table::from_data(
            SourceKind::InterviewLog,
            source.fetch(SourceKind::InterviewLog)?,
            &required,
            &optional,
        )?;

        Ok(self.build_report(&applications, &interviews, as_of))
    }

    pub fn deduplicate_applications(&self, records: &[RawRecord]) -> DedupOutcome {
        let columns = &self.config.application_columns;
        self.deduplicator.deduplicate(
            records,
            KeyFields::new(&columns.candidate_id, &columns.position_id),
            &columns.application_status,
        )
    }

    pub fn deduplicate_interviews(&self, records: &[RawRecord]) -> DedupOutcome {
        let columns = &self.config.interview_columns;
        self.deduplicator.deduplicate(
            records,
            KeyFields::new(&columns.profile_id, &columns.position_id),
            &columns.interview_status,
        )
    }

    /// Applied before launch, still active, on an open position.
    pub fn pre_launch_rule(&self) -> CohortRule {
        let columns = &self.config.application_columns;
        let rule = CohortRule::new("pre_launch")
            .before(&columns.applied_at, self.config.launch_at)
            .require(FieldPredicate::equals(
                &columns.application_status,
                &self.config.active_application_status,
            ))
            .require(FieldPredicate::equals(
                &columns.position_status,
                &self.config.open_position_status,
            ));
        self.exclude_recruiters(rule, &columns.recruiter)
    }

    /// Applied on or after launch, with the optional score floor and lookback window.
    pub fn post_launch_rule(&self, as_of: DateTime<Utc>) -> CohortRule {
        let columns = &self.config.application_columns;
        let mut rule = CohortRule::new("post_launch")
            .on_or_after(&columns.applied_at, self.config.launch_at);
        if let Some(start) = self.lookback_start(as_of) {
            rule = rule.on_or_after(&columns.applied_at, start);
        }
        if let Some(min_score) = self.config.min_match_score {
            rule = rule.require(FieldPredicate::at_least(&columns.match_score, min_score));
        }
        self.exclude_recruiters(rule, &columns.recruiter)
    }

    /// Interview invitations sent on or after launch. The match-score floor
    /// only narrows the application cohort; the log carries no score column.
    pub fn interview_rule(&self, as_of: DateTime<Utc>) -> CohortRule {
        let columns = &self.config.interview_columns;
        let mut rule = CohortRule::new("invited_post_launch")
            .on_or_after(&columns.email_sent_at, self.config.launch_at);
        if let Some(start) = self.lookback_start(as_of) {
            rule = rule.on_or_after(&columns.email_sent_at, start);
        }
        self.exclude_recruiters(rule, &columns.recruiter)
    }

    /// Interview reached a completion status but no feedback has been recorded.
    pub fn awaiting_feedback(&self, record: &CanonicalRecord) -> bool {
        record.tier() == StatusTier::Completed && !self.feedback_recorded(record)
    }

    /// Only the feedback column counts; the interview status never stands in for it.
    pub fn feedback_recorded(&self, record: &RawRecord) -> bool {
        record
            .text(&self.config.interview_columns.feedback_status)
            .is_some_and(|value| self.feedback_provided.contains(&fold(&value)))
    }

    pub fn build_report(
        &self,
        applications: &Table,
        interviews: &Table,
        as_of: DateTime<Utc>,
    ) -> AdoptionReport {
        let mut diagnostics = RunDiagnostics {
            application_rows: applications.records.len() + applications.short_rows,
            interview_rows: interviews.records.len() + interviews.short_rows,
            short_rows: applications.short_rows + interviews.short_rows,
            ..RunDiagnostics::default()
        };

        let app_canonical = self.deduplicate_applications(&applications.records);
        let log_canonical = self.deduplicate_interviews(&interviews.records);
        for outcome in [&app_canonical, &log_canonical] {
            diagnostics.missing_key += outcome.missing_key;
            diagnostics.superseded += outcome.superseded;
        }

        let app_columns = &self.config.application_columns;
        let classify = |record: &RawRecord| {
            self.classifier.classify(
                record,
                &app_columns.ai_interview,
                &app_columns.application_status,
            )
        };

        let pre_cohort = self
            .segmenter
            .segment(&app_canonical.records, &self.pre_launch_rule());
        let post_cohort = self
            .segmenter
            .segment(&app_canonical.records, &self.post_launch_rule(as_of));
        diagnostics.absorb_source([&pre_cohort.diagnostics, &post_cohort.diagnostics]);
        diagnostics.absorb_filtered(&pre_cohort.diagnostics);
        diagnostics.absorb_filtered(&post_cohort.diagnostics);

        let pre_launch = CohortReport::new(
            &pre_cohort,
            aggregate(&pre_cohort.records, classify, Some(app_columns.recruiter.as_str())),
        );
        let post_launch = CohortReport::new(
            &post_cohort,
            aggregate(&post_cohort.records, classify, Some(app_columns.recruiter.as_str())),
        );

        let log_columns = &self.config.interview_columns;
        let log_cohort = self
            .segmenter
            .segment(&log_canonical.records, &self.interview_rule(as_of));
        diagnostics.absorb_source([&log_cohort.diagnostics]);
        diagnostics.absorb_filtered(&log_cohort.diagnostics);

        let funnel_by = |field: &str| {
            funnel(
                &log_cohort.records,
                |record: &CanonicalRecord| record.tier(),
                |record: &CanonicalRecord| self.feedback_recorded(record),
                Some(field),
            )
        };

        let sla_rule = SlaRule {
            since_field: log_columns.completed_at.clone(),
            threshold_business_days: self.config.feedback_sla_business_days,
            owner_field: Some(log_columns.recruiter.clone()),
        };

        let interviews_report = InterviewReport {
            name: log_cohort.name.clone(),
            size: log_cohort.len(),
            diagnostics: log_cohort.diagnostics,
            funnel_by_recruiter: funnel_by(&log_columns.recruiter),
            funnel_by_job_function: funnel_by(&log_columns.job_function),
            funnel_by_country: funnel_by(&log_columns.country),
            time_to_completion: self.timing.time_to_event(
                &log_cohort.records,
                &log_columns.email_sent_at,
                &log_columns.completed_at,
                Some(log_columns.job_function.as_str()),
            ),
            feedback_sla_breaches: self.timing.sla_breaches(
                &log_cohort.records,
                &sla_rule,
                as_of,
                |record| self.awaiting_feedback(record),
            ),
        };

        info!(
            applications = app_canonical.records.len(),
            interviews = log_canonical.records.len(),
            pre_launch = pre_launch.size,
            post_launch = post_launch.size,
            interview_cohort = interviews_report.size,
            "adoption report built"
        );

        let total_rows = diagnostics.total_rows();
        if total_rows > 0
            && diagnostics.skipped() as f64 / total_rows as f64 > SKIPPED_ROWS_WARN_RATIO
        {
            warn!(
                skipped = diagnostics.skipped(),
                total_rows, "large share of rows skipped for data problems"
            );
        }

        AdoptionReport {
            as_of,
            launch_at: self.config.launch_at,
            pre_launch,
            post_launch,
            interviews: interviews_report,
            diagnostics,
        }
    }

    fn lookback_start(&self, as_of: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.config
            .lookback_days
            .and_then(Duration::try_days)
            .and_then(|window| as_of.checked_sub_signed(window))
    }

    fn exclude_recruiters(&self, rule: CohortRule, recruiter_field: &str) -> CohortRule {
        if self.config.excluded_recruiters.is_empty() {
            rule
        } else {
            rule.require(FieldPredicate::none_of(
                recruiter_field,
                self.config.excluded_recruiters.clone(),
            ))
        }
    }
}

impl Default for AdoptionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
