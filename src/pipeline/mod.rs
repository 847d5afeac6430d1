//! Adoption pipeline: normalize snapshot rows, collapse duplicates, carve cohorts,
//! and compute adoption, funnel, and timing metrics.

pub mod business_days;
pub mod cohort;
pub mod dates;
pub mod dedup;
pub mod eligibility;
pub mod engine;
pub mod metrics;
pub mod record;
pub mod status;

#[cfg(test)]
mod tests;

pub use business_days::{business_days_between, BusinessDayCalculator};
pub use cohort::{
    Cohort, CohortRule, CohortSegmenter, DateBound, DateComparison, FieldCondition,
    FieldPredicate, SegmentDiagnostics,
};
pub use dates::DateNormalizer;
pub use dedup::{DedupOutcome, Deduplicator, KeyFields};
pub use eligibility::{EligibilityClassifier, EligibilityLabel, EligibilityPolicy};
pub use engine::{
    AdoptionEngine, AdoptionReport, ApplicationColumns, CohortReport, EngineConfig, EngineError,
    InterviewColumns, InterviewReport, RunDiagnostics,
};
pub use metrics::{
    aggregate, funnel, FunnelMetrics, GroupMetric, MetricSet, SlaBreach, SlaRule,
    TimingAggregator, TimingStats,
};
pub use record::{CanonicalRecord, RawRecord, RecordKey, Table};
pub use status::{StatusRanker, StatusTier, StatusVocabulary};
