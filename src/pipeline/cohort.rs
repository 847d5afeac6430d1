use super::dates::DateNormalizer;
use super::record::{CanonicalRecord, RawRecord};
use super::status::fold;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateComparison {
    Before,
    OnOrAfter,
}

/// Date window edge read from one column.
#[derive(Debug, Clone, PartialEq)]
pub struct DateBound {
    pub field: String,
    pub comparison: DateComparison,
    pub threshold: DateTime<Utc>,
}

impl DateBound {
    fn accepts(&self, instant: DateTime<Utc>) -> bool {
        match self.comparison {
            DateComparison::Before => instant < self.threshold,
            DateComparison::OnOrAfter => instant >= self.threshold,
        }
    }
}

/// Text comparisons fold case and whitespace; numeric ones need a parseable number.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCondition {
    Equals(String),
    NotEquals(String),
    NoneOf(Vec<String>),
    AtLeast(f64),
    AtMost(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub field: String,
    pub condition: FieldCondition,
}

impl FieldPredicate {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FieldCondition::Equals(value.into()))
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FieldCondition::NotEquals(value.into()))
    }

    pub fn none_of(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FieldCondition::NoneOf(values))
    }

    pub fn at_least(field: impl Into<String>, value: f64) -> Self {
        Self::new(field, FieldCondition::AtLeast(value))
    }

    pub fn at_most(field: impl Into<String>, value: f64) -> Self {
        Self::new(field, FieldCondition::AtMost(value))
    }

    fn new(field: impl Into<String>, condition: FieldCondition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }

    /// Missing values fail `Equals` and numeric bounds, and pass the negative conditions.
    pub fn matches(&self, record: &RawRecord) -> bool {
        match &self.condition {
            FieldCondition::Equals(expected) => record
                .text(&self.field)
                .is_some_and(|value| fold(&value) == fold(expected)),
            FieldCondition::NotEquals(expected) => record
                .text(&self.field)
                .map_or(true, |value| fold(&value) != fold(expected)),
            FieldCondition::NoneOf(values) => record.text(&self.field).map_or(true, |value| {
                let value = fold(&value);
                !values.iter().any(|candidate| fold(candidate) == value)
            }),
            FieldCondition::AtLeast(min) => record
                .number(&self.field)
                .is_some_and(|value| value >= *min),
            FieldCondition::AtMost(max) => record
                .number(&self.field)
                .is_some_and(|value| value <= *max),
        }
    }
}

/// Named selection over canonical records: date bounds plus field predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRule {
    pub name: String,
    pub date_bounds: Vec<DateBound>,
    pub predicates: Vec<FieldPredicate>,
}

impl CohortRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date_bounds: Vec::new(),
            predicates: Vec::new(),
        }
    }

    pub fn before(mut self, field: impl Into<String>, threshold: DateTime<Utc>) -> Self {
        self.date_bounds.push(DateBound {
            field: field.into(),
            comparison: DateComparison::Before,
            threshold,
        });
        self
    }

    pub fn on_or_after(mut self, field: impl Into<String>, threshold: DateTime<Utc>) -> Self {
        self.date_bounds.push(DateBound {
            field: field.into(),
            comparison: DateComparison::OnOrAfter,
            threshold,
        });
        self
    }

    pub fn require(mut self, predicate: FieldPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// Why records were left out of a cohort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentDiagnostics {
    pub considered: usize,
    pub unparseable_date: usize,
    pub outside_window: usize,
    pub filtered: usize,
}

#[derive(Debug, Clone)]
pub struct Cohort {
    pub name: String,
    pub records: Vec<CanonicalRecord>,
    pub diagnostics: SegmentDiagnostics,
}

impl Cohort {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Applies [`CohortRule`]s. Each rule is evaluated independently, so cohorts may overlap.
#[derive(Debug, Clone, Default)]
pub struct CohortSegmenter {
    normalizer: DateNormalizer,
}

impl CohortSegmenter {
    pub fn new(normalizer: DateNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn segment(&self, records: &[CanonicalRecord], rule: &CohortRule) -> Cohort {
        let mut diagnostics = SegmentDiagnostics {
            considered: records.len(),
            ..SegmentDiagnostics::default()
        };
        let mut selected = Vec::new();

        'records: for record in records {
            for bound in &rule.date_bounds {
                match self.normalizer.normalize_opt(record.get(&bound.field)) {
                    Some(instant) if bound.accepts(instant) => {}
                    Some(_) => {
                        diagnostics.outside_window += 1;
                        continue 'records;
                    }
                    None => {
                        debug!(
                            cohort = %rule.name,
                            row_number = record.row_number(),
                            field = %bound.field,
                            "excluding row with unparseable date"
                        );
                        diagnostics.unparseable_date += 1;
                        continue 'records;
                    }
                }
            }

            if !rule.predicates.iter().all(|predicate| predicate.matches(record)) {
                diagnostics.filtered += 1;
                continue;
            }

            selected.push(record.clone());
        }

        Cohort {
            name: rule.name.clone(),
            records: selected,
            diagnostics,
        }
    }
}
