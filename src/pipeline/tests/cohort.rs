use super::common::*;
use crate::pipeline::{
    AdoptionEngine, CohortRule, CohortSegmenter, DateNormalizer, FieldPredicate,
};
use crate::source::CellValue;

fn applications() -> Vec<crate::pipeline::CanonicalRecord> {
    canonical_applications(vec![
        Application::new("c-1", "Dana", "2024-12-10").record(2),
        Application::new("c-2", "Dana", "2024-12-20")
            .status("Rejected")
            .record(3),
        Application::new("c-3", "Lee", "2024-12-28")
            .position_status("Closed")
            .record(4),
        Application::new("c-4", "Lee", "2025-01-01").taken().record(5),
        Application::new("c-5", "Ops Bot", "2025-02-14").record(6),
        Application::new("c-6", "Lee", "not a date").record(7),
    ])
}

#[test]
fn pre_launch_keeps_only_active_applications_on_open_positions() {
    let engine = engine();
    let cohort = engine
        .segmenter()
        .segment(&applications(), &engine.pre_launch_rule());

    let ids: Vec<_> = cohort
        .records
        .iter()
        .map(|record| record.key().subject.as_str())
        .collect();
    assert_eq!(ids, vec!["c-1"]);
    assert_eq!(cohort.diagnostics.considered, 6);
    assert_eq!(cohort.diagnostics.filtered, 2);
    assert_eq!(cohort.diagnostics.outside_window, 2);
    assert_eq!(cohort.diagnostics.unparseable_date, 1);
}

#[test]
fn post_launch_starts_at_launch_instant_and_ignores_status() {
    let engine = engine();
    let cohort = engine
        .segmenter()
        .segment(&applications(), &engine.post_launch_rule(at(2025, 3, 1, 0)));

    let ids: Vec<_> = cohort
        .records
        .iter()
        .map(|record| record.key().subject.as_str())
        .collect();
    assert_eq!(ids, vec!["c-4", "c-5"]);
}

#[test]
fn cohorts_may_overlap_without_status_filters() {
    let segmenter = CohortSegmenter::default();
    let records = applications();
    let everything = CohortRule::new("everything");
    let active = CohortRule::new("active").require(FieldPredicate::equals(APP_STATUS, "active"));

    assert_eq!(segmenter.segment(&records, &everything).len(), 6);
    assert_eq!(segmenter.segment(&records, &active).len(), 5);
}

#[test]
fn excluded_recruiters_drop_out_of_both_cohorts() {
    let mut config = engine_config();
    config.excluded_recruiters = vec!["ops bot".to_string()];
    let engine = AdoptionEngine::new(config);

    let cohort = engine
        .segmenter()
        .segment(&applications(), &engine.post_launch_rule(at(2025, 3, 1, 0)));

    assert_eq!(cohort.len(), 1);
    assert_eq!(cohort.records[0].key().subject, "c-4");
}

#[test]
fn lookback_window_trims_old_post_launch_records() {
    let mut config = engine_config();
    config.lookback_days = Some(30);
    let engine = AdoptionEngine::new(config);

    let cohort = engine
        .segmenter()
        .segment(&applications(), &engine.post_launch_rule(at(2025, 3, 1, 0)));

    assert_eq!(cohort.len(), 1);
    assert_eq!(cohort.records[0].key().subject, "c-5");
    assert_eq!(cohort.diagnostics.outside_window, 4);
}

#[test]
fn match_score_floor_requires_a_score() {
    let mut config = engine_config();
    config.min_match_score = Some(3.0);
    let engine = AdoptionEngine::new(config);
    let records = canonical_applications(vec![
        Application::new("c-1", "Dana", "2025-01-05").score(4.2).record(2),
        Application::new("c-2", "Dana", "2025-01-06").score(2.5).record(3),
        Application::new("c-3", "Dana", "2025-01-07").record(4),
    ]);

    let cohort = engine
        .segmenter()
        .segment(&records, &engine.post_launch_rule(at(2025, 3, 1, 0)));

    assert_eq!(cohort.len(), 1);
    assert_eq!(cohort.records[0].key().subject, "c-1");
    assert_eq!(cohort.diagnostics.filtered, 2);
}

#[test]
fn negative_predicates_pass_missing_values() {
    let record = Application::new("c-1", "", "2025-01-05").record(2);

    assert!(FieldPredicate::not_equals(RECRUITER, "Dana").matches(&record));
    assert!(FieldPredicate::none_of(RECRUITER, vec!["Dana".to_string()]).matches(&record));
    assert!(!FieldPredicate::equals(RECRUITER, "Dana").matches(&record));
    assert!(!FieldPredicate::at_most(MATCH_SCORE, 5.0).matches(&record));
}

#[test]
fn serial_dates_and_instants_normalize_identically() {
    let normalizer = DateNormalizer::default();
    let from_serial = normalizer
        .normalize(&CellValue::Number(45678.0))
        .expect("serial converts");

    assert_eq!(from_serial, at(2025, 1, 21, 0));
    assert_eq!(
        normalizer.normalize(&CellValue::Instant(from_serial)),
        Some(from_serial)
    );
    assert_eq!(normalizer.normalize(&CellValue::text("")), None);
    assert_eq!(normalizer.normalize_opt(None), None);
}
