use chrono::{DateTime, TimeZone, Utc};
use screening_adoption::pipeline::{AdoptionEngine, AdoptionReport, EngineConfig, EngineError};
use screening_adoption::source::{read_tabular, InMemorySource, SourceError, SourceKind};
use std::io::Cursor;

const APPLICATIONS: &str = "\
Candidate Id,Position Id,Recruiter,Applied At,Application Status,Position Status,AI Interview,Match Score
c-1,pos-1,Dana,2024-12-10,Active,Open,N,4
c-2,pos-1,Dana,2024-12-12,Active,Open,Y,3
c-3,pos-2,Lee,2025-01-05,Active,Open,Y,5
c-3,pos-2,Lee,2025-01-05,Rejected,Open,N,5
c-4,pos-2,Lee,2025-01-06,Rejected,Open,N,2
c-5,pos-3,,2025-01-07,Active,Open,N,
,pos-3,Lee,2025-01-08,Active,Open,Y,1
c-6,pos-3,Dana,sometime,Active,Open,Y,1
c-7,pos-3
";

const INTERVIEWS: &str = "\
Profile Id,Position Id,Interview Status,Feedback Status,Email Sent At,Completed At,Job Function,Country,Recruiter
p-1,pos-1,INVITED,,2025-01-02 09:00:00,,Engineering,US,Dana
p-1,pos-1,COMPLETED,,2025-01-02 09:00:00,2025-01-06 09:00:00,Engineering,US,Dana
p-2,pos-2,Feedback Provided,Feedback Provided,2025-01-03 09:00:00,2025-01-07 09:00:00,Sales,IN,Lee
p-3,pos-2,SCHEDULED,,2025-01-08 09:00:00,,Sales,IN,Lee
p-4,pos-1,COMPLETED,,2024-12-20 09:00:00,2024-12-23 09:00:00,Engineering,US,Dana
";

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 17, 0, 0, 0)
        .single()
        .expect("valid as-of instant")
}

fn source(applications: &str, interviews: &str) -> InMemorySource {
    InMemorySource::new()
        .with(
            SourceKind::Applications,
            read_tabular(Cursor::new(applications.as_bytes())).expect("applications parse"),
        )
        .with(
            SourceKind::InterviewLog,
            read_tabular(Cursor::new(interviews.as_bytes())).expect("interviews parse"),
        )
}

fn run() -> AdoptionReport {
    AdoptionEngine::new(EngineConfig::default())
        .run(&source(APPLICATIONS, INTERVIEWS), as_of())
        .expect("report builds")
}

#[test]
fn cohorts_split_on_launch_date() {
    let report = run();

    let pre = &report.pre_launch.adoption;
    assert_eq!(report.pre_launch.size, 2);
    assert_eq!((pre.total_eligible, pre.total_taken), (2, 1));
    assert_eq!(pre.adoption_rate_pct, 50.0);

    let post = &report.post_launch.adoption;
    assert_eq!(report.post_launch.size, 3);
    assert_eq!(post.total_eligible, 2);
    assert_eq!(post.total_taken, 1);
    assert_eq!(post.total_ineligible, 1);
    assert_eq!(post.adoption_rate_pct, 50.0);

    let keys: Vec<_> = post.groups.iter().map(|group| group.key.as_str()).collect();
    assert_eq!(keys, vec!["Lee", "Unassigned"]);
    assert_eq!(post.group("Lee").map(|group| group.rate_pct), Some(100.0));
}

#[test]
fn first_duplicate_wins_when_statuses_rank_equally() {
    let report = run();
    let lee = report
        .post_launch
        .adoption
        .group("Lee")
        .expect("Lee group present");
    assert_eq!(lee.taken, 1);
    assert_eq!(lee.ineligible, 1);
}

#[test]
fn interview_funnel_timing_and_sla() {
    let report = run();
    let interviews = &report.interviews;

    assert_eq!(interviews.name, "invited_post_launch");
    assert_eq!(interviews.size, 3);
    assert_eq!(interviews.diagnostics.outside_window, 1);

    let funnel = &interviews.funnel_by_recruiter;
    assert_eq!(
        (funnel.invited, funnel.scheduled, funnel.completed, funnel.feedback_provided),
        (3, 3, 2, 1)
    );
    assert_eq!(funnel.completion_rate_pct, 66.7);
    let countries: Vec<_> = interviews
        .funnel_by_country
        .groups
        .iter()
        .map(|group| group.key.as_str())
        .collect();
    assert_eq!(countries, vec!["IN", "US"]);

    let timing = &interviews.time_to_completion;
    assert_eq!((timing.samples, timing.missing), (2, 1));
    assert_eq!(timing.mean_days, 4.0);

    assert_eq!(interviews.feedback_sla_breaches.len(), 1);
    let breach = &interviews.feedback_sla_breaches[0];
    assert_eq!(breach.profile_id, "p-1");
    assert_eq!(breach.business_days, 9);
    assert_eq!(breach.owner.as_deref(), Some("Dana"));
}

#[test]
fn diagnostics_count_row_problems_without_failing() {
    let diagnostics = run().diagnostics;

    assert_eq!(diagnostics.application_rows, 9);
    assert_eq!(diagnostics.interview_rows, 5);
    assert_eq!(diagnostics.short_rows, 1);
    assert_eq!(diagnostics.missing_key, 1);
    assert_eq!(diagnostics.superseded, 2);
    assert_eq!(diagnostics.unparseable_date, 1);
    assert_eq!(diagnostics.filtered, 0);
    assert_eq!(diagnostics.skipped(), 3);
}

#[test]
fn missing_required_columns_abort_with_every_name() {
    let interviews = "Profile Id,Position Id,Country\np-1,pos-1,US\n";
    let err = AdoptionEngine::default()
        .run(&source(APPLICATIONS, interviews), as_of())
        .expect_err("schema error");

    match &err {
        EngineError::Schema(schema) => {
            assert_eq!(schema.source_name, "interview log");
            assert_eq!(
                schema.columns,
                vec!["Interview Status".to_string(), "Email Sent At".to_string()]
            );
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(err.to_string().contains("Interview Status, Email Sent At"));
}

#[test]
fn match_score_column_becomes_required_with_a_floor() {
    let applications = "Candidate Id,Position Id,Recruiter,Applied At,Application Status,Position Status,AI Interview\n";
    let config = EngineConfig {
        min_match_score: Some(3.0),
        ..EngineConfig::default()
    };

    let err = AdoptionEngine::new(config)
        .run(&source(applications, INTERVIEWS), as_of())
        .expect_err("score column required");

    match err {
        EngineError::Schema(schema) => assert_eq!(schema.columns, vec!["Match Score".to_string()]),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn match_score_floor_narrows_applications_only() {
    let config = EngineConfig {
        min_match_score: Some(3.0),
        ..EngineConfig::default()
    };

    let report = AdoptionEngine::new(config)
        .run(&source(APPLICATIONS, INTERVIEWS), as_of())
        .expect("report builds without an interview score column");

    assert_eq!(report.post_launch.size, 1);
    assert_eq!(report.post_launch.diagnostics.filtered, 2);
    assert_eq!(report.diagnostics.filtered, 2);

    let interviews = &report.interviews;
    assert_eq!(interviews.size, 3);
    assert_eq!(interviews.diagnostics.filtered, 0);
    assert_eq!(interviews.funnel_by_recruiter.invited, 3);
    assert_eq!(interviews.funnel_by_recruiter.feedback_provided, 1);
    assert_eq!(interviews.feedback_sla_breaches.len(), 1);
}

#[test]
fn unconfigured_source_is_reported() {
    let source = InMemorySource::new().with(
        SourceKind::Applications,
        read_tabular(Cursor::new(APPLICATIONS.as_bytes())).expect("applications parse"),
    );

    let err = AdoptionEngine::default()
        .run(&source, as_of())
        .expect_err("interview log missing");

    assert!(matches!(
        err,
        EngineError::Source(SourceError::Unavailable("interview log"))
    ));
}

#[test]
fn report_serializes_to_json() {
    let json = serde_json::to_value(run()).expect("report serializes");

    assert_eq!(json["pre_launch"]["adoption"]["adoptionRatePct"], 50.0);
    assert_eq!(json["post_launch"]["adoption"]["totalIneligible"], 1);
    assert_eq!(json["diagnostics"]["missing_key"], 1);
}

#[test]
fn identical_inputs_give_identical_reports() {
    let first = serde_json::to_string(&run()).expect("serializes");
    let second = serde_json::to_string(&run()).expect("serializes");
    assert_eq!(first, second);
}
