use crate::pipeline::{
    AdoptionEngine, CanonicalRecord, EngineConfig, RawRecord, StatusTier,
};
use crate::source::CellValue;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub(super) const CANDIDATE: &str = "Candidate Id";
pub(super) const POSITION: &str = "Position Id";
pub(super) const RECRUITER: &str = "Recruiter";
pub(super) const APPLIED_AT: &str = "Applied At";
pub(super) const APP_STATUS: &str = "Application Status";
pub(super) const POSITION_STATUS: &str = "Position Status";
pub(super) const AI_INTERVIEW: &str = "AI Interview";
pub(super) const MATCH_SCORE: &str = "Match Score";

pub(super) const PROFILE: &str = "Profile Id";
pub(super) const INTERVIEW_STATUS: &str = "Interview Status";
pub(super) const FEEDBACK_STATUS: &str = "Feedback Status";
pub(super) const EMAIL_SENT_AT: &str = "Email Sent At";
pub(super) const COMPLETED_AT: &str = "Completed At";
pub(super) const JOB_FUNCTION: &str = "Job Function";

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn engine_config() -> EngineConfig {
    EngineConfig::default().with_launch_date(date(2025, 1, 1))
}

pub(super) fn engine() -> AdoptionEngine {
    AdoptionEngine::new(engine_config())
}

/// Application row with every column the engine reads.
pub(super) struct Application<'a> {
    pub candidate: &'a str,
    pub position: &'a str,
    pub recruiter: &'a str,
    pub applied_at: &'a str,
    pub status: &'a str,
    pub position_status: &'a str,
    pub ai_interview: &'a str,
    pub match_score: Option<f64>,
}

impl<'a> Application<'a> {
    pub(super) fn new(candidate: &'a str, recruiter: &'a str, applied_at: &'a str) -> Self {
        Self {
            candidate,
            position: "pos-1",
            recruiter,
            applied_at,
            status: "Active",
            position_status: "Open",
            ai_interview: "N",
            match_score: None,
        }
    }

    pub(super) fn taken(mut self) -> Self {
        self.ai_interview = "Y";
        self
    }

    pub(super) fn status(mut self, status: &'a str) -> Self {
        self.status = status;
        self
    }

    pub(super) fn position_status(mut self, status: &'a str) -> Self {
        self.position_status = status;
        self
    }

    pub(super) fn score(mut self, score: f64) -> Self {
        self.match_score = Some(score);
        self
    }

    pub(super) fn record(self, row_number: usize) -> RawRecord {
        let score = self
            .match_score
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty);
        RawRecord::from_pairs(
            row_number,
            [
                (CANDIDATE, CellValue::text(self.candidate)),
                (POSITION, CellValue::text(self.position)),
                (RECRUITER, CellValue::text(self.recruiter)),
                (APPLIED_AT, CellValue::text(self.applied_at)),
                (APP_STATUS, CellValue::text(self.status)),
                (POSITION_STATUS, CellValue::text(self.position_status)),
                (AI_INTERVIEW, CellValue::text(self.ai_interview)),
                (MATCH_SCORE, score),
            ],
        )
    }
}

/// Interview-log row keyed on profile and position, with no feedback recorded.
pub(super) fn interview(
    row_number: usize,
    profile: &str,
    status: &str,
    email_sent_at: &str,
    completed_at: &str,
) -> RawRecord {
    interview_row(row_number, profile, status, CellValue::Empty, email_sent_at, completed_at)
}

/// Completed interview whose feedback column says it was reviewed.
pub(super) fn reviewed(
    row_number: usize,
    profile: &str,
    email_sent_at: &str,
    completed_at: &str,
) -> RawRecord {
    interview_row(
        row_number,
        profile,
        "Feedback Provided",
        CellValue::text("Feedback Provided"),
        email_sent_at,
        completed_at,
    )
}

pub(super) fn interview_row(
    row_number: usize,
    profile: &str,
    status: &str,
    feedback: CellValue,
    email_sent_at: &str,
    completed_at: &str,
) -> RawRecord {
    RawRecord::from_pairs(
        row_number,
        [
            (PROFILE, CellValue::text(profile)),
            (POSITION, CellValue::text("pos-1")),
            (INTERVIEW_STATUS, CellValue::text(status)),
            (FEEDBACK_STATUS, feedback),
            (EMAIL_SENT_AT, CellValue::text(email_sent_at)),
            (COMPLETED_AT, CellValue::text(completed_at)),
            (JOB_FUNCTION, CellValue::text("Engineering")),
            (RECRUITER, CellValue::text("Dana")),
        ],
    )
}

pub(super) fn keyed(row_number: usize, subject: &str, status: &str) -> RawRecord {
    RawRecord::from_pairs(
        row_number,
        [
            (PROFILE, subject),
            (POSITION, "pos-1"),
            (INTERVIEW_STATUS, status),
        ],
    )
}

/// Canonicalize application rows with the default engine.
pub(super) fn canonical_applications(records: Vec<RawRecord>) -> Vec<CanonicalRecord> {
    engine().deduplicate_applications(&records).records
}

pub(super) fn canonical_interviews(records: Vec<RawRecord>) -> Vec<CanonicalRecord> {
    engine().deduplicate_interviews(&records).records
}

pub(super) fn tiers(records: &[CanonicalRecord]) -> Vec<StatusTier> {
    records.iter().map(CanonicalRecord::tier).collect()
}
