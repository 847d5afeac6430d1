use super::super::eligibility::EligibilityPolicy;
use super::super::status::StatusVocabulary;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

/// Column names in the application export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationColumns {
    pub candidate_id: String,
    pub position_id: String,
    pub recruiter: String,
    pub applied_at: String,
    pub application_status: String,
    pub position_status: String,
    pub last_stage: String,
    pub ai_interview: String,
    pub match_score: String,
}

impl Default for ApplicationColumns {
    fn default() -> Self {
        Self {
            candidate_id: "Candidate Id".to_string(),
            position_id: "Position Id".to_string(),
            recruiter: "Recruiter".to_string(),
            applied_at: "Applied At".to_string(),
            application_status: "Application Status".to_string(),
            position_status: "Position Status".to_string(),
            last_stage: "Last Stage".to_string(),
            ai_interview: "AI Interview".to_string(),
            match_score: "Match Score".to_string(),
        }
    }
}

/// Column names in the AI-interview log export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewColumns {
    pub profile_id: String,
    pub position_id: String,
    pub interview_status: String,
    pub feedback_status: String,
    pub email_sent_at: String,
    pub completed_at: String,
    pub job_function: String,
    pub country: String,
    pub recruiter: String,
}

impl Default for InterviewColumns {
    fn default() -> Self {
        Self {
            profile_id: "Profile Id".to_string(),
            position_id: "Position Id".to_string(),
            interview_status: "Interview Status".to_string(),
            feedback_status: "Feedback Status".to_string(),
            email_sent_at: "Email Sent At".to_string(),
            completed_at: "Completed At".to_string(),
            job_function: "Job Function".to_string(),
            country: "Country".to_string(),
            recruiter: "Recruiter".to_string(),
        }
    }
}

/// Everything a run needs besides the records themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub launch_at: DateTime<Utc>,
    pub min_match_score: Option<f64>,
    pub lookback_days: Option<i64>,
    pub excluded_recruiters: Vec<String>,
    pub feedback_sla_business_days: u32,
    pub default_offset: FixedOffset,
    pub statuses: StatusVocabulary,
    pub eligibility: EligibilityPolicy,
    pub feedback_provided_statuses: Vec<String>,
    pub active_application_status: String,
    pub open_position_status: String,
    pub application_columns: ApplicationColumns,
    pub interview_columns: InterviewColumns,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            launch_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default(),
            min_match_score: None,
            lookback_days: None,
            excluded_recruiters: Vec::new(),
            feedback_sla_business_days: 2,
            default_offset: Utc.fix(),
            statuses: StatusVocabulary::default(),
            eligibility: EligibilityPolicy::default(),
            feedback_provided_statuses: vec!["Feedback Provided".to_string()],
            active_application_status: "active".to_string(),
            open_position_status: "open".to_string(),
            application_columns: ApplicationColumns::default(),
            interview_columns: InterviewColumns::default(),
        }
    }
}

impl EngineConfig {
    /// Launch at local midnight of `date` in the configured default offset.
    pub fn with_launch_date(mut self, date: NaiveDate) -> Self {
        if let Some(launch) = date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| self.default_offset.from_local_datetime(&midnight).single())
        {
            self.launch_at = launch.with_timezone(&Utc);
        }
        self
    }

    pub(crate) fn application_schema(&self) -> (Vec<&str>, Vec<&str>) {
        let columns = &self.application_columns;
        let mut required = vec![
            columns.candidate_id.as_str(),
            columns.position_id.as_str(),
            columns.recruiter.as_str(),
            columns.applied_at.as_str(),
            columns.application_status.as_str(),
            columns.position_status.as_str(),
            columns.ai_interview.as_str(),
        ];
        let mut optional = vec![columns.last_stage.as_str()];
        if self.min_match_score.is_some() {
            required.push(columns.match_score.as_str());
        } else {
            optional.push(columns.match_score.as_str());
        }
        (required, optional)
    }

    pub(crate) fn interview_schema(&self) -> (Vec<&str>, Vec<&str>) {
        let columns = &self.interview_columns;
        let required = vec![
            columns.profile_id.as_str(),
            columns.position_id.as_str(),
            columns.interview_status.as_str(),
            columns.email_sent_at.as_str(),
        ];
        let optional = vec![
            columns.feedback_status.as_str(),
            columns.completed_at.as_str(),
            columns.job_function.as_str(),
            columns.country.as_str(),
            columns.recruiter.as_str(),
        ];
        (required, optional)
    }
}
