use crate::pipeline::{EngineConfig, StatusVocabulary};
use chrono::{FixedOffset, NaiveDate};
use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            engine: load_engine()?,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn load_engine() -> Result<EngineConfig, ConfigError> {
    let mut engine = EngineConfig::default();

    if let Some(raw) = non_empty_var("ADOPTION_UTC_OFFSET") {
        engine.default_offset =
            parse_offset(&raw).ok_or(ConfigError::InvalidOffset { value: raw })?;
    }

    let launch = non_empty_var("ADOPTION_LAUNCH_DATE").unwrap_or_else(|| "2025-01-01".to_string());
    let launch_date = NaiveDate::parse_from_str(&launch, "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidLaunchDate { value: launch })?;
    engine = engine.with_launch_date(launch_date);

    if let Some(raw) = non_empty_var("ADOPTION_MIN_MATCH_SCORE") {
        let score = raw
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
            .ok_or(ConfigError::InvalidMatchScore { value: raw })?;
        engine.min_match_score = Some(score);
    }

    if let Some(raw) = non_empty_var("ADOPTION_LOOKBACK_DAYS") {
        let days = raw
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidLookback { value: raw })?;
        engine.lookback_days = Some(days);
    }

    if let Some(raw) = non_empty_var("ADOPTION_FEEDBACK_SLA_DAYS") {
        engine.feedback_sla_business_days = raw
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidSlaDays { value: raw })?;
    }

    if let Some(raw) = non_empty_var("ADOPTION_EXCLUDED_RECRUITERS") {
        engine.excluded_recruiters = split_list(&raw);
    }

    let StatusVocabulary {
        completed,
        scheduled,
        pending,
    } = &mut engine.statuses;
    override_list("STATUS_COMPLETED", completed);
    override_list("STATUS_SCHEDULED", scheduled);
    override_list("STATUS_PENDING", pending);
    override_list("STATUS_REJECTED", &mut engine.eligibility.rejected_statuses);

    Ok(engine)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn override_list(name: &str, target: &mut Vec<String>) {
    if let Some(raw) = non_empty_var(name) {
        let values = split_list(&raw);
        if !values.is_empty() {
            *target = values;
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts `Z`, `UTC`, `+HH:MM`, `+HHMM` or `+HH`.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 14 || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidLaunchDate { value: String },
    InvalidMatchScore { value: String },
    InvalidLookback { value: String },
    InvalidSlaDays { value: String },
    InvalidOffset { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLaunchDate { value } => {
                write!(f, "ADOPTION_LAUNCH_DATE must be YYYY-MM-DD, got '{value}'")
            }
            ConfigError::InvalidMatchScore { value } => {
                write!(f, "ADOPTION_MIN_MATCH_SCORE must be a number, got '{value}'")
            }
            ConfigError::InvalidLookback { value } => write!(
                f,
                "ADOPTION_LOOKBACK_DAYS must be a positive whole number, got '{value}'"
            ),
            ConfigError::InvalidSlaDays { value } => write!(
                f,
                "ADOPTION_FEEDBACK_SLA_DAYS must be a non-negative whole number, got '{value}'"
            ),
            ConfigError::InvalidOffset { value } => {
                write!(f, "ADOPTION_UTC_OFFSET must look like +05:30, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
