use crate::source::CellValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Numbers above this are read as spreadsheet serial day counts.
///
/// Inherited heuristic: a large numeric field that is not a date will also be converted.
pub const SERIAL_DATE_THRESHOLD: f64 = 10_000.0;

/// Serial day number of 1970-01-01 in the 1899-12-30 based spreadsheet calendar.
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%a %b %d %Y %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y, %I:%M:%S %p",
    "%d %b %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%a %b %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
];

static OFFSET_SUFFIX: OnceLock<Regex> = OnceLock::new();

// The pattern is a literal, so compilation can only fail at development time.
fn offset_suffix() -> &'static Regex {
    OFFSET_SUFFIX.get_or_init(|| {
        Regex::new(
            r"^(?P<body>.*\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:\s*[AaPp][Mm])?)\s*(?:GMT|UTC)?\s*(?P<sign>[+-])(?P<hours>\d{1,2}):?(?P<minutes>\d{2})$",
        )
        .expect("offset suffix pattern compiles")
    })
}

/// Single entry point for turning cell values into UTC instants.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    default_offset: FixedOffset,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::utc()
    }
}

impl DateNormalizer {
    /// `default_offset` applies to date strings that carry no offset of their own.
    pub fn new(default_offset: FixedOffset) -> Self {
        Self { default_offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Returns `None` for empty, unparseable, or out-of-range values; never panics.
    pub fn normalize(&self, value: &CellValue) -> Option<DateTime<Utc>> {
        match value {
            CellValue::Empty => None,
            CellValue::Instant(instant) => Some(*instant),
            CellValue::Number(number) => from_serial(*number),
            CellValue::Text(text) => self.parse_text(text),
        }
    }

    pub fn normalize_opt(&self, value: Option<&CellValue>) -> Option<DateTime<Utc>> {
        value.and_then(|value| self.normalize(value))
    }

    pub fn parse_text(&self, value: &str) -> Option<DateTime<Utc>> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(number) = trimmed.parse::<f64>() {
            return from_serial(number);
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(instant.with_timezone(&Utc));
        }

        let body = strip_zone_name(trimmed);

        if let Some(captures) = offset_suffix().captures(body) {
            let hours: i32 = captures["hours"].parse().ok()?;
            let minutes: i32 = captures["minutes"].parse().ok()?;
            if minutes >= 60 {
                return None;
            }
            let mut seconds = (hours * 60 + minutes) * 60;
            if &captures["sign"] == "-" {
                seconds = -seconds;
            }
            let offset = FixedOffset::east_opt(seconds)?;
            let naive = parse_wall_clock(captures["body"].trim())?;
            return to_utc(offset, naive);
        }

        if let Some(utc_body) = strip_utc_marker(body) {
            let naive = parse_wall_clock(utc_body)?;
            return Some(Utc.from_utc_datetime(&naive));
        }

        let naive = parse_wall_clock(body)?;
        to_utc(self.default_offset, naive)
    }
}

fn from_serial(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial <= SERIAL_DATE_THRESHOLD {
        return None;
    }

    let millis = ((serial - UNIX_EPOCH_SERIAL) * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
}

fn to_utc(offset: FixedOffset, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|instant| instant.with_timezone(&Utc))
}

// Drops a trailing "(India Standard Time)" style zone label.
fn strip_zone_name(value: &str) -> &str {
    match value.rfind('(') {
        Some(start) if value.ends_with(')') => value[..start].trim_end(),
        _ => value,
    }
}

fn strip_utc_marker(value: &str) -> Option<&str> {
    ["GMT", "UTC", "Z"].iter().find_map(|marker| {
        value
            .strip_suffix(marker)
            .map(str::trim_end)
            .filter(|body| body.chars().next_back().is_some_and(|c| c.is_ascii_digit()))
    })
}

fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
