use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc, Weekday};

/// Counts Monday–Friday calendar days between two instants.
///
/// Days are taken in a fixed offset so an evening timestamp does not roll into the next
/// UTC date for hosts working in a local zone.
#[derive(Debug, Clone, Copy)]
pub struct BusinessDayCalculator {
    offset: FixedOffset,
}

impl Default for BusinessDayCalculator {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl BusinessDayCalculator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Weekdays after `start`'s date up to and including `end`'s date.
    ///
    /// Zero when either side is missing or `start >= end`.
    pub fn between(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> u32 {
        match (start, end) {
            (Some(start), Some(end)) if start < end => weekdays_after(
                start.with_timezone(&self.offset).date_naive(),
                end.with_timezone(&self.offset).date_naive(),
            ),
            _ => 0,
        }
    }
}

/// [`BusinessDayCalculator::between`] using UTC calendar dates.
pub fn business_days_between(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> u32 {
    BusinessDayCalculator::default().between(start, end)
}

fn weekdays_after(start: NaiveDate, end: NaiveDate) -> u32 {
    let span = (end - start).num_days();
    if span <= 0 {
        return 0;
    }

    let full_weeks = span / 7;
    let mut count = full_weeks * 5;
    let mut cursor = start + chrono::Duration::days(full_weeks * 7);
    while cursor < end {
        cursor = cursor.succ_opt().unwrap_or(end);
        if !matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
    }

    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single()
    }

    #[test]
    fn friday_to_monday_counts_only_monday() {
        // 2025-01-17 is a Friday
        assert_eq!(business_days_between(at(2025, 1, 17, 9), at(2025, 1, 20, 9)), 1);
    }

    #[test]
    fn same_or_reversed_instants_are_zero() {
        let friday = at(2025, 1, 17, 9);
        assert_eq!(business_days_between(friday, friday), 0);
        assert_eq!(business_days_between(at(2025, 1, 20, 9), friday), 0);
        assert_eq!(business_days_between(None, friday), 0);
        assert_eq!(business_days_between(friday, None), 0);
    }

    #[test]
    fn spans_of_several_weeks_skip_weekends() {
        // Monday 2025-01-06 to Monday 2025-01-27: three full weeks
        assert_eq!(business_days_between(at(2025, 1, 6, 9), at(2025, 1, 27, 9)), 15);
        // Wednesday to the following Tuesday
        assert_eq!(business_days_between(at(2025, 1, 8, 9), at(2025, 1, 14, 9)), 4);
        // Saturday to Sunday
        assert_eq!(business_days_between(at(2025, 1, 18, 9), at(2025, 1, 19, 9)), 0);
    }

    #[test]
    fn calendar_dates_follow_the_configured_offset() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).expect("valid offset");
        let calculator = BusinessDayCalculator::new(ist);
        // Friday 20:00 UTC is already Saturday in IST
        let start = at(2025, 1, 17, 20);
        let end = at(2025, 1, 20, 9);
        assert_eq!(calculator.between(start, end), 1);
        assert_eq!(business_days_between(start, end), 1);
        // Thursday 20:00 UTC is Friday in IST, so Friday no longer counts
        assert_eq!(calculator.between(at(2025, 1, 16, 20), end), 1);
        assert_eq!(business_days_between(at(2025, 1, 16, 20), end), 2);
    }
}
