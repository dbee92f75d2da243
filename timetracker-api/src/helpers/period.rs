use chrono::{Datelike, Duration, NaiveDate};

/// Length of a timesheet period in days
pub const PERIOD_DAYS: i64 = 14;

/// The Monday on or before `date`
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(days_from_monday)
}

/// Inclusive `(start, end)` of the fourteen-day window that starts on the
/// Monday of `date`'s week.
pub fn period_for(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = monday_of_week(date);
    (start, start + Duration::days(PERIOD_DAYS - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_alignment_for_every_weekday() {
        // 2026-01-05 is a Monday
        let monday = date(2026, 1, 5);
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            assert_eq!(monday_of_week(day), monday, "failed for {}", day.weekday());
        }
        assert_eq!(monday_of_week(date(2026, 1, 4)), date(2025, 12, 29));
        assert_eq!(monday_of_week(date(2026, 1, 12)), date(2026, 1, 12));
    }

    #[test]
    fn test_period_spans_fourteen_days() {
        let (start, end) = period_for(date(2026, 1, 8));
        assert_eq!(start, date(2026, 1, 5));
        assert_eq!(end, date(2026, 1, 18));
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(end.weekday(), Weekday::Sun);
        assert_eq!((end - start).num_days(), PERIOD_DAYS - 1);
    }

    #[test]
    fn test_period_across_year_boundary() {
        let (start, end) = period_for(date(2027, 1, 1));
        assert_eq!(start, date(2026, 12, 28));
        assert_eq!(end, date(2027, 1, 10));
    }
}
