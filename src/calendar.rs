//! Calendar-date helpers shared by the classifier, the label formatter and
//! the aggregator. All dates are local to the timezone the caller's `now`
//! carries.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

/// Days in a calendar week.
pub const WEEK_DAYS: i64 = 7;

/// Truncates an instant to its calendar date in `tz`.
pub fn local_date<Tz: TimeZone, Src: TimeZone>(instant: &DateTime<Src>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// First day of the week containing `date`. Weeks start on Sunday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Whether `date` falls in the 7-day week beginning at `week_start(today)`.
pub fn in_week_of(date: NaiveDate, today: NaiveDate) -> bool {
    let start = week_start(today);
    date >= start && date <= start + Duration::days(WEEK_DAYS - 1)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use chrono_tz::Tz;

    use super::*;

    #[test]
    fn test_week_start_is_sunday() {
        // 2024-06-10 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(week_start(monday), NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());

        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(week_start(sunday), sunday);
    }

    #[test]
    fn test_in_week_of_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(in_week_of(sunday, today));
        assert!(in_week_of(saturday, today));
        assert!(!in_week_of(sunday - Duration::days(1), today));
        assert!(!in_week_of(saturday + Duration::days(1), today));
    }

    #[test]
    fn test_local_date_follows_timezone() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 10, 23, 30, 0).unwrap();
        let warsaw: Tz = "Europe/Warsaw".parse().unwrap();
        assert_eq!(
            local_date(&instant, &Utc),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
        assert_eq!(
            local_date(&instant, &warsaw),
            NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()
        );
    }
}
