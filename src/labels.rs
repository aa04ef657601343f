use std::fmt::Display;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::calendar::{in_week_of, local_date};

const TIME_FORMAT: &str = "%-I:%M %p";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelOptions {
    /// Append the year to month/day labels outside the current year.
    pub include_year: bool,
}

/// Human label for `scheduled_start`, rendered in `now`'s timezone.
///
/// Checked in order, first match wins: today, tomorrow, yesterday, a day in
/// the current Sunday-based week, then month and day.
pub fn format_relative_label<Tz>(
    now: &DateTime<Tz>,
    scheduled_start: &DateTime<Utc>,
    options: LabelOptions,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = now.timezone();
    let local = scheduled_start.with_timezone(&tz);
    let date = local_date(scheduled_start, &tz);
    let today = now.date_naive();
    let time = local.format(TIME_FORMAT);

    if date == today {
        format!("Today, {time}")
    } else if today.succ_opt() == Some(date) {
        format!("Tomorrow, {time}")
    } else if today.pred_opt() == Some(date) {
        format!("Yesterday, {time}")
    } else if in_week_of(date, today) {
        format!("{}, {time}", local.format("%A"))
    } else if options.include_year && date.year() != today.year() {
        format!("{}, {time}", local.format("%b %-d, %Y"))
    } else {
        format!("{}, {time}", local.format("%b %-d"))
    }
}

#[cfg(test)]
mod tests {
    use chrono_tz::Tz;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    // 2024-06-12 is a Wednesday; its week runs Sun 9th to Sat 15th.
    fn now() -> DateTime<Utc> {
        at(2024, 6, 12, 10, 0)
    }

    #[test]
    fn test_today_tomorrow_yesterday() {
        let opts = LabelOptions::default();
        assert_eq!(
            format_relative_label(&now(), &at(2024, 6, 12, 16, 0), opts),
            "Today, 4:00 PM"
        );
        assert_eq!(
            format_relative_label(&now(), &at(2024, 6, 13, 9, 30), opts),
            "Tomorrow, 9:30 AM"
        );
        assert_eq!(
            format_relative_label(&now(), &at(2024, 6, 11, 19, 0), opts),
            "Yesterday, 7:00 PM"
        );
    }

    #[test]
    fn test_weekday_within_current_week() {
        let opts = LabelOptions::default();
        assert_eq!(
            format_relative_label(&now(), &at(2024, 6, 15, 12, 0), opts),
            "Saturday, 12:00 PM"
        );
        assert_eq!(
            format_relative_label(&now(), &at(2024, 6, 9, 18, 15), opts),
            "Sunday, 6:15 PM"
        );
    }

    #[test]
    fn test_tomorrow_wins_over_next_week() {
        // Saturday evening: tomorrow is Sunday of the following week.
        let saturday = at(2024, 6, 15, 20, 0);
        assert_eq!(
            format_relative_label(&saturday, &at(2024, 6, 16, 10, 0), LabelOptions::default()),
            "Tomorrow, 10:00 AM"
        );
    }

    #[test]
    fn test_month_day_outside_week() {
        let opts = LabelOptions::default();
        assert_eq!(
            format_relative_label(&now(), &at(2024, 6, 16, 10, 0), opts),
            "Jun 16, 10:00 AM"
        );
        assert_eq!(
            format_relative_label(&now(), &at(2023, 12, 1, 10, 0), opts),
            "Dec 1, 10:00 AM"
        );
    }

    #[test]
    fn test_year_appended_only_when_enabled_and_different() {
        let opts = LabelOptions { include_year: true };
        assert_eq!(
            format_relative_label(&now(), &at(2023, 12, 1, 10, 0), opts),
            "Dec 1, 2023, 10:00 AM"
        );
        assert_eq!(
            format_relative_label(&now(), &at(2024, 7, 4, 10, 0), opts),
            "Jul 4, 10:00 AM"
        );
    }

    #[test]
    fn test_rendered_in_now_timezone() {
        let warsaw: Tz = "Europe/Warsaw".parse().unwrap();
        let local_now = now().with_timezone(&warsaw);
        assert_eq!(
            format_relative_label(&local_now, &at(2024, 6, 12, 16, 0), LabelOptions::default()),
            "Today, 6:00 PM"
        );
        // 22:30 UTC is already tomorrow in Warsaw.
        assert_eq!(
            format_relative_label(&local_now, &at(2024, 6, 12, 22, 30), LabelOptions::default()),
            "Tomorrow, 12:30 AM"
        );
    }
}
