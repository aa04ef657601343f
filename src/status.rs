//! Temporal status of a lesson relative to an evaluation instant.
//!
//! Status is never stored. It is recomputed from `(now, start, duration,
//! marked_upcoming)` on every read, so the same record moves from `upcoming`
//! to `today` to `in-progress` to `completed` as the clock advances.

use chrono::{DateTime, TimeZone, Utc};
use tracing::warn;

use crate::calendar::local_date;
use crate::models::{LessonRecord, LessonStatus, lesson_end};

/// Classifies `lesson` as seen at `now`. Calendar dates are taken in `now`'s
/// timezone. A start that cannot be parsed classifies as `Past`.
pub fn classify<Tz: TimeZone>(now: &DateTime<Tz>, lesson: &LessonRecord) -> LessonStatus {
    let Some(start) = lesson.start_instant() else {
        warn!(
            lesson_id = %lesson.id,
            scheduled_start = %lesson.scheduled_start,
            "unparseable lesson start, treating as past"
        );
        return LessonStatus::Past;
    };
    classify_at(now, start, lesson.duration_minutes, lesson.marked_upcoming)
}

/// Branches are checked in order; same-day checks come first because a
/// lesson later today is also "in the future". A lesson whose end cannot be
/// represented stays in progress once started.
pub fn classify_at<Tz: TimeZone>(
    now: &DateTime<Tz>,
    start: DateTime<Utc>,
    duration_minutes: Option<i64>,
    marked_upcoming: Option<bool>,
) -> LessonStatus {
    let tz = now.timezone();
    let now_utc = now.with_timezone(&Utc);

    if local_date(&start, &tz) == now.date_naive() {
        let end = lesson_end(start, duration_minutes);

        return if now_utc < start {
            LessonStatus::Today
        } else if end.is_none_or(|end| now_utc <= end) {
            LessonStatus::InProgress
        } else {
            LessonStatus::Completed
        };
    }

    if start > now_utc {
        LessonStatus::Upcoming
    } else if marked_upcoming == Some(false) {
        LessonStatus::Completed
    } else {
        LessonStatus::Past
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono_tz::Tz;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_example_scenario() {
        let now = at(2024, 6, 10, 14, 0);
        let a = LessonRecord::new("A", at(2024, 6, 10, 13, 0), 90);
        let b = LessonRecord::new("B", at(2024, 6, 10, 16, 0), 60);
        let c = LessonRecord::new("C", at(2024, 6, 12, 10, 0), 60);
        let d = LessonRecord::new("D", at(2024, 6, 1, 10, 0), 60).with_marked_upcoming(false);

        assert_eq!(classify(&now, &a), LessonStatus::InProgress);
        assert_eq!(classify(&now, &b), LessonStatus::Today);
        assert_eq!(classify(&now, &c), LessonStatus::Upcoming);
        assert_eq!(classify(&now, &d), LessonStatus::Completed);
    }

    #[test]
    fn test_end_boundary_is_inclusive() {
        let start = at(2024, 6, 10, 14, 0);
        let lesson = LessonRecord::new("x", start, 30);

        assert_eq!(classify(&start, &lesson), LessonStatus::InProgress);

        let at_end = start + Duration::minutes(30);
        assert_eq!(classify(&at_end, &lesson), LessonStatus::InProgress);

        let after_end = at_end + Duration::milliseconds(1);
        assert_eq!(classify(&after_end, &lesson), LessonStatus::Completed);
    }

    #[test]
    fn test_later_today_becomes_in_progress() {
        let lesson = LessonRecord::new("x", at(2024, 6, 10, 18, 0), 60);
        assert_eq!(classify(&at(2024, 6, 10, 9, 0), &lesson), LessonStatus::Today);
        assert_eq!(
            classify(&at(2024, 6, 10, 18, 5), &lesson),
            LessonStatus::InProgress
        );
    }

    #[test]
    fn test_default_duration_fallback() {
        let now = at(2024, 6, 10, 14, 0);
        let start = now - Duration::minutes(90);

        let mut lesson = LessonRecord::new("x", start, 0);
        assert_eq!(classify(&now, &lesson), LessonStatus::Completed);

        lesson.duration_minutes = None;
        assert_eq!(classify(&now, &lesson), LessonStatus::Completed);

        // 45 minutes in is still within the default hour.
        let recent = LessonRecord::new("y", now - Duration::minutes(45), 0);
        assert_eq!(classify(&now, &recent), LessonStatus::InProgress);
    }

    #[test]
    fn test_past_depends_on_marked_upcoming() {
        let now = at(2024, 6, 10, 14, 0);
        let lesson = LessonRecord::new("x", now - Duration::days(3), 60);
        assert_eq!(classify(&now, &lesson), LessonStatus::Past);

        let marked = lesson.clone().with_marked_upcoming(false);
        assert_eq!(classify(&now, &marked), LessonStatus::Completed);

        let still_upcoming = lesson.with_marked_upcoming(true);
        assert_eq!(classify(&now, &still_upcoming), LessonStatus::Past);
    }

    #[test]
    fn test_calendar_day_not_rolling_window() {
        // 23:30 the night before is less than 24h ago but a different day.
        let now = at(2024, 6, 10, 0, 30);
        let lesson = LessonRecord::new("x", at(2024, 6, 9, 23, 0), 60);
        assert_eq!(classify(&now, &lesson), LessonStatus::Past);

        // Early tomorrow morning is not "today" even though it is close.
        let late = at(2024, 6, 10, 23, 50);
        let tomorrow = LessonRecord::new("y", at(2024, 6, 11, 0, 10), 60);
        assert_eq!(classify(&late, &tomorrow), LessonStatus::Upcoming);
    }

    #[test]
    fn test_calendar_day_uses_now_timezone() {
        let warsaw: Tz = "Europe/Warsaw".parse().unwrap();
        // 22:30 UTC on the 10th is 00:30 on the 11th in Warsaw.
        let lesson = LessonRecord::new("x", at(2024, 6, 10, 22, 30), 60);
        let now_utc = at(2024, 6, 10, 12, 0);

        assert_eq!(classify(&now_utc, &lesson), LessonStatus::Today);
        assert_eq!(
            classify(&now_utc.with_timezone(&warsaw), &lesson),
            LessonStatus::Upcoming
        );
    }

    #[test]
    fn test_huge_duration_does_not_overflow() {
        let now = at(2024, 6, 10, 14, 0);
        let running = LessonRecord::new("x", at(2024, 6, 10, 13, 0), i64::MAX);
        assert_eq!(classify(&now, &running), LessonStatus::InProgress);

        let later = LessonRecord::new("y", at(2024, 6, 10, 18, 0), i64::MAX);
        assert_eq!(classify(&now, &later), LessonStatus::Today);

        let old = LessonRecord::new("z", at(2024, 6, 1, 10, 0), i64::MAX);
        assert_eq!(classify(&now, &old), LessonStatus::Past);
    }

    #[test]
    fn test_null_start_from_wire_is_past() {
        let now = at(2024, 6, 10, 14, 0);
        let lessons: Vec<LessonRecord> = serde_json::from_str(
            r#"[{"id":1,"scheduledStart":null},{"id":"2","scheduledStart":"2024-06-10T13:30:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(classify(&now, &lessons[0]), LessonStatus::Past);
        assert_eq!(classify(&now, &lessons[1]), LessonStatus::InProgress);
    }

    #[test]
    fn test_unparseable_start_is_past() {
        let now = at(2024, 6, 10, 14, 0);
        let mut lesson = LessonRecord::new("x", now, 60);
        lesson.scheduled_start = "not a date".into();
        assert_eq!(classify(&now, &lesson), LessonStatus::Past);
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let now = at(2024, 6, 10, 14, 0);
        let lesson = LessonRecord::new("x", at(2024, 6, 10, 13, 30), 45);
        let first = classify(&now, &lesson);
        for _ in 0..10 {
            assert_eq!(classify(&now, &lesson), first);
        }
    }
}
