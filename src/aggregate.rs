//! Dashboard and history aggregates over a lesson collection.
//!
//! Every aggregate goes through [`classify`], so the five statuses always
//! partition into the active and concluded groups:
//! `active_count + completed_count == lessons.len()`.

use chrono::{DateTime, TimeZone, Utc};

use crate::calendar::{in_week_of, local_date};
use crate::models::{LessonRecord, LessonStatus};
use crate::status::classify;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonSummary {
    pub active_count: usize,
    pub today_count: usize,
    pub this_week_count: usize,
    pub completed_count: usize,
    /// In-progress first, then later today, then upcoming; ties by start.
    pub sorted_active: Vec<LessonRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub sessions: usize,
    pub minutes_coached: i64,
}

struct Classified<'a> {
    lesson: &'a LessonRecord,
    status: LessonStatus,
    start: Option<DateTime<Utc>>,
}

fn classify_all<'a, Tz: TimeZone>(
    now: &DateTime<Tz>,
    lessons: &'a [LessonRecord],
) -> Vec<Classified<'a>> {
    lessons
        .iter()
        .map(|lesson| Classified {
            lesson,
            status: classify(now, lesson),
            start: lesson.start_instant(),
        })
        .collect()
}

pub fn aggregate<Tz: TimeZone>(now: &DateTime<Tz>, lessons: &[LessonRecord]) -> LessonSummary {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut summary = LessonSummary::default();
    let mut active = Vec::new();

    for item in classify_all(now, lessons) {
        if !item.status.is_active() {
            summary.completed_count += 1;
            continue;
        }

        summary.active_count += 1;
        if item.status == LessonStatus::Today {
            summary.today_count += 1;
        }
        if let Some(start) = item.start
            && in_week_of(local_date(&start, &tz), today)
        {
            summary.this_week_count += 1;
        }
        active.push(item);
    }

    active.sort_by(|a, b| {
        a.status
            .priority()
            .cmp(&b.status.priority())
            .then(a.start.cmp(&b.start))
    });
    summary.sorted_active = active.into_iter().map(|item| item.lesson.clone()).collect();
    summary
}

/// Concluded sessions and the minutes they covered, for history views.
pub fn history<Tz: TimeZone>(now: &DateTime<Tz>, lessons: &[LessonRecord]) -> HistoryStats {
    classify_all(now, lessons)
        .into_iter()
        .filter(|item| !item.status.is_active())
        .fold(HistoryStats::default(), |mut stats, item| {
            stats.sessions += 1;
            stats.minutes_coached = stats
                .minutes_coached
                .saturating_add(item.lesson.effective_duration_minutes());
            stats
        })
}
