use chrono::{DateTime, TimeZone};
use icalendar::{Calendar, Component, Event, EventLike};
use tracing::warn;

use crate::models::{LessonRecord, lesson_end};
use crate::status::classify;

#[derive(Clone, Default)]
pub struct ICalExporter;

impl ICalExporter {
    pub fn new() -> Self {
        Self
    }

    /// Renders lessons as a calendar feed. Lessons whose start cannot be
    /// parsed, or whose end is out of range, are left out.
    pub fn generate<Tz: TimeZone>(&self, now: &DateTime<Tz>, lessons: &[LessonRecord]) -> Vec<u8> {
        let mut calendar = Calendar::new();
        calendar.name("Improv Lesson Plan");

        for lesson in lessons {
            let Some(start) = lesson.start_instant() else {
                warn!(lesson_id = %lesson.id, "skipping lesson without a valid start in calendar export");
                continue;
            };
            let Some(end) = lesson_end(start, lesson.duration_minutes) else {
                warn!(lesson_id = %lesson.id, "skipping lesson with out-of-range duration in calendar export");
                continue;
            };
            let title = lesson.title.as_deref().unwrap_or("Lesson");

            let mut event = Event::new();
            event.summary(&format!("Improv: {title}"));
            event.starts(start);
            event.ends(end);
            if let Some(team) = &lesson.team_name {
                event.location(team);
            }

            let mut description = format!("Status: {}", classify(now, lesson).as_str());
            if let Some(team) = &lesson.team_name {
                description.push_str(&format!("\nTeam: {team}"));
            }
            if let Some(notes) = &lesson.notes {
                description.push_str(&format!("\nNotes: {notes}"));
            }
            event.description(&description);
            event.uid(&format!("{}-improv-lesson", lesson.id.replace(' ', "-")));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}
