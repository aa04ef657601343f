use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Lesson length used when a record carries no usable duration.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Minutes a lesson lasts: the given duration when positive, otherwise
/// [`DEFAULT_DURATION_MINUTES`].
pub fn effective_minutes(duration_minutes: Option<i64>) -> i64 {
    match duration_minutes {
        Some(minutes) if minutes > 0 => minutes,
        _ => DEFAULT_DURATION_MINUTES,
    }
}

/// End of a lesson starting at `start`, or `None` when the duration runs
/// past what a timestamp can represent.
pub fn lesson_end(start: DateTime<Utc>, duration_minutes: Option<i64>) -> Option<DateTime<Utc>> {
    TimeDelta::try_minutes(effective_minutes(duration_minutes))
        .and_then(|duration| start.checked_add_signed(duration))
}

// Upstream records are loosely typed: strings, epoch numbers and nulls all
// show up. Anything unusable becomes an empty string and classifies as past.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, alias = "date", deserialize_with = "lenient_text")]
    #[schema(example = "2024-06-10T13:00:00Z")]
    pub scheduled_start: String,
    #[serde(default, alias = "duration", deserialize_with = "lenient_minutes")]
    pub duration_minutes: Option<i64>,
    #[serde(default, alias = "isUpcoming", deserialize_with = "lenient_flag")]
    pub marked_upcoming: Option<bool>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LessonRecord {
    pub fn new(id: impl Into<String>, scheduled_start: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            id: id.into(),
            scheduled_start: scheduled_start.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration_minutes: Some(duration_minutes),
            marked_upcoming: None,
            title: None,
            team_name: None,
            notes: None,
        }
    }

    pub fn with_marked_upcoming(mut self, marked: bool) -> Self {
        self.marked_upcoming = Some(marked);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Parses `scheduled_start`. Naive timestamps are taken as UTC, bare
    /// integers as epoch milliseconds.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        let raw = self.scheduled_start.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(millis) = raw.parse::<i64>() {
            return DateTime::from_timestamp_millis(millis);
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn effective_duration_minutes(&self) -> i64 {
        effective_minutes(self.duration_minutes)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LessonStatus {
    Upcoming,
    Today,
    InProgress,
    Completed,
    Past,
}

impl LessonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Upcoming => "upcoming",
            LessonStatus::Today => "today",
            LessonStatus::InProgress => "in-progress",
            LessonStatus::Completed => "completed",
            LessonStatus::Past => "past",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(LessonStatus::Upcoming),
            "today" => Some(LessonStatus::Today),
            "in-progress" => Some(LessonStatus::InProgress),
            "completed" => Some(LessonStatus::Completed),
            "past" => Some(LessonStatus::Past),
            _ => None,
        }
    }

    /// Not yet concluded.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            LessonStatus::Upcoming | LessonStatus::Today | LessonStatus::InProgress
        )
    }

    /// Sort rank for active listings, lower first.
    pub fn priority(&self) -> u8 {
        match self {
            LessonStatus::InProgress => 0,
            LessonStatus::Today => 1,
            LessonStatus::Upcoming => 2,
            _ => 3,
        }
    }

    /// Whether a "Start"/"Resume" practice action applies.
    pub fn can_start(&self) -> bool {
        matches!(self, LessonStatus::Today | LessonStatus::InProgress)
    }
}

/// A lesson as rendered to list and dashboard consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonView {
    #[serde(flatten)]
    pub lesson: LessonRecord,
    pub status: LessonStatus,
    pub label: Option<String>,
    pub can_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub sessions: usize,
    pub minutes_coached: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub active_count: usize,
    pub today_count: usize,
    pub this_week_count: usize,
    pub completed_count: usize,
    pub sorted_active: Vec<LessonView>,
    pub history: HistoryView,
}
