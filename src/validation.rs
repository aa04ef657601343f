use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::ApiError;
use crate::models::LessonStatus;

pub fn validate_timezone(value: &str) -> Result<Tz, ApiError> {
    value
        .parse::<Tz>()
        .map_err(|_| ApiError::BadRequest(format!("unknown timezone: {value}")))
}

/// Evaluation instant: the given RFC 3339 timestamp, or the current time.
pub fn validate_instant(value: Option<&str>) -> Result<DateTime<Utc>, ApiError> {
    match value {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ApiError::BadRequest("at must be an RFC 3339 timestamp".into())),
    }
}

pub fn validate_status(value: Option<&str>) -> Result<Option<LessonStatus>, ApiError> {
    value
        .map(|raw| {
            LessonStatus::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown lesson status: {raw}")))
        })
        .transpose()
}
