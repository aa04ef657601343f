use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    AppState,
    aggregate::{aggregate, history},
    auth::verify_token,
    error::ApiError,
    labels::{LabelOptions, format_relative_label},
    models::{HistoryView, LessonRecord, LessonView, SummaryView},
    status::classify,
    timer::{TimerEvent, TimerView},
    validation::{validate_instant, validate_status, validate_timezone},
};

#[derive(Debug, Deserialize)]
pub struct LessonQuery {
    pub token: Option<String>,
    pub tz: Option<String>,
    pub at: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TimerCommand {
    pub event: TimerEvent,
}

fn evaluation_now(state: &AppState, query: &LessonQuery) -> Result<DateTime<Tz>, ApiError> {
    let tz = validate_timezone(query.tz.as_deref().unwrap_or(&state.settings.timezone))?;
    let instant = validate_instant(query.at.as_deref())?;
    Ok(instant.with_timezone(&tz))
}

fn label_options(state: &AppState) -> LabelOptions {
    LabelOptions {
        include_year: state.settings.label_include_year,
    }
}

fn lesson_view<Z>(now: &DateTime<Z>, lesson: LessonRecord, options: LabelOptions) -> LessonView
where
    Z: TimeZone,
    Z::Offset: std::fmt::Display,
{
    let status = classify(now, &lesson);
    let label = lesson
        .start_instant()
        .map(|start| format_relative_label(now, &start, options));
    LessonView {
        lesson,
        status,
        label,
        can_start: status.can_start(),
    }
}

#[utoipa::path(get, path = "/", tag = "lessons")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Improv Coach Lesson API",
        "endpoints": {
            "/lessons": "Lessons with their current status and label",
            "/lessons/summary": "Dashboard counts and prioritised active lessons",
            "/lessons.ical": "Download lessons as iCal file",
            "/practice/{id}/timer": "Practice session stopwatch"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "lessons")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "lessons")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/lessons",
    params(
        ("tz" = Option<String>, Query, description = "IANA timezone for calendar days"),
        ("at" = Option<String>, Query, description = "RFC 3339 evaluation instant (defaults to now)"),
        ("status" = Option<String>, Query, description = "Only lessons with this status"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Lessons with status", body = [LessonView]),
        (status = 400, description = "Invalid query parameter"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "lessons"
)]
pub async fn get_lessons(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<LessonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let now = evaluation_now(&state, &query)?;
    let wanted = validate_status(query.status.as_deref())?;
    let options = label_options(&state);

    let lessons = state.source.fetch_lessons().await?;
    let views: Vec<LessonView> = lessons
        .into_iter()
        .map(|lesson| lesson_view(&now, lesson, options))
        .filter(|view| wanted.is_none_or(|status| view.status == status))
        .collect();

    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/lessons/summary",
    params(
        ("tz" = Option<String>, Query, description = "IANA timezone for calendar days"),
        ("at" = Option<String>, Query, description = "RFC 3339 evaluation instant (defaults to now)"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Dashboard summary", body = SummaryView),
        (status = 400, description = "Invalid query parameter"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "lessons"
)]
pub async fn get_summary(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<LessonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let now = evaluation_now(&state, &query)?;
    let options = label_options(&state);

    let lessons = state.source.fetch_lessons().await?;
    let summary = aggregate(&now, &lessons);
    let stats = history(&now, &lessons);

    Ok(Json(SummaryView {
        active_count: summary.active_count,
        today_count: summary.today_count,
        this_week_count: summary.this_week_count,
        completed_count: summary.completed_count,
        sorted_active: summary
            .sorted_active
            .into_iter()
            .map(|lesson| lesson_view(&now, lesson, options))
            .collect(),
        history: HistoryView {
            sessions: stats.sessions,
            minutes_coached: stats.minutes_coached,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/lessons.ical",
    params(
        ("tz" = Option<String>, Query, description = "IANA timezone for calendar days"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "lessons"
)]
pub async fn get_ical(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<LessonQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    let now = evaluation_now(&state, &query)?;
    let lessons = state.source.fetch_lessons().await?;
    let body = state.exporter.generate(&now, &lessons);

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/calendar"),
            (CONTENT_DISPOSITION, "attachment; filename=improv_lessons.ics"),
        ],
        body,
    ))
}

#[utoipa::path(
    get,
    path = "/practice/{id}/timer",
    params(
        ("id" = String, Path, description = "Practice session id"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Current timer", body = TimerView),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "practice"
)]
pub async fn get_timer(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    Ok(Json(TimerView::from(state.practice.get(&id).await)))
}

#[utoipa::path(
    post,
    path = "/practice/{id}/timer",
    params(
        ("id" = String, Path, description = "Practice session id"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    request_body = TimerCommand,
    responses(
        (status = 200, description = "Timer after the event", body = TimerView),
        (status = 400, description = "Ticks are scheduler-only"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "practice"
)]
pub async fn post_timer(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
    Json(command): Json<TimerCommand>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    verify_token(&state.settings, auth_header, query.token.as_deref())?;

    if command.event == TimerEvent::Tick {
        return Err(ApiError::BadRequest(
            "tick events come from the scheduler".into(),
        ));
    }
    let timer = state.practice.apply(&id, command.event).await;
    Ok(Json(TimerView::from(timer)))
}
