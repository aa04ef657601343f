use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::TimerCommand;
use crate::models::{HistoryView, LessonRecord, LessonStatus, LessonView, SummaryView};
use crate::timer::{PracticeTimer, TimerEvent, TimerView};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_lessons,
        crate::handlers::get_summary,
        crate::handlers::get_ical,
        crate::handlers::get_timer,
        crate::handlers::post_timer
    ),
    components(schemas(
        LessonRecord,
        LessonStatus,
        LessonView,
        SummaryView,
        HistoryView,
        PracticeTimer,
        TimerView,
        TimerEvent,
        TimerCommand
    )),
    tags(
        (name = "lessons", description = "Lesson status and scheduling operations"),
        (name = "practice", description = "Live practice session timers")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
