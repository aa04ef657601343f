pub mod aggregate;
pub mod auth;
pub mod calendar;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod labels;
pub mod models;
pub mod openapi;
pub mod practice;
pub mod settings;
pub mod source;
pub mod status;
pub mod timer;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::get,
};
use handlers::{
    get_ical, get_lessons, get_summary, get_timer, healthz_live, healthz_ready, post_timer, root,
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::ical::ICalExporter;
use crate::openapi::ApiDoc;
use crate::practice::PracticeSessions;
use crate::settings::Settings;
use crate::source::{LessonDataSource, select_source};
use crate::validation::validate_timezone;

/// Interval between practice timer ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub source: Arc<dyn LessonDataSource>,
    pub exporter: Arc<ICalExporter>,
    pub practice: PracticeSessions,
}

impl AppState {
    pub fn new(settings: Settings, source: Arc<dyn LessonDataSource>) -> Self {
        Self {
            settings,
            source,
            exporter: Arc::new(ICalExporter::new()),
            practice: PracticeSessions::new(),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    if validate_timezone(&settings.timezone).is_err() {
        return Err(format!("unknown timezone in settings: {}", settings.timezone).into());
    }

    let source = select_source(&settings).await?;
    let state = AppState::new(settings, source);
    let _scheduler = state.practice.spawn_scheduler(TICK_PERIOD);

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Improv Coach Lesson API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/lessons", get(get_lessons))
        .route("/lessons/summary", get(get_summary))
        .route("/lessons.ical", get(get_ical))
        .route("/practice/{id}/timer", get(get_timer).post(post_timer))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
