use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::credentials::{CredentialStore, MemoryCredentialStore};
use crate::models::LessonRecord;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to read fixture file {path}: {source}")]
    FixtureIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid lesson data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where lesson records come from. Chosen once at startup.
#[async_trait]
pub trait LessonDataSource: Send + Sync {
    async fn fetch_lessons(&self) -> Result<Vec<LessonRecord>, SourceError>;

    fn name(&self) -> &'static str;
}

/// Lessons served by the coaching backend.
#[derive(Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: Arc<Url>,
    credentials: Arc<dyn CredentialStore>,
}

impl RemoteSource {
    pub fn new(base_url: Url, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
            credentials,
        }
    }

    fn lessons_url(&self) -> String {
        format!("{}/lessons", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl LessonDataSource for RemoteSource {
    async fn fetch_lessons(&self) -> Result<Vec<LessonRecord>, SourceError> {
        let mut request = self.client.get(self.lessons_url());
        if let Some(token) = self.credentials.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?.error_for_status()?;
        let lessons: Vec<LessonRecord> = response.json().await?;
        debug!(count = lessons.len(), "fetched lessons from backend");
        Ok(lessons)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Fixed lesson records for development and offline use.
#[derive(Clone, Debug, Default)]
pub struct FixtureSource {
    lessons: Arc<Vec<LessonRecord>>,
}

impl FixtureSource {
    pub fn new(lessons: Vec<LessonRecord>) -> Self {
        Self {
            lessons: Arc::new(lessons),
        }
    }

    /// Loads a JSON array of lesson records.
    pub async fn from_file(path: &Path) -> Result<Self, SourceError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::FixtureIo {
                path: path.to_path_buf(),
                source,
            })?;
        let lessons: Vec<LessonRecord> = serde_json::from_str(&raw)?;
        Ok(Self::new(lessons))
    }

    /// A small plan laid out around `now`.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let lesson = |id: &str, title: &str, team: &str, offset: Duration, minutes: i64| {
            let mut record = LessonRecord::new(id, now + offset, minutes).with_title(title);
            record.team_name = Some(team.to_string());
            record
        };
        Self::new(vec![
            lesson("fixture-1", "Yes, And Fundamentals", "Thursday Night Players", -Duration::minutes(20), 60),
            lesson("fixture-2", "Object Work and Environment", "Thursday Night Players", Duration::hours(2), 90),
            lesson("fixture-3", "Harold Openings", "Main Stage", Duration::days(2), 120),
            lesson("fixture-4", "Character Monologues", "Main Stage", Duration::days(9), 60),
            lesson("fixture-5", "Group Games Review", "Beginners", -Duration::days(3), 60)
                .with_marked_upcoming(false),
            lesson("fixture-6", "Long-form Jam", "Beginners", -Duration::days(12), 45),
        ])
    }
}

#[async_trait]
impl LessonDataSource for FixtureSource {
    async fn fetch_lessons(&self) -> Result<Vec<LessonRecord>, SourceError> {
        Ok(self.lessons.as_ref().clone())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

/// Picks fixtures when asked to or when no backend is configured,
/// otherwise the remote backend.
pub async fn select_source(settings: &Settings) -> Result<Arc<dyn LessonDataSource>, SourceError> {
    let source: Arc<dyn LessonDataSource> = match (&settings.backend_base_url, settings.use_fixtures) {
        (Some(base_url), false) => {
            let credentials = Arc::new(MemoryCredentialStore::new(settings.backend_token.clone()));
            Arc::new(RemoteSource::new(base_url.clone(), credentials))
        }
        _ => match &settings.fixture_path {
            Some(path) => Arc::new(FixtureSource::from_file(path).await?),
            None => Arc::new(FixtureSource::sample(Utc::now())),
        },
    };
    info!(source = source.name(), "lesson data source selected");
    Ok(source)
}
