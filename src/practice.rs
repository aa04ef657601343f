use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use crate::timer::{PracticeTimer, TimerEvent, spawn_ticker};

/// Timers for live practice sessions, keyed by session id.
#[derive(Clone, Default)]
pub struct PracticeSessions {
    timers: Arc<RwLock<HashMap<String, PracticeTimer>>>,
}

impl PracticeSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, session_id: &str) -> PracticeTimer {
        self.timers
            .read()
            .await
            .get(session_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn apply(&self, session_id: &str, event: TimerEvent) -> PracticeTimer {
        let mut timers = self.timers.write().await;
        let next = timers
            .get(session_id)
            .copied()
            .unwrap_or_default()
            .apply(event);
        timers.insert(session_id.to_string(), next);
        next
    }

    /// Delivers one `Tick` to every running timer.
    pub async fn tick_all(&self) {
        let mut timers = self.timers.write().await;
        for timer in timers.values_mut().filter(|t| t.running) {
            *timer = timer.apply(TimerEvent::Tick);
        }
    }

    /// Starts the scheduler that ticks all sessions once per `period`.
    pub fn spawn_scheduler(&self, period: Duration) -> JoinHandle<()> {
        let sessions = self.clone();
        let (tx, mut rx) = mpsc::channel(16);
        let ticker = spawn_ticker(period, tx);
        tokio::spawn(async move {
            info!(period_ms = period.as_millis() as u64, "practice timer scheduler started");
            while let Some(event) = rx.recv().await {
                if event == TimerEvent::Tick {
                    sessions.tick_all().await;
                }
            }
            ticker.abort();
        })
    }
}
