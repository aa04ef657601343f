//! Practice-session stopwatch.
//!
//! The timer holds no clock of its own. Elapsed time only advances when an
//! external scheduler delivers [`TimerEvent::Tick`], one per second.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PracticeTimer {
    pub elapsed_seconds: u64,
    pub running: bool,
}

/// Timer state as returned to clients, with the rendered clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: PracticeTimer,
    pub display: String,
}

impl From<PracticeTimer> for TimerView {
    fn from(timer: PracticeTimer) -> Self {
        Self {
            display: timer.display(),
            timer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimerEvent {
    Start,
    Pause,
    Reset,
    Tick,
}

impl PracticeTimer {
    pub fn apply(self, event: TimerEvent) -> Self {
        match event {
            TimerEvent::Start => Self {
                running: true,
                ..self
            },
            TimerEvent::Pause => Self {
                running: false,
                ..self
            },
            TimerEvent::Reset => Self::default(),
            TimerEvent::Tick if self.running => Self {
                elapsed_seconds: self.elapsed_seconds.saturating_add(1),
                ..self
            },
            TimerEvent::Tick => self,
        }
    }

    /// `MM:SS`, or `H:MM:SS` once an hour has passed.
    pub fn display(&self) -> String {
        let hours = self.elapsed_seconds / 3600;
        let minutes = (self.elapsed_seconds % 3600) / 60;
        let seconds = self.elapsed_seconds % 60;
        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes:02}:{seconds:02}")
        }
    }
}

/// Sends a `Tick` every `period` until the receiving side goes away.
pub fn spawn_ticker(period: Duration, sender: mpsc::Sender<TimerEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            if sender.send(TimerEvent::Tick).await.is_err() {
                debug!("timer receiver closed, stopping ticker");
                break;
            }
        }
    })
}
