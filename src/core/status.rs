//! # Status Poller
//!
//! Liveness of the backend. A probe runs immediately on start and then on a
//! fixed cadence (30 s by default). Each attempt, success or failure, is
//! reported to the event loop as [`Action::StatusProbed`].
//!
//! ```text
//!            probe truthy            probe falsy / error
//!  Unknown ───────────────▶ Online ◀──────────────────▶ Offline
//!     └──────────────────────────────────────────────────▲
//! ```
//!
//! There is no terminal state. The poller runs until its
//! [`CancellationToken`] is cancelled, which the TUI does on shutdown.
//!
//! A probe that has not answered within one interval counts as offline, so a
//! hung connection never stalls later updates.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use log::{debug, info, warn};
use serde_json::Value;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::Backend;
use crate::core::action::Action;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reachability {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl Reachability {
    pub fn label(self) -> &'static str {
        match self {
            Reachability::Unknown => "CyRA Connecting",
            Reachability::Online => "CyRA Online",
            Reachability::Offline => "CyRA Offline",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub reachability: Reachability,
    /// Time of the most recent probe attempt, whatever its outcome.
    pub last_update: Option<DateTime<Local>>,
}

impl StatusSnapshot {
    pub fn record(&mut self, online: bool, at: DateTime<Local>) {
        self.reachability = if online {
            Reachability::Online
        } else {
            Reachability::Offline
        };
        self.last_update = Some(at);
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy; arrays and
/// objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub struct StatusPoller {
    backend: Arc<dyn Backend>,
    tx: Sender<Action>,
    cancel: CancellationToken,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn Backend>, tx: Sender<Action>, cancel: CancellationToken) -> Self {
        Self {
            backend,
            tx,
            cancel,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One probe attempt. Any error or a timeout counts as offline.
    async fn probe_once(&self) -> bool {
        let Ok(outcome) = tokio::time::timeout(self.interval, self.backend.probe()).await else {
            warn!("Status probe timed out after {:?}", self.interval);
            return false;
        };
        match outcome {
            Ok(body) => {
                let online = is_truthy(&body);
                debug!("Status probe answered, online={}", online);
                online
            }
            Err(e) => {
                warn!(
                    "Status probe failed: status={:?} body={:?} message={}",
                    e.status(),
                    e.body(),
                    e
                );
                false
            }
        }
    }

    /// Probes until cancelled or until the event loop hangs up.
    pub async fn run(self) {
        info!("Status poller started (every {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Timestamps follow the runtime clock from a wall-clock anchor
        let started = tokio::time::Instant::now();
        let started_at = Local::now();

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let online = tokio::select! {
                _ = self.cancel.cancelled() => break,
                online = self.probe_once() => online,
            };

            let elapsed = TimeDelta::from_std(started.elapsed()).unwrap_or(TimeDelta::zero());
            let action = Action::StatusProbed {
                online,
                at: started_at + elapsed,
            };
            if self.tx.send(action).is_err() {
                debug!("Status poller receiver dropped");
                break;
            }
        }

        info!("Status poller stopped");
    }
}
