//! Transient notifications ("toasts").
//!
//! A notification becomes visible at `visible_at` and disappears once the
//! queue's time-to-live has elapsed after that. Time is always passed in by
//! the caller so the queue stays deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub text: String,
    pub visible_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Notifications {
    ttl: Duration,
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>, now: Instant) {
        self.push_delayed(level, text, now, Duration::ZERO);
    }

    /// Schedules a notification to appear `delay` after `now`.
    pub fn push_delayed(
        &mut self,
        level: Level,
        text: impl Into<String>,
        now: Instant,
        delay: Duration,
    ) {
        self.items.push(Notification {
            level,
            text: text.into(),
            visible_at: now + delay,
        });
    }

    /// Notifications showing at `now`, oldest first.
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.items
            .iter()
            .filter(move |n| n.visible_at <= now && now < n.visible_at + self.ttl)
    }

    /// Everything queued, shown or not.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// True while something is showing or still scheduled.
    pub fn is_active(&self) -> bool {
        !self.items.is_empty()
    }

    /// Drops notifications whose lifetime has ended.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items.retain(|n| now < n.visible_at + ttl);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
