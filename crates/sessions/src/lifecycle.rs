//! Idle expiry for widget sessions.
//!
//! A session whose last activity is older than the configured idle window
//! is dropped by the periodic sweep. An expired session ID is simply
//! unknown afterwards; there is no resume.

use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdlePolicy {
    idle_minutes: u64,
}

impl IdlePolicy {
    pub fn new(idle_minutes: u64) -> Self {
        Self { idle_minutes }
    }

    pub fn idle_minutes(&self) -> u64 {
        self.idle_minutes
    }

    /// Whether a session last active at `last_active` has expired by `now`.
    pub fn is_expired(&self, last_active: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let elapsed = now.signed_duration_since(last_active).num_minutes();
        elapsed >= self.idle_minutes as i64
    }

    /// How often to sweep: a tenth of the idle window, clamped to
    /// 10 seconds .. 5 minutes.
    pub fn sweep_interval(&self) -> Duration {
        let secs = (self.idle_minutes * 60 / 10).clamp(10, 300);
        Duration::from_secs(secs)
    }
}
