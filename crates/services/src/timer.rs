//! Display-only simulation timer with idle pause.
//!
//! Scoring never reads this timer; it measures step time from timestamps
//! captured at step entry and submit.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimTimer {
    elapsed_secs: u64,
    running: bool,
    paused: bool,
    last_activity: DateTime<Utc>,
    idle_pause: Duration,
}

impl SimTimer {
    #[must_use]
    pub fn new(idle_pause_secs: u32, now: DateTime<Utc>) -> Self {
        Self {
            elapsed_secs: 0,
            running: false,
            paused: false,
            last_activity: now,
            idle_pause: Duration::seconds(i64::from(idle_pause_secs)),
        }
    }

    /// Zero the counter and start running.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.elapsed_secs = 0;
        self.running = true;
        self.paused = false;
        self.last_activity = now;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Called once per second by the host loop.
    ///
    /// Adds a second unless paused; pauses instead once the learner has been
    /// idle for longer than the threshold.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.running || self.paused {
            return;
        }
        if now.signed_duration_since(self.last_activity) > self.idle_pause {
            debug!(elapsed = self.elapsed_secs, "timer paused after inactivity");
            self.paused = true;
            return;
        }
        self.elapsed_secs += 1;
    }

    /// Record learner activity; resumes a paused timer while a step is shown.
    pub fn activity(&mut self, now: DateTime<Utc>, on_step: bool) {
        self.last_activity = now;
        if self.paused && on_step {
            debug!(elapsed = self.elapsed_secs, "timer resumed");
            self.paused = false;
        }
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// `MM:SS`; minutes keep growing past 59.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}
