use chrono::{DateTime, Duration, Utc};

/// Elapsed time assumed when a step has no usable entry timestamp.
///
/// Large enough to forfeit any speed bonus, never large enough to block evaluation.
pub const MISSING_START_ELAPSED_SECS: f64 = 999.0;

/// Time source for the engine: wall clock in production, fixed in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Advance a fixed clock by whole seconds.
    pub fn advance_secs(&mut self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Seconds between a step becoming visible and the answer being submitted.
///
/// A missing start time or a start time in the future (clock skew) yields
/// `MISSING_START_ELAPSED_SECS`.
#[must_use]
pub fn elapsed_secs(started_at: Option<DateTime<Utc>>, submitted_at: DateTime<Utc>) -> f64 {
    let Some(started_at) = started_at else {
        return MISSING_START_ELAPSED_SECS;
    };
    let millis = submitted_at.signed_duration_since(started_at).num_milliseconds();
    if millis < 0 {
        return MISSING_START_ELAPSED_SECS;
    }

    // Step visits are bounded to human timescales, so the cast cannot lose
    // meaningful precision.
    #[allow(clippy::cast_precision_loss)]
    let secs = millis as f64 / 1000.0;
    secs
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
