use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("idle pause must be between 30 and 3600 seconds")]
    InvalidIdlePauseSeconds,
}

/// Behaviour switches for the progression engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    auto_advance: bool,
    idle_pause_secs: u32,
    rng_seed: Option<u64>,
}

impl EngineSettings {
    pub const DEFAULT_IDLE_PAUSE_SECS: u32 = 300;

    /// Creates validated engine settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidIdlePauseSeconds` outside `30..=3600`.
    pub fn new(
        auto_advance: bool,
        idle_pause_secs: u32,
        rng_seed: Option<u64>,
    ) -> Result<Self, SettingsError> {
        if !(30..=3600).contains(&idle_pause_secs) {
            return Err(SettingsError::InvalidIdlePauseSeconds);
        }
        Ok(Self {
            auto_advance,
            idle_pause_secs,
            rng_seed,
        })
    }

    /// Settings with a fixed shuffle/percentile seed, for replay and tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    /// When true, a submit evaluates and moves on in the same turn.
    #[must_use]
    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    #[must_use]
    pub fn idle_pause_secs(&self) -> u32 {
        self.idle_pause_secs
    }

    #[must_use]
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            idle_pause_secs: Self::DEFAULT_IDLE_PAUSE_SECS,
            rng_seed: None,
        }
    }
}
