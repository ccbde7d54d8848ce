use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, info};

use sim_core::model::{Answer, Catalog, EngineSettings};
use storage::repository::CatalogRepository;

use super::reducer::{self, Context, Effect, Event, Transition};
use super::state::{DeepLink, ProgressState, Screen};
use super::view::ProgressSnapshot;
use crate::Clock;
use crate::analytics::{AnalyticsSink, NoopAnalytics};
use crate::error::EngineError;
use crate::evaluation::StepFeedback;
use crate::history::History;
use crate::timer::SimTimer;

/// Single-actor shell around the reducer.
///
/// Owns the progress state, the clock, the seeded RNG, and the display
/// timer; applies reducer effects (analytics, timer) after each event.
pub struct SimulationEngine {
    catalog: Arc<Catalog>,
    settings: EngineSettings,
    clock: Clock,
    rng: StdRng,
    analytics: Arc<dyn AnalyticsSink>,
    deep_link: Option<DeepLink>,
    timer: SimTimer,
    state: ProgressState,
    opened: bool,
}

impl SimulationEngine {
    #[must_use]
    pub fn new(catalog: impl Into<Arc<Catalog>>, settings: EngineSettings) -> Self {
        let catalog = catalog.into();
        let clock = Clock::default();
        let rng = match settings.rng_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let timer = SimTimer::new(settings.idle_pause_secs(), clock.now());
        let state = ProgressState::initial(&catalog);
        Self {
            catalog,
            settings,
            clock,
            rng,
            analytics: Arc::new(NoopAnalytics),
            deep_link: None,
            timer,
            state,
            opened: false,
        }
    }

    /// Load the catalog from a repository and build an engine over it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the catalog cannot be loaded.
    pub async fn load(
        repo: &dyn CatalogRepository,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        let catalog = repo.load_catalog().await?;
        info!(simulations = catalog.len(), "catalog loaded");
        Ok(Self::new(catalog, settings))
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.timer = SimTimer::new(self.settings.idle_pause_secs(), clock.now());
        self
    }

    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    #[must_use]
    pub fn with_deep_link(mut self, deep_link: Option<DeepLink>) -> Self {
        self.deep_link = deep_link;
        self
    }

    /// Apply the deep link (if any) and announce the first screen.
    ///
    /// Runs at most once; `dispatch` calls it on first use.
    pub fn open(&mut self) {
        if self.opened {
            return;
        }
        self.opened = true;
        let transition = {
            let mut ctx = Context {
                catalog: &self.catalog,
                settings: &self.settings,
                now: self.clock.now(),
                rng: &mut self.rng,
            };
            reducer::bootstrap(&mut ctx, self.deep_link)
        };
        self.apply(transition);
    }

    /// Process one event. Never fails: every event yields a next state.
    ///
    /// Returns the evaluation feedback for submits on a step.
    pub fn dispatch(&mut self, event: Event) -> Option<StepFeedback> {
        self.open();
        let transition = {
            let mut ctx = Context {
                catalog: &self.catalog,
                settings: &self.settings,
                now: self.clock.now(),
                rng: &mut self.rng,
            };
            reducer::reduce(&self.state, &event, &mut ctx)
        };
        let feedback = transition.feedback.clone();
        self.apply(transition);
        feedback
    }

    pub fn start_simulation(&mut self) {
        self.dispatch(Event::StartSimulation);
    }

    pub fn submit_answer(&mut self, answer: Answer) -> Option<StepFeedback> {
        self.dispatch(Event::SubmitAnswer(answer))
    }

    pub fn continue_to_next(&mut self) {
        self.dispatch(Event::Continue);
    }

    fn apply(&mut self, transition: Transition) {
        let Transition { state, effects, .. } = transition;
        if state.screen() != self.state.screen() {
            debug!(
                from = self.state.screen().as_str(),
                to = state.screen().as_str(),
                "screen changed"
            );
        }
        self.state = state;

        let now = self.clock.now();
        for effect in effects {
            match effect {
                Effect::Track(event) => self.analytics.track(&event),
                Effect::StartTimer => self.timer.reset(now),
                Effect::StopTimer => self.timer.stop(),
            }
        }
    }

    /// One-second heartbeat from the host loop.
    pub fn tick(&mut self) {
        self.timer.tick(self.clock.now());
    }

    /// Learner interaction seen by the host (key press, click).
    pub fn record_activity(&mut self) {
        let on_step = self.state.screen() == Screen::Step;
        self.timer.activity(self.clock.now(), on_step);
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::build(&self.catalog, &self.state, &self.timer)
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &History {
        self.state.history()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn timer(&self) -> &SimTimer {
        &self.timer
    }

    /// Mutable access to the clock, for advancing a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}
