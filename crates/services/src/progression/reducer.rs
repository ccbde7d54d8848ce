//! Pure state machine: `(state, event) -> (state', effects)`.
//!
//! Time and randomness come in through `Context` so a seeded replay of the
//! same events produces the same transitions.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use sim_core::model::{Answer, Catalog, EngineSettings, Simulation};
use sim_core::randomizer::{OptionPermutation, permutation_for};

use crate::analytics::AnalyticsEvent;
use crate::evaluation::{StepFeedback, Submission, evaluate};

use super::state::{Bridge, DeepLink, ProgressState, Screen};

pub const CATALOG_RESULTS_SCREEN: &str = "Catalog Results";
pub const NOT_FOUND_SCREEN: &str = "Not Found";

/// Learner input. Every event yields a next state, possibly unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartSimulation,
    SubmitAnswer(Answer),
    Continue,
}

/// Side effects for the engine to carry out after a reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Track(AnalyticsEvent),
    StartTimer,
    StopTimer,
}

/// Environment of a single reduction.
pub struct Context<'a, R: Rng + ?Sized> {
    pub catalog: &'a Catalog,
    pub settings: &'a EngineSettings,
    pub now: DateTime<Utc>,
    pub rng: &'a mut R,
}

/// Output of a reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ProgressState,
    pub effects: Vec<Effect>,
    /// Evaluation feedback when the event was a submit on a step.
    pub feedback: Option<StepFeedback>,
}

impl Transition {
    /// Analytics events among the effects, in emission order.
    #[must_use]
    pub fn tracked(&self) -> Vec<&AnalyticsEvent> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Track(event) => Some(event),
                Effect::StartTimer | Effect::StopTimer => None,
            })
            .collect()
    }
}

struct Reduction {
    state: ProgressState,
    effects: Vec<Effect>,
    feedback: Option<StepFeedback>,
}

impl Reduction {
    fn new(state: ProgressState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            feedback: None,
        }
    }

    fn track(&mut self, event: AnalyticsEvent) {
        self.effects.push(Effect::Track(event));
    }

    fn screen_view(&mut self, name: impl Into<String>) {
        self.track(AnalyticsEvent::screen_view(name));
    }

    fn finish(self) -> Transition {
        Transition {
            state: self.state,
            effects: self.effects,
            feedback: self.feedback,
        }
    }
}

//
// ─── ENTRY POINTS ──────────────────────────────────────────────────────────────
//

/// Initial state, honouring an optional deep link.
///
/// A link with a step index goes straight to that step; a link without one
/// lands on that simulation's start screen. Out-of-range links end on
/// `NotFound`.
pub fn bootstrap<R: Rng + ?Sized>(
    ctx: &mut Context<'_, R>,
    deep_link: Option<DeepLink>,
) -> Transition {
    let catalog = ctx.catalog;
    let mut r = Reduction::new(ProgressState::initial(catalog));

    let link = deep_link.unwrap_or_default();
    r.state.sim_index = link.sim_index;
    let Some(sim) = catalog.simulation(link.sim_index) else {
        not_found(&mut r);
        return r.finish();
    };

    match link.step_index {
        None => {
            r.state.screen = Screen::Start;
            r.screen_view(start_screen_name(link.sim_index));
        }
        Some(step_index) if step_index < sim.step_count() => {
            info!(sim_index = link.sim_index, step_index, "deep link into step");
            reset_for_simulation(&mut r.state);
            r.track(AnalyticsEvent::simulation_start(sim.title()));
            r.effects.push(Effect::StartTimer);
            enter_step(&mut r, ctx, step_index);
        }
        Some(step_index) => {
            warn!(sim_index = link.sim_index, step_index, "deep link step out of range");
            not_found(&mut r);
        }
    }
    r.finish()
}

/// Apply one event.
pub fn reduce<R: Rng + ?Sized>(
    state: &ProgressState,
    event: &Event,
    ctx: &mut Context<'_, R>,
) -> Transition {
    let mut r = Reduction::new(state.clone());
    match (state.screen, event) {
        (Screen::Start, Event::StartSimulation) => begin(&mut r, ctx),
        (Screen::Step, Event::SubmitAnswer(answer)) => submit(&mut r, answer, ctx),
        (Screen::Step, Event::Continue) if state.feedback.is_some() => advance(&mut r, ctx),
        (Screen::SimResult, Event::Continue) => next_simulation(&mut r, ctx.catalog),
        (screen, event) => {
            debug!(screen = screen.as_str(), ?event, "event ignored on this screen");
        }
    }
    r.finish()
}

//
// ─── TRANSITIONS ───────────────────────────────────────────────────────────────
//

fn begin<R: Rng + ?Sized>(r: &mut Reduction, ctx: &mut Context<'_, R>) {
    let catalog = ctx.catalog;
    let Some(sim) = catalog.simulation(r.state.sim_index) else {
        not_found(r);
        return;
    };

    info!(sim_index = r.state.sim_index, title = sim.title(), "simulation started");
    reset_for_simulation(&mut r.state);
    r.track(AnalyticsEvent::simulation_start(sim.title()));
    r.effects.push(Effect::StartTimer);
    enter_step(r, ctx, 0);
}

fn submit<R: Rng + ?Sized>(r: &mut Reduction, answer: &Answer, ctx: &mut Context<'_, R>) {
    let catalog = ctx.catalog;
    let Some(step) = catalog
        .simulation(r.state.sim_index)
        .and_then(|sim| sim.step(r.state.step_index))
    else {
        not_found(r);
        return;
    };

    let first_attempt = !r.state.has_attempted;
    let evaluation = evaluate(
        Submission {
            step,
            permutation: &r.state.permutation,
            answer,
            started_at: r.state.step_started_at,
            submitted_at: ctx.now,
            first_attempt,
            prior_streak: r.state.streak,
        },
        ctx.rng,
    );

    if first_attempt {
        let attempt = &evaluation.attempt;
        r.state.score = r.state.score.saturating_add(attempt.points);
        r.state.streak = attempt.streak;
        r.state.has_attempted = true;
        r.state
            .history
            .record(step, &r.state.permutation, attempt);
    }

    r.feedback = Some(evaluation.feedback.clone());
    r.state.feedback = Some(evaluation.feedback);

    if ctx.settings.auto_advance() {
        advance(r, ctx);
    }
}

fn advance<R: Rng + ?Sized>(r: &mut Reduction, ctx: &mut Context<'_, R>) {
    let catalog = ctx.catalog;
    let Some(sim) = catalog.simulation(r.state.sim_index) else {
        not_found(r);
        return;
    };

    let from = r.state.step_index;
    let next = from + 1;
    let shown = r.state.feedback.take();

    if next < sim.step_count() {
        r.state.bridge = if sim.same_scenario(from, next) {
            shown.map(|feedback| Bridge {
                outcome: feedback.outcome,
                text: feedback.outcome_text,
            })
        } else {
            debug!(from, next, "scenario changed, bridge cleared");
            None
        };
        enter_step(r, ctx, next);
    } else {
        finish_simulation(r, sim, catalog);
    }
}

fn enter_step<R: Rng + ?Sized>(r: &mut Reduction, ctx: &mut Context<'_, R>, index: usize) {
    let catalog = ctx.catalog;
    let sim_index = r.state.sim_index;
    let Some(sim) = catalog.simulation(sim_index) else {
        not_found(r);
        return;
    };
    let Some(step) = sim.step(index) else {
        finish_simulation(r, sim, catalog);
        return;
    };

    r.state.step_index = index;
    r.state.screen = Screen::Step;
    r.state.has_attempted = false;
    r.state.feedback = None;
    r.state.permutation = permutation_for(step.payload(), ctx.rng);
    r.state.step_started_at = Some(ctx.now);

    debug!(
        sim_index,
        step_index = index,
        step_id = %step.id(),
        payload_len = r.state.permutation.len(),
        "entered step"
    );
    r.screen_view(step_screen_name(sim_index, index));
}

fn finish_simulation(r: &mut Reduction, sim: &Simulation, catalog: &Catalog) {
    let sim_index = r.state.sim_index;
    r.state.feedback = None;
    r.state.bridge = None;
    r.state.step_started_at = None;
    r.effects.push(Effect::StopTimer);
    r.track(AnalyticsEvent::simulation_complete(sim.title(), r.state.score));

    if catalog.has_next(sim_index) {
        r.state.screen = Screen::SimResult;
        r.screen_view(result_screen_name(sim_index));
    } else {
        r.state.screen = Screen::Results;
        r.screen_view(CATALOG_RESULTS_SCREEN);
    }
    info!(
        sim_index,
        score = r.state.score,
        answered = r.state.history.len(),
        screen = r.state.screen.as_str(),
        "simulation finished"
    );
}

fn next_simulation(r: &mut Reduction, catalog: &Catalog) {
    let sim_index = r.state.sim_index;
    if catalog.has_next(sim_index) {
        r.state.sim_index = sim_index + 1;
        r.state.step_index = 0;
        r.state.screen = Screen::Start;
        reset_for_simulation(&mut r.state);
        r.screen_view(start_screen_name(sim_index + 1));
    } else {
        r.state.screen = Screen::Results;
        r.screen_view(CATALOG_RESULTS_SCREEN);
    }
}

fn not_found(r: &mut Reduction) {
    warn!(
        sim_index = r.state.sim_index,
        step_index = r.state.step_index,
        "no content at current position"
    );
    r.state.screen = Screen::NotFound;
    r.state.feedback = None;
    r.effects.push(Effect::StopTimer);
    r.screen_view(NOT_FOUND_SCREEN);
}

/// Per-simulation fields; the cumulative score survives.
fn reset_for_simulation(state: &mut ProgressState) {
    state.streak = 0;
    state.history.clear();
    state.has_attempted = false;
    state.feedback = None;
    state.bridge = None;
    state.step_started_at = None;
    state.permutation = OptionPermutation::default();
}

//
// ─── SCREEN NAMES ──────────────────────────────────────────────────────────────
//

fn start_screen_name(sim_index: usize) -> String {
    format!("Sim {} - Start", sim_index + 1)
}

fn step_screen_name(sim_index: usize, step_index: usize) -> String {
    format!("Sim {} - Step {}", sim_index + 1, step_index + 1)
}

fn result_screen_name(sim_index: usize) -> String {
    format!("Sim {} - Results", sim_index + 1)
}
