//! Presentation-agnostic snapshot handed to the rendering layer.
//!
//! No pre-formatted strings beyond the timer display; the renderer decides
//! how to lay things out.

use serde::Serialize;
use tracing::warn;

use sim_core::model::{
    Catalog, HistoryEntry, InteractionPayload, InteractionType, OutcomeType, Scenario, Simulation,
    SimulationMetadata, SimulationSummary, StepId, SummaryError, Theory,
};

use super::progress::StepProgress;
use super::state::{Bridge, ProgressState, Screen};
use crate::evaluation::StepFeedback;
use crate::timer::SimTimer;

/// Streak length from which the streak badge shows.
pub const STREAK_BADGE_MIN: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub screen: Screen,
    /// 1-based.
    pub simulation_number: usize,
    pub simulation_total: usize,
    pub title: Option<String>,
    pub score: u32,
    pub streak: u32,
    pub show_streak_badge: bool,
    pub timer: String,
    pub timer_paused: bool,
    pub intro: Option<SimulationMetadata>,
    pub step: Option<StepView>,
    pub review: Option<SimulationReview>,
    pub results: Option<CatalogResults>,
}

/// Everything needed to render the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub step_id: StepId,
    pub interaction_type: InteractionType,
    pub progress: StepProgress,
    pub scenario: Option<Scenario>,
    pub question: String,
    pub theory: Option<Theory>,
    pub explanation: Option<String>,
    /// Options already rearranged into display order.
    pub payload: InteractionPayload,
    pub bridge: Option<Bridge>,
    pub feedback: Option<StepFeedback>,
}

/// End-of-simulation review, history grouped by outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReview {
    pub title: String,
    pub summary: SimulationSummary,
    pub correct: Vec<HistoryEntry>,
    pub partial: Vec<HistoryEntry>,
    pub incorrect: Vec<HistoryEntry>,
    pub end_state: Option<String>,
    pub hook_to_next: Option<String>,
    pub next_title: Option<String>,
    pub deliverables: Vec<String>,
}

impl SimulationReview {
    /// # Errors
    ///
    /// Returns `SummaryError` if the history cannot be summarized.
    pub fn build(
        sim: &Simulation,
        next: Option<&Simulation>,
        entries: &[HistoryEntry],
    ) -> Result<Self, SummaryError> {
        let summary = SimulationSummary::from_history(entries)?;
        let group = |outcome: OutcomeType| -> Vec<HistoryEntry> {
            entries
                .iter()
                .filter(|entry| entry.outcome == outcome)
                .cloned()
                .collect()
        };
        let metadata = sim.metadata();
        Ok(Self {
            title: sim.title().to_string(),
            summary,
            correct: group(OutcomeType::Correct),
            partial: group(OutcomeType::Partial),
            incorrect: group(OutcomeType::Incorrect),
            end_state: metadata.end_state.clone(),
            hook_to_next: metadata.hook_to_next.clone(),
            next_title: next.map(|sim| sim.title().to_string()),
            deliverables: metadata.deliverables.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedSimulation {
    pub title: String,
    pub deliverables: Vec<String>,
    pub badges: Vec<String>,
}

/// Terminal catalog summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogResults {
    pub total_score: u32,
    pub simulations: Vec<CompletedSimulation>,
    /// Review of the simulation that was just finished, if any.
    pub last_review: Option<SimulationReview>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn build(catalog: &Catalog, state: &ProgressState, timer: &SimTimer) -> Self {
        let sim_index = state.sim_index();
        let sim = catalog.simulation(sim_index);
        let screen = state.screen();

        let step = match (screen, sim) {
            (Screen::Step, Some(sim)) => step_view(sim, state),
            _ => None,
        };
        let review = match (screen, sim) {
            (Screen::SimResult, Some(sim)) => review(sim, catalog.simulation(sim_index + 1), state),
            _ => None,
        };
        let results = (screen == Screen::Results).then(|| CatalogResults {
            total_score: state.score(),
            simulations: catalog
                .simulations()
                .iter()
                .map(|sim| CompletedSimulation {
                    title: sim.title().to_string(),
                    deliverables: sim.metadata().deliverables.clone(),
                    badges: sim.metadata().badges.clone(),
                })
                .collect(),
            last_review: sim.and_then(|sim| self::review(sim, None, state)),
        });
        let intro = match (screen, sim) {
            (Screen::Start, Some(sim)) => Some(sim.metadata().clone()),
            _ => None,
        };

        Self {
            screen,
            simulation_number: sim_index + 1,
            simulation_total: catalog.len(),
            title: sim.map(|sim| sim.title().to_string()),
            score: state.score(),
            streak: state.streak(),
            show_streak_badge: state.streak() >= STREAK_BADGE_MIN,
            timer: timer.display(),
            timer_paused: timer.is_paused(),
            intro,
            step,
            review,
            results,
        }
    }
}

fn step_view(sim: &Simulation, state: &ProgressState) -> Option<StepView> {
    let index = state.step_index();
    let step = sim.step(index)?;
    let progress = StepProgress::at(sim, index)?;
    Some(StepView {
        step_id: step.id(),
        interaction_type: step.interaction_type(),
        progress,
        scenario: sim.scenario(step.scenario_id()).cloned(),
        question: step.question().to_string(),
        theory: step.theory().cloned(),
        explanation: step.explanation().map(str::to_string),
        payload: step.payload().in_display_order(state.permutation()),
        bridge: state.bridge().cloned(),
        feedback: state.feedback().cloned(),
    })
}

fn review(
    sim: &Simulation,
    next: Option<&Simulation>,
    state: &ProgressState,
) -> Option<SimulationReview> {
    SimulationReview::build(sim, next, state.history().entries())
        .map_err(|e| warn!(error = %e, "history could not be summarized"))
        .ok()
}
