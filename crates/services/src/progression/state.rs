use chrono::{DateTime, Utc};
use serde::Serialize;

use sim_core::model::{Catalog, OutcomeType};
use sim_core::randomizer::OptionPermutation;

use crate::evaluation::StepFeedback;
use crate::history::History;

/// Which screen the learner is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Start,
    Step,
    SimResult,
    Results,
    NotFound,
}

impl Screen {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Start => "start",
            Screen::Step => "step",
            Screen::SimResult => "sim_result",
            Screen::Results => "results",
            Screen::NotFound => "not_found",
        }
    }

    /// Terminal screens accept no further events.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Screen::Results | Screen::NotFound)
    }
}

/// Outcome carried from one step to the next within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bridge {
    pub outcome: OutcomeType,
    pub text: Option<String>,
}

/// Externally supplied starting point that bypasses the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeepLink {
    pub sim_index: usize,
    pub step_index: Option<usize>,
}

/// Everything the controller owns between events.
///
/// Only the reducer mutates this; everyone else reads it through getters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub(crate) sim_index: usize,
    pub(crate) step_index: usize,
    pub(crate) score: u32,
    pub(crate) streak: u32,
    pub(crate) screen: Screen,
    pub(crate) feedback: Option<StepFeedback>,
    pub(crate) has_attempted: bool,
    pub(crate) step_started_at: Option<DateTime<Utc>>,
    pub(crate) permutation: OptionPermutation,
    pub(crate) bridge: Option<Bridge>,
    pub(crate) history: History,
}

impl ProgressState {
    /// Start screen of the first simulation, or `NotFound` for an empty catalog.
    #[must_use]
    pub fn initial(catalog: &Catalog) -> Self {
        let screen = if catalog.is_empty() {
            Screen::NotFound
        } else {
            Screen::Start
        };
        Self {
            sim_index: 0,
            step_index: 0,
            score: 0,
            streak: 0,
            screen,
            feedback: None,
            has_attempted: false,
            step_started_at: None,
            permutation: OptionPermutation::default(),
            bridge: None,
            history: History::new(),
        }
    }

    #[must_use]
    pub fn sim_index(&self) -> usize {
        self.sim_index
    }

    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Cumulative across simulations.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Feedback of the last submit on the current step, while it is shown.
    #[must_use]
    pub fn feedback(&self) -> Option<&StepFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn is_feedback_visible(&self) -> bool {
        self.feedback.is_some()
    }

    #[must_use]
    pub fn has_attempted_current_step(&self) -> bool {
        self.has_attempted
    }

    #[must_use]
    pub fn step_started_at(&self) -> Option<DateTime<Utc>> {
        self.step_started_at
    }

    #[must_use]
    pub fn permutation(&self) -> &OptionPermutation {
        &self.permutation
    }

    #[must_use]
    pub fn bridge(&self) -> Option<&Bridge> {
        self.bridge.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
}
