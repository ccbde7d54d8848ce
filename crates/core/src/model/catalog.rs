use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{ScenarioId, StepId};
use crate::model::step::Step;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("simulation title cannot be empty")]
    EmptyTitle,

    #[error("step {step_id} references unknown scenario {scenario_id}")]
    UnknownScenario {
        step_id: StepId,
        scenario_id: ScenarioId,
    },

    #[error("duplicate step id {0} in simulation")]
    DuplicateStep(StepId),

    #[error("duplicate scenario id {0} in simulation")]
    DuplicateScenario(ScenarioId),
}

//
// ─── SCENARIO ──────────────────────────────────────────────────────────────────
//

/// Narrative arc that groups a run of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: String,
    pub workplace_context: Option<String>,
    pub trigger: Option<String>,
}

/// Where a step sits among the steps sharing its scenario id (1-based position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScenarioPosition {
    pub position: usize,
    pub count: usize,
}

//
// ─── SIMULATION ────────────────────────────────────────────────────────────────
//

/// Descriptive metadata shown on the start and result screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub title: String,
    pub estimated_time: Option<String>,
    pub end_state: Option<String>,
    pub hook_to_next: Option<String>,
    pub why_it_matters: Option<String>,
    /// Recruiter-readable proof items unlocked on completion.
    pub deliverables: Vec<String>,
    pub badges: Vec<String>,
}

/// Top-level training unit: ordered scenarios and the steps that reference them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    metadata: SimulationMetadata,
    scenarios: Vec<Scenario>,
    steps: Vec<Step>,
}

impl Simulation {
    /// Assemble a simulation, checking referential integrity.
    ///
    /// Scenario references are only enforced when the simulation declares at
    /// least one scenario.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` for an empty title, duplicate ids, or a step that
    /// points at an undeclared scenario.
    pub fn new(
        metadata: SimulationMetadata,
        scenarios: Vec<Scenario>,
        steps: Vec<Step>,
    ) -> Result<Self, ContentError> {
        if metadata.title.trim().is_empty() {
            return Err(ContentError::EmptyTitle);
        }

        let mut scenario_ids = HashSet::with_capacity(scenarios.len());
        for scenario in &scenarios {
            if !scenario_ids.insert(&scenario.id) {
                return Err(ContentError::DuplicateScenario(scenario.id.clone()));
            }
        }

        let mut step_ids = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !step_ids.insert(step.id()) {
                return Err(ContentError::DuplicateStep(step.id()));
            }
            if !scenario_ids.is_empty() && !scenario_ids.contains(step.scenario_id()) {
                return Err(ContentError::UnknownScenario {
                    step_id: step.id(),
                    scenario_id: step.scenario_id().clone(),
                });
            }
        }

        Ok(Self {
            metadata,
            scenarios,
            steps,
        })
    }

    #[must_use]
    pub fn metadata(&self) -> &SimulationMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn scenario(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| &scenario.id == id)
    }

    /// Position of the step at `index` among the steps of its scenario.
    #[must_use]
    pub fn scenario_position(&self, index: usize) -> Option<ScenarioPosition> {
        let step = self.steps.get(index)?;
        let mut position = 0;
        let mut count = 0;
        for (i, other) in self.steps.iter().enumerate() {
            if other.scenario_id() == step.scenario_id() {
                count += 1;
                if i <= index {
                    position += 1;
                }
            }
        }
        Some(ScenarioPosition { position, count })
    }

    /// True when the steps at `a` and `b` belong to the same scenario.
    #[must_use]
    pub fn same_scenario(&self, a: usize, b: usize) -> bool {
        match (self.steps.get(a), self.steps.get(b)) {
            (Some(left), Some(right)) => left.scenario_id() == right.scenario_id(),
            _ => false,
        }
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered list of simulations, addressed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    simulations: Vec<Simulation>,
}

impl Catalog {
    #[must_use]
    pub fn new(simulations: Vec<Simulation>) -> Self {
        Self { simulations }
    }

    #[must_use]
    pub fn simulations(&self) -> &[Simulation] {
        &self.simulations
    }

    #[must_use]
    pub fn simulation(&self, index: usize) -> Option<&Simulation> {
        self.simulations.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    #[must_use]
    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.simulations.len()
    }
}
