use serde::Serialize;

use sim_core::model::Simulation;

/// Aggregated view of where the learner is inside a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    /// 1-based.
    pub step_number: usize,
    pub step_total: usize,
    /// 1-based position among steps sharing the current scenario id.
    pub scenario_position: usize,
    pub scenario_steps: usize,
    pub is_last_step: bool,
}

impl StepProgress {
    #[must_use]
    pub fn at(sim: &Simulation, step_index: usize) -> Option<Self> {
        let scenario = sim.scenario_position(step_index)?;
        Some(Self {
            step_number: step_index + 1,
            step_total: sim.step_count(),
            scenario_position: scenario.position,
            scenario_steps: scenario.count,
            is_last_step: step_index + 1 == sim.step_count(),
        })
    }

    /// Share of the scenario completed once this step is done.
    #[must_use]
    pub fn scenario_fraction(&self) -> f32 {
        if self.scenario_steps == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.scenario_position as f32 / self.scenario_steps as f32;
        fraction
    }

    /// Whole-percent form of `scenario_fraction`, for text progress bars.
    #[must_use]
    pub fn scenario_percent(&self) -> u8 {
        // In 0.0..=100.0 once rounded.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.scenario_fraction() * 100.0).round() as u8;
        percent
    }
}
