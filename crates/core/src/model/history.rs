use serde::Serialize;

use crate::model::ids::{ScenarioId, StepId};
use crate::model::outcome::OutcomeType;

/// Durable record of a step's first attempt, used by the review screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub step_id: StepId,
    pub scenario_id: ScenarioId,
    pub outcome: OutcomeType,
    pub question: String,
    pub submitted_answer: String,
    pub best_answer: Option<String>,
    pub outcome_text: Option<String>,
    pub explanation: Option<String>,
    pub points: u32,
    /// Hidden (`None`) for incorrect outcomes.
    pub percentile: Option<u8>,
}
