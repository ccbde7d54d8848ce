mod attempt;
mod catalog;
mod history;
mod ids;
mod interaction;
mod outcome;
mod settings;
mod step;
mod summary;

pub use attempt::{Answer, Attempt};
pub use catalog::{
    Catalog, ContentError, Scenario, ScenarioPosition, Simulation, SimulationMetadata,
};
pub use history::HistoryEntry;
pub use ids::{ParseIdError, ScenarioId, StepId};
pub use interaction::{InteractionPayload, InteractionType, Segment};
pub use outcome::{OutcomeTexts, OutcomeType};
pub use settings::{EngineSettings, SettingsError};
pub use step::{Step, StepDraft, Theory};
pub use summary::{SimulationSummary, SummaryError};
