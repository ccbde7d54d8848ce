//! Authoring-format records and their conversion into domain types.

use serde::Deserialize;
use serde_json::Value;

use sim_core::model::{
    Catalog, InteractionType, OutcomeTexts, Scenario, ScenarioId, Segment, Simulation,
    SimulationMetadata, Step, StepDraft, StepId, Theory,
};

use crate::repository::StorageError;

/// Ids appear as numbers or strings depending on the content revision.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_scenario_id(self) -> ScenarioId {
        match self {
            RawId::Number(n) => ScenarioId::new(n.to_string()),
            RawId::Text(s) => ScenarioId::new(s.trim()),
        }
    }

    fn into_step_id(self) -> Result<StepId, StorageError> {
        match self {
            RawId::Number(n) => Ok(StepId::new(n)),
            RawId::Text(s) => s
                .parse::<StepId>()
                .map_err(|e| StorageError::Serialization(format!("{e}: {s:?}"))),
        }
    }
}

/// Option entries are usually plain strings; older content has objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionRecord {
    Text(String),
    Labeled { label: String },
    Other(Value),
}

impl OptionRecord {
    fn into_label(self) -> String {
        match self {
            OptionRecord::Text(text) | OptionRecord::Labeled { label: text } => text,
            OptionRecord::Other(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub simulations: Vec<SimulationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationRecord {
    pub simulation_metadata: MetadataRecord,
    #[serde(default)]
    pub scenario_breakdown: Vec<ScenarioRecord>,
    #[serde(default)]
    pub step_level_design: Vec<StepRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    pub simulation_title: String,
    pub estimated_time: Option<String>,
    pub end_state: Option<String>,
    pub hook_to_next_simulation: Option<String>,
    pub why_this_matters_for_getting_hired: Option<String>,
    #[serde(default)]
    pub unlockable_deliverables: Vec<String>,
    pub deliverables_unlockable: Option<DeliverablesRecord>,
}

/// `deliverables_unlockable` is either a plain list or grouped badges and proof.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeliverablesRecord {
    List(Vec<String>),
    Grouped {
        #[serde(default)]
        badges: Vec<String>,
        #[serde(default)]
        recruiter_readable_proof: Vec<String>,
    },
}

impl MetadataRecord {
    /// Proof items and badges, with the flat list first.
    fn unlockables(&mut self) -> (Vec<String>, Vec<String>) {
        let mut deliverables = std::mem::take(&mut self.unlockable_deliverables);
        let mut badges = Vec::new();
        match self.deliverables_unlockable.take() {
            Some(DeliverablesRecord::List(items)) => deliverables.extend(items),
            Some(DeliverablesRecord::Grouped {
                badges: grouped,
                recruiter_readable_proof,
            }) => {
                deliverables.extend(recruiter_readable_proof);
                badges = grouped;
            }
            None => {}
        }
        (deliverables, badges)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRecord {
    pub scenario_id: RawId,
    #[serde(default)]
    pub scenario_title: String,
    pub workplace_context: Option<String>,
    pub crisis_or_decision_trigger: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutcomesRecord {
    pub correct: Option<String>,
    pub partially_correct: Option<String>,
    pub incorrect: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TheoryRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepRecord {
    pub step_id: RawId,
    pub scenario_id: RawId,
    #[serde(default)]
    pub interaction_type: Option<String>,
    #[serde(default)]
    pub instruction_question: Option<String>,
    pub options_inputs: Option<Vec<OptionRecord>>,
    pub correct_answer_index: Option<usize>,
    pub correct_option_index: Option<usize>,
    pub violated_principle_indices: Option<Vec<usize>>,
    pub available_principles: Option<Vec<String>>,
    pub problematic_prompt: Option<String>,
    pub blank_options: Option<Vec<String>>,
    pub prompt_template: Option<String>,
    pub segments: Option<Vec<Segment>>,
    pub prompt_text: Option<String>,
    pub clickable_options: Option<Vec<String>>,
    pub required_flags: Option<u32>,
    pub required_replacements: Option<u32>,
    pub max_selection: Option<u32>,
    pub outcomes: Option<OutcomesRecord>,
    pub theory_content: Option<TheoryRecord>,
    pub explain_this_question: Option<String>,
    pub immediate_feedback: Option<String>,
}

impl CatalogRecord {
    /// Convert every simulation, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for unparsable ids or content integrity failures.
    pub fn into_catalog(self) -> Result<Catalog, StorageError> {
        let simulations = self
            .simulations
            .into_iter()
            .map(SimulationRecord::into_simulation)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Catalog::new(simulations))
    }
}

impl SimulationRecord {
    /// # Errors
    ///
    /// Returns `StorageError` for unparsable ids or content integrity failures.
    pub fn into_simulation(self) -> Result<Simulation, StorageError> {
        let mut meta = self.simulation_metadata;
        let (deliverables, badges) = meta.unlockables();
        let metadata = SimulationMetadata {
            title: meta.simulation_title.trim().to_string(),
            estimated_time: meta.estimated_time,
            end_state: meta.end_state,
            hook_to_next: meta.hook_to_next_simulation,
            why_it_matters: meta.why_this_matters_for_getting_hired,
            deliverables,
            badges,
        };

        let scenarios = self
            .scenario_breakdown
            .into_iter()
            .map(|record| Scenario {
                id: record.scenario_id.into_scenario_id(),
                title: record.scenario_title,
                workplace_context: record.workplace_context,
                trigger: record.crisis_or_decision_trigger,
            })
            .collect();

        let steps = self
            .step_level_design
            .into_iter()
            .map(StepRecord::into_step)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Simulation::new(metadata, scenarios, steps)?)
    }
}

impl StepRecord {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the step id is not numeric.
    pub fn into_step(self) -> Result<Step, StorageError> {
        let id = self.step_id.into_step_id()?;
        let interaction_type = self
            .interaction_type
            .as_deref()
            .map_or(InteractionType::Mcq, InteractionType::parse_lenient);

        let mut draft = StepDraft::new(
            id,
            self.scenario_id.into_scenario_id(),
            interaction_type,
            self.instruction_question.unwrap_or_default(),
        );
        draft.options = self
            .options_inputs
            .map(|options| options.into_iter().map(OptionRecord::into_label).collect());
        draft.correct_answer_index = self.correct_answer_index.or(self.correct_option_index);
        draft.violated_principle_indices = self.violated_principle_indices;
        draft.available_principles = self.available_principles;
        draft.problematic_prompt = self.problematic_prompt;
        draft.blank_options = self.blank_options;
        draft.prompt_template = self.prompt_template;
        draft.segments = self.segments;
        draft.prompt_text = self.prompt_text;
        draft.clickable_options = self.clickable_options;
        draft.required_flags = self.required_flags;
        draft.required_replacements = self.required_replacements;
        draft.max_selection = self.max_selection;
        draft.outcomes = self.outcomes.map(|o| OutcomeTexts {
            correct: o.correct,
            partial: o.partially_correct,
            incorrect: o.incorrect,
        });
        draft.theory = self.theory_content.map(|t| Theory {
            title: t.title,
            key_points: t.key_points,
        });
        draft.explanation = self.explain_this_question;
        draft.immediate_feedback = self.immediate_feedback;

        Ok(draft.into_step())
    }
}
