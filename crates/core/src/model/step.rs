use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::ids::{ScenarioId, StepId};
use crate::model::interaction::{InteractionPayload, InteractionType, Segment};
use crate::model::outcome::{OutcomeTexts, OutcomeType};

/// Explanatory content shown next to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theory {
    pub title: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Authored step fields before normalization.
///
/// Every type-specific field is optional; `into_step` decides which interaction
/// the step actually presents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDraft {
    pub id: StepId,
    pub scenario_id: ScenarioId,
    pub interaction_type: InteractionType,
    pub question: String,
    pub options: Option<Vec<String>>,
    pub correct_answer_index: Option<usize>,
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
    pub outcomes: Option<OutcomeTexts>,
    pub theory: Option<Theory>,
    pub explanation: Option<String>,
    pub immediate_feedback: Option<String>,
}

impl StepDraft {
    /// Starts a draft with only the required identity fields set.
    #[must_use]
    pub fn new(
        id: StepId,
        scenario_id: ScenarioId,
        interaction_type: InteractionType,
        question: impl Into<String>,
    ) -> Self {
        Self {
            id,
            scenario_id,
            interaction_type,
            question: question.into(),
            options: None,
            correct_answer_index: None,
            violated_principle_indices: None,
            available_principles: None,
            problematic_prompt: None,
            blank_options: None,
            prompt_template: None,
            segments: None,
            prompt_text: None,
            clickable_options: None,
            required_flags: None,
            required_replacements: None,
            max_selection: None,
            outcomes: None,
            theory: None,
            explanation: None,
            immediate_feedback: None,
        }
    }

    #[must_use]
    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_outcomes(mut self, outcomes: OutcomeTexts) -> Self {
        self.outcomes = Some(outcomes);
        self
    }

    /// Normalize the authored fields into a step. Never fails: missing fields
    /// degrade to a simpler interaction.
    #[must_use]
    pub fn into_step(self) -> Step {
        let payload = self.normalize();
        Step {
            id: self.id,
            scenario_id: self.scenario_id,
            interaction_type: self.interaction_type,
            question: self.question,
            payload,
            outcomes: self.outcomes,
            theory: self.theory,
            explanation: self.explanation,
            immediate_feedback: self.immediate_feedback,
        }
    }

    fn normalize(&self) -> InteractionPayload {
        let specialized = match self.interaction_type {
            InteractionType::FindError => non_empty(self.segments.as_ref())
                .map(|segments| InteractionPayload::FindError {
                    segments: segments.clone(),
                }),
            InteractionType::FillBlank => non_empty(self.blank_options.as_ref()).map(|options| {
                InteractionPayload::FillBlank {
                    template: self
                        .prompt_template
                        .clone()
                        .unwrap_or_else(|| self.question.clone()),
                    options: options.clone(),
                    correct_index: self.correct_answer_index,
                }
            }),
            InteractionType::ViolatedPrinciples => non_empty(self.available_principles.as_ref())
                .map(|principles| InteractionPayload::ViolatedPrinciples {
                    prompt: self.problematic_prompt.clone(),
                    principles: principles.clone(),
                    violated: self.violated_principle_indices.clone().unwrap_or_default(),
                }),
            InteractionType::ClickablePrompt => non_empty(self.clickable_options.as_ref())
                .map(|options| InteractionPayload::ClickablePrompt {
                    text: self.prompt_text.clone().unwrap_or_default(),
                    options: options.clone(),
                }),
            InteractionType::TapSequence => Some(InteractionPayload::TapSequence {
                prompt: self.prompt_text.clone(),
                options: self.options.clone().unwrap_or_default(),
                required_flags: self.required_flags.unwrap_or(0),
                required_replacements: self.required_replacements.unwrap_or(0),
            }),
            InteractionType::Selection
            | InteractionType::Mcq
            | InteractionType::Ordering
            | InteractionType::TradeOff
            | InteractionType::Custom => None,
        };
        if let Some(payload) = specialized {
            return payload;
        }

        if let Some(options) = non_empty(self.options.as_ref()) {
            return InteractionPayload::Choice {
                options: options.clone(),
                max_selection: self.max_selection,
            };
        }

        if self.interaction_type != InteractionType::Custom {
            warn!(
                step_id = %self.id,
                interaction = %self.interaction_type,
                "step is missing interaction fields, using completion control"
            );
        }
        InteractionPayload::Completion
    }
}

fn non_empty<T>(items: Option<&Vec<T>>) -> Option<&Vec<T>> {
    items.filter(|items| !items.is_empty())
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

/// One question/interaction unit of a simulation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    id: StepId,
    scenario_id: ScenarioId,
    interaction_type: InteractionType,
    question: String,
    payload: InteractionPayload,
    outcomes: Option<OutcomeTexts>,
    theory: Option<Theory>,
    explanation: Option<String>,
    immediate_feedback: Option<String>,
}

impl Step {
    #[must_use]
    pub fn id(&self) -> StepId {
        self.id
    }

    #[must_use]
    pub fn scenario_id(&self) -> &ScenarioId {
        &self.scenario_id
    }

    /// The authored tag. Evaluation dispatches on `payload` instead.
    #[must_use]
    pub fn interaction_type(&self) -> InteractionType {
        self.interaction_type
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn payload(&self) -> &InteractionPayload {
        &self.payload
    }

    #[must_use]
    pub fn outcomes(&self) -> Option<&OutcomeTexts> {
        self.outcomes.as_ref()
    }

    #[must_use]
    pub fn outcome_text(&self, outcome: OutcomeType) -> Option<&str> {
        self.outcomes.as_ref().and_then(|texts| texts.text_for(outcome))
    }

    #[must_use]
    pub fn theory(&self) -> Option<&Theory> {
        self.theory.as_ref()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn immediate_feedback(&self) -> Option<&str> {
        self.immediate_feedback.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: InteractionType) -> StepDraft {
        StepDraft::new(StepId::new(1), ScenarioId::new("S1"), kind, "Which prompt?")
    }

    #[test]
    fn mcq_with_options_is_choice() {
        let step = draft(InteractionType::Mcq)
            .with_options(["best", "ok", "bad"])
            .into_step();
        assert!(matches!(
            step.payload(),
            InteractionPayload::Choice { options, .. } if options.len() == 3
        ));
    }

    #[test]
    fn fill_blank_uses_blank_options_and_template() {
        let mut d = draft(InteractionType::FillBlank);
        d.blank_options = Some(vec!["inclusive language".into(), "jargon".into()]);
        d.prompt_template = Some("Write with [____].".into());
        d.correct_answer_index = Some(0);
        let step = d.into_step();
        assert_eq!(
            step.payload(),
            &InteractionPayload::FillBlank {
                template: "Write with [____].".into(),
                options: vec!["inclusive language".into(), "jargon".into()],
                correct_index: Some(0),
            }
        );
    }

    #[test]
    fn find_error_without_segments_falls_back_to_options() {
        let step = draft(InteractionType::FindError)
            .with_options(["a", "b"])
            .into_step();
        assert!(matches!(step.payload(), InteractionPayload::Choice { .. }));
    }

    #[test]
    fn missing_everything_falls_back_to_completion() {
        let step = draft(InteractionType::ViolatedPrinciples).into_step();
        assert_eq!(step.payload(), &InteractionPayload::Completion);

        let custom = draft(InteractionType::Custom).into_step();
        assert_eq!(custom.payload(), &InteractionPayload::Completion);
    }

    #[test]
    fn tap_sequence_always_presents_sequence() {
        let mut d = draft(InteractionType::TapSequence);
        d.required_flags = Some(2);
        let step = d.into_step();
        assert!(matches!(
            step.payload(),
            InteractionPayload::TapSequence { required_flags: 2, required_replacements: 0, .. }
        ));
    }

    #[test]
    fn outcome_text_lookup() {
        let step = draft(InteractionType::Mcq)
            .with_options(["a"])
            .with_outcomes(OutcomeTexts {
                correct: Some("Nice.".into()),
                partial: None,
                incorrect: None,
            })
            .into_step();
        assert_eq!(step.outcome_text(OutcomeType::Correct), Some("Nice."));
        assert_eq!(step.outcome_text(OutcomeType::Incorrect), None);
    }
}
