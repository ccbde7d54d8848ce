//! First-attempt history for the current simulation.

use serde::Serialize;
use tracing::debug;

use sim_core::classifier::canonical_selection;
use sim_core::model::{Answer, Attempt, HistoryEntry, InteractionPayload, OutcomeType, Step};
use sim_core::randomizer::OptionPermutation;

pub const NO_SELECTION: &str = "No selection";
pub const CUSTOM_INPUT: &str = "Custom Input";
const LABEL_SEPARATOR: &str = ", ";

/// Append-only list of `HistoryEntry`, one per attempted step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first attempt at `step`.
    ///
    /// Returns `false` without recording for re-attempts and for steps that
    /// already have an entry.
    pub fn record(
        &mut self,
        step: &Step,
        permutation: &OptionPermutation,
        attempt: &Attempt,
    ) -> bool {
        if !attempt.first_attempt || self.contains(step) {
            return false;
        }

        let entry = HistoryEntry {
            step_id: step.id(),
            scenario_id: step.scenario_id().clone(),
            outcome: attempt.outcome,
            question: step.question().to_string(),
            submitted_answer: submitted_answer_text(step.payload(), permutation, &attempt.answer),
            best_answer: best_answer_text(step.payload()),
            outcome_text: step.outcome_text(attempt.outcome).map(str::to_string),
            explanation: step.explanation().map(str::to_string),
            points: attempt.points,
            percentile: attempt.visible_percentile(),
        };
        debug!(step_id = %entry.step_id, outcome = entry.outcome.as_str(), "history recorded");
        self.entries.push(entry);
        true
    }

    fn contains(&self, step: &Step) -> bool {
        self.entries.iter().any(|entry| entry.step_id == step.id())
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries with the given outcome, in recording order.
    #[must_use]
    pub fn by_outcome(&self, outcome: OutcomeType) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == outcome)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//
// ─── ANSWER TEXT ───────────────────────────────────────────────────────────────
//

/// Human-readable form of what the learner submitted.
#[must_use]
pub fn submitted_answer_text(
    payload: &InteractionPayload,
    permutation: &OptionPermutation,
    answer: &Answer,
) -> String {
    match payload {
        InteractionPayload::Choice { options, .. }
        | InteractionPayload::FillBlank { options, .. } => {
            if matches!(answer, Answer::Completed) {
                return CUSTOM_INPUT.to_string();
            }
            answer
                .primary_index()
                .and_then(|display| permutation.canonical_index(display))
                .and_then(|canonical| options.get(canonical))
                .map_or_else(|| NO_SELECTION.to_string(), Clone::clone)
        }
        InteractionPayload::ClickablePrompt { options, .. } => answer
            .primary_index()
            .and_then(|index| options.get(index))
            .map_or_else(|| NO_SELECTION.to_string(), Clone::clone),
        InteractionPayload::ViolatedPrinciples { principles, .. } => {
            let labels: Vec<&str> = canonical_selection(permutation, answer)
                .into_iter()
                .filter_map(|canonical| principles.get(canonical).map(String::as_str))
                .collect();
            join_or_sentinel(&labels)
        }
        InteractionPayload::FindError { segments } => {
            let selected = match answer {
                Answer::Segment(id) => segments.iter().find(|segment| segment.id == *id),
                Answer::Choice(position) => segments.get(*position),
                Answer::Selection(_) | Answer::Completed => None,
            };
            selected.map_or_else(|| NO_SELECTION.to_string(), |segment| segment.text.clone())
        }
        InteractionPayload::TapSequence { .. } | InteractionPayload::Completion => {
            CUSTOM_INPUT.to_string()
        }
    }
}

/// The best answer in canonical terms, when the interaction has one.
#[must_use]
pub fn best_answer_text(payload: &InteractionPayload) -> Option<String> {
    match payload {
        InteractionPayload::Choice { options, .. }
        | InteractionPayload::ClickablePrompt { options, .. } => options.first().cloned(),
        InteractionPayload::FillBlank {
            options,
            correct_index,
            ..
        } => options.get(correct_index.unwrap_or(0)).cloned(),
        InteractionPayload::ViolatedPrinciples {
            principles,
            violated,
            ..
        } => {
            let mut indices = violated.clone();
            indices.sort_unstable();
            indices.dedup();
            let labels: Vec<&str> = indices
                .into_iter()
                .filter_map(|index| principles.get(index).map(String::as_str))
                .collect();
            (!labels.is_empty()).then(|| labels.join(LABEL_SEPARATOR))
        }
        InteractionPayload::FindError { segments } => {
            let labels: Vec<&str> = segments
                .iter()
                .filter(|segment| segment.is_error)
                .map(|segment| segment.text.as_str())
                .collect();
            (!labels.is_empty()).then(|| labels.join(LABEL_SEPARATOR))
        }
        InteractionPayload::TapSequence { .. } | InteractionPayload::Completion => None,
    }
}

fn join_or_sentinel(labels: &[&str]) -> String {
    if labels.is_empty() {
        NO_SELECTION.to_string()
    } else {
        labels.join(LABEL_SEPARATOR)
    }
}
