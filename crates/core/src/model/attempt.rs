use serde::{Deserialize, Serialize};

use crate::model::outcome::OutcomeType;

/// What the learner submitted, expressed in display indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// A single option at this display position.
    Choice(usize),
    /// Several options, in the order they were picked.
    Selection(Vec<usize>),
    /// A passage segment by its authored id.
    Segment(u64),
    /// The interaction was completed without an index-bearing answer.
    Completed,
}

impl Answer {
    /// Display indices carried by the answer, in submission order.
    #[must_use]
    pub fn display_indices(&self) -> Vec<usize> {
        match self {
            Answer::Choice(index) => vec![*index],
            Answer::Selection(indices) => indices.clone(),
            Answer::Segment(_) | Answer::Completed => Vec::new(),
        }
    }

    /// The first display index, used by single-pick rules.
    #[must_use]
    pub fn primary_index(&self) -> Option<usize> {
        match self {
            Answer::Choice(index) => Some(*index),
            Answer::Selection(indices) => indices.first().copied(),
            Answer::Segment(_) | Answer::Completed => None,
        }
    }
}

/// One evaluation of a step. Only the first attempt per step visit is durable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub answer: Answer,
    pub elapsed_secs: f64,
    pub outcome: OutcomeType,
    pub points: u32,
    pub percentile: u8,
    pub timed_bonus: bool,
    pub first_attempt: bool,
    /// Streak after this attempt; equals the prior streak for re-attempts.
    pub streak: u32,
}

impl Attempt {
    /// Percentile as shown to the learner; hidden for incorrect outcomes.
    #[must_use]
    pub fn visible_percentile(&self) -> Option<u8> {
        match self.outcome {
            OutcomeType::Incorrect => None,
            OutcomeType::Correct | OutcomeType::Partial => Some(self.percentile),
        }
    }
}
