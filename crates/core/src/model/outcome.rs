use serde::{Deserialize, Serialize};

//
// ─── OUTCOME TYPE ─────────────────────────────────────────────────────────────
//

/// Three-tier classification of a step attempt.
///
/// Authoring convention for option lists: canonical index 0 is the best answer,
/// index 1 is partially right, anything further down is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    Correct,
    Partial,
    Incorrect,
}

impl OutcomeType {
    pub const ALL: [OutcomeType; 3] = [Self::Correct, Self::Partial, Self::Incorrect];

    /// Classifies a canonical option index. An unmapped index is incorrect.
    #[must_use]
    pub fn from_canonical_index(index: Option<usize>) -> Self {
        match index {
            Some(0) => Self::Correct,
            Some(1) => Self::Partial,
            _ => Self::Incorrect,
        }
    }

    /// Points this outcome is worth on a first attempt.
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            Self::Correct => 10,
            Self::Partial => 5,
            Self::Incorrect => 0,
        }
    }

    /// True for outcomes that can sustain a streak (correct or partial).
    #[must_use]
    pub fn earns_credit(self) -> bool {
        !matches!(self, Self::Incorrect)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Partial => "partial",
            Self::Incorrect => "incorrect",
        }
    }
}

//
// ─── OUTCOME TEXTS ────────────────────────────────────────────────────────────
//

/// Authored narrative shown for each outcome tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTexts {
    pub correct: Option<String>,
    pub partial: Option<String>,
    pub incorrect: Option<String>,
}

impl OutcomeTexts {
    #[must_use]
    pub fn text_for(&self, outcome: OutcomeType) -> Option<&str> {
        match outcome {
            OutcomeType::Correct => self.correct.as_deref(),
            OutcomeType::Partial => self.partial.as_deref(),
            OutcomeType::Incorrect => self.incorrect.as_deref(),
        }
    }
}
