use serde::{Deserialize, Serialize};
use std::fmt;

use crate::randomizer::OptionPermutation;

//
// ─── INTERACTION TYPE ─────────────────────────────────────────────────────────
//

/// Canonical tag naming how a step is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Selection,
    Mcq,
    Ordering,
    TradeOff,
    FindError,
    FillBlank,
    ViolatedPrinciples,
    ClickablePrompt,
    TapSequence,
    Custom,
}

impl InteractionType {
    /// Parses an authored tag, accepting legacy spellings.
    ///
    /// Unrecognised tags become `Custom`; content never fails to load because
    /// of an unknown interaction.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "selection" => Self::Selection,
            "mcq" | "multiple_choice" => Self::Mcq,
            "ordering" => Self::Ordering,
            "trade_off" | "trade_off_meters" | "tradeoff" => Self::TradeOff,
            "find_error" => Self::FindError,
            "fill_blank" => Self::FillBlank,
            "violated_principles" => Self::ViolatedPrinciples,
            "clickable_prompt" => Self::ClickablePrompt,
            "tap_sequence" => Self::TapSequence,
            _ => Self::Custom,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Mcq => "mcq",
            Self::Ordering => "ordering",
            Self::TradeOff => "trade_off",
            Self::FindError => "find_error",
            Self::FillBlank => "fill_blank",
            Self::ViolatedPrinciples => "violated_principles",
            Self::ClickablePrompt => "clickable_prompt",
            Self::TapSequence => "tap_sequence",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clickable span of a "find the error" passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub is_error: bool,
}

//
// ─── PAYLOAD ──────────────────────────────────────────────────────────────────
//

/// Normalized interaction data for a step, one variant per evaluation rule.
///
/// Built once from the authored fields when a `Step` is constructed. Steps whose
/// type needs fields that are missing degrade to `Choice` (if plain options
/// exist) or to `Completion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionPayload {
    /// Single pick from an option list ordered best-first.
    Choice {
        options: Vec<String>,
        max_selection: Option<u32>,
    },
    FillBlank {
        template: String,
        options: Vec<String>,
        correct_index: Option<usize>,
    },
    ViolatedPrinciples {
        prompt: Option<String>,
        principles: Vec<String>,
        violated: Vec<usize>,
    },
    FindError {
        segments: Vec<Segment>,
    },
    /// Spans of a prompt that can be clicked; never shuffled.
    ClickablePrompt {
        text: String,
        options: Vec<String>,
    },
    /// Multi-phase fill or flag-and-replace; finishing it is the answer.
    TapSequence {
        prompt: Option<String>,
        options: Vec<String>,
        required_flags: u32,
        required_replacements: u32,
    },
    /// Generic completion control used when nothing else applies.
    Completion,
}

impl InteractionPayload {
    /// Option list carrying canonical-order meaning, if this payload is shuffled.
    #[must_use]
    pub fn canonical_options(&self) -> Option<&[String]> {
        match self {
            Self::Choice { options, .. } | Self::FillBlank { options, .. } => Some(options),
            Self::ViolatedPrinciples { principles, .. } => Some(principles),
            Self::FindError { .. }
            | Self::ClickablePrompt { .. }
            | Self::TapSequence { .. }
            | Self::Completion => None,
        }
    }

    /// Every option label shown to the learner, in canonical order.
    #[must_use]
    pub fn option_labels(&self) -> &[String] {
        match self {
            Self::Choice { options, .. }
            | Self::FillBlank { options, .. }
            | Self::ClickablePrompt { options, .. }
            | Self::TapSequence { options, .. } => options,
            Self::ViolatedPrinciples { principles, .. } => principles,
            Self::FindError { .. } | Self::Completion => &[],
        }
    }

    /// Number of entries the identity mapping covers for unshuffled payloads.
    #[must_use]
    pub fn identity_len(&self) -> usize {
        match self {
            Self::FindError { segments } => segments.len(),
            _ => self.option_labels().len(),
        }
    }

    #[must_use]
    pub fn is_shuffled(&self) -> bool {
        self.canonical_options().is_some()
    }

    /// Returns a copy with shuffled option lists rearranged into display order.
    #[must_use]
    pub fn in_display_order(&self, permutation: &OptionPermutation) -> Self {
        match self {
            Self::Choice {
                options,
                max_selection,
            } => Self::Choice {
                options: permutation.arrange(options),
                max_selection: *max_selection,
            },
            Self::FillBlank {
                template,
                options,
                correct_index,
            } => Self::FillBlank {
                template: template.clone(),
                options: permutation.arrange(options),
                correct_index: *correct_index,
            },
            Self::ViolatedPrinciples {
                prompt,
                principles,
                violated,
            } => Self::ViolatedPrinciples {
                prompt: prompt.clone(),
                principles: permutation.arrange(principles),
                violated: violated.clone(),
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_accepts_legacy_spellings() {
        assert_eq!(
            InteractionType::parse_lenient("trade-off meters"),
            InteractionType::TradeOff
        );
        assert_eq!(InteractionType::parse_lenient("MCQ"), InteractionType::Mcq);
        assert_eq!(
            InteractionType::parse_lenient("Fill Blank"),
            InteractionType::FillBlank
        );
        assert_eq!(
            InteractionType::parse_lenient("custom_compose"),
            InteractionType::Custom
        );
    }

    #[test]
    fn only_option_lists_are_shuffled() {
        let choice = InteractionPayload::Choice {
            options: vec!["a".into(), "b".into()],
            max_selection: None,
        };
        assert!(choice.is_shuffled());

        let clickable = InteractionPayload::ClickablePrompt {
            text: "p".into(),
            options: vec!["a".into()],
        };
        assert!(!clickable.is_shuffled());
        assert_eq!(clickable.identity_len(), 1);
        assert!(!InteractionPayload::Completion.is_shuffled());
    }

    #[test]
    fn display_order_follows_permutation() {
        let payload = InteractionPayload::Choice {
            options: vec!["best".into(), "ok".into(), "bad".into()],
            max_selection: None,
        };
        let permutation = OptionPermutation::from_display_order(vec![2, 0, 1]).unwrap();
        let InteractionPayload::Choice { options, .. } = payload.in_display_order(&permutation)
        else {
            panic!("expected choice payload");
        };
        assert_eq!(options, vec!["bad", "best", "ok"]);
    }
}
