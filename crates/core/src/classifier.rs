//! Maps a submitted answer to `correct | partial | incorrect`.
//!
//! Every rule sees canonical indices only: display indices are translated
//! through the visit's `OptionPermutation` before any comparison.

use crate::model::{Answer, InteractionPayload, OutcomeType};
use crate::randomizer::OptionPermutation;

/// Classify `answer` against the step's normalized interaction.
///
/// Total: every input resolves to an outcome.
#[must_use]
pub fn classify(
    payload: &InteractionPayload,
    permutation: &OptionPermutation,
    answer: &Answer,
) -> OutcomeType {
    match payload {
        InteractionPayload::Choice { .. } | InteractionPayload::ClickablePrompt { .. } => {
            if matches!(answer, Answer::Completed) {
                return OutcomeType::Correct;
            }
            let canonical = answer
                .primary_index()
                .and_then(|display| permutation.canonical_index(display));
            OutcomeType::from_canonical_index(canonical)
        }
        InteractionPayload::FillBlank { correct_index, .. } => {
            if matches!(answer, Answer::Completed) {
                return OutcomeType::Correct;
            }
            let canonical = answer
                .primary_index()
                .and_then(|display| permutation.canonical_index(display));
            match (correct_index, canonical) {
                (Some(expected), Some(actual)) if *expected == actual => OutcomeType::Correct,
                _ => OutcomeType::from_canonical_index(canonical),
            }
        }
        InteractionPayload::ViolatedPrinciples { violated, .. } => {
            classify_principles(violated, permutation, answer)
        }
        InteractionPayload::FindError { segments } => {
            let selected = match answer {
                Answer::Segment(id) => segments.iter().find(|segment| segment.id == *id),
                Answer::Choice(position) => segments.get(*position),
                Answer::Selection(_) | Answer::Completed => None,
            };
            if selected.is_some_and(|segment| segment.is_error) {
                OutcomeType::Correct
            } else {
                OutcomeType::Incorrect
            }
        }
        InteractionPayload::TapSequence { .. } | InteractionPayload::Completion => {
            OutcomeType::Correct
        }
    }
}

fn classify_principles(
    violated: &[usize],
    permutation: &OptionPermutation,
    answer: &Answer,
) -> OutcomeType {
    let displayed = answer.display_indices();
    let mut picked = Vec::with_capacity(displayed.len());
    for display in displayed {
        match permutation.canonical_index(display) {
            Some(canonical) => picked.push(canonical),
            None => return OutcomeType::Incorrect,
        }
    }
    picked.sort_unstable();
    picked.dedup();

    let mut expected = violated.to_vec();
    expected.sort_unstable();
    expected.dedup();

    if picked == expected {
        OutcomeType::Correct
    } else {
        OutcomeType::Incorrect
    }
}

/// Canonical indices picked by `answer`, sorted; unmapped picks are dropped.
#[must_use]
pub fn canonical_selection(permutation: &OptionPermutation, answer: &Answer) -> Vec<usize> {
    let mut picked: Vec<usize> = answer
        .display_indices()
        .into_iter()
        .filter_map(|display| permutation.canonical_index(display))
        .collect();
    picked.sort_unstable();
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn choice(n: usize) -> InteractionPayload {
        InteractionPayload::Choice {
            options: (0..n).map(|i| format!("option {i}")).collect(),
            max_selection: None,
        }
    }

    fn principles(violated: Vec<usize>) -> InteractionPayload {
        InteractionPayload::ViolatedPrinciples {
            prompt: None,
            principles: (0..5).map(|i| format!("principle {i}")).collect(),
            violated,
        }
    }

    #[test]
    fn choice_depends_only_on_canonical_index() {
        let mut rng = StdRng::seed_from_u64(99);
        let payload = choice(4);
        for _ in 0..20 {
            let permutation = OptionPermutation::shuffled(4, &mut rng);
            for canonical in 0..4 {
                let display = permutation.display_index(canonical).unwrap();
                let outcome = classify(&payload, &permutation, &Answer::Choice(display));
                assert_eq!(outcome, OutcomeType::from_canonical_index(Some(canonical)));
            }
        }
    }

    #[test]
    fn choice_out_of_range_is_incorrect() {
        let permutation = OptionPermutation::identity(3);
        assert_eq!(
            classify(&choice(3), &permutation, &Answer::Choice(5)),
            OutcomeType::Incorrect
        );
    }

    #[test]
    fn choice_selection_uses_first_pick() {
        let permutation = OptionPermutation::from_display_order(vec![1, 0, 2]).unwrap();
        assert_eq!(
            classify(&choice(3), &permutation, &Answer::Selection(vec![0, 1])),
            OutcomeType::Partial
        );
    }

    #[test]
    fn violated_principles_compare_as_sets() {
        let permutation = OptionPermutation::from_display_order(vec![3, 0, 4, 1, 2]).unwrap();
        let payload = principles(vec![1, 3]);

        // display 0 -> 3, display 3 -> 1
        assert_eq!(
            classify(&payload, &permutation, &Answer::Selection(vec![0, 3])),
            OutcomeType::Correct
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Selection(vec![3, 0])),
            OutcomeType::Correct
        );
        // display 3 -> 1, display 4 -> 2
        assert_eq!(
            classify(&payload, &permutation, &Answer::Selection(vec![3, 4])),
            OutcomeType::Incorrect
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Selection(vec![0])),
            OutcomeType::Incorrect
        );
    }

    #[test]
    fn violated_principles_have_no_partial_tier() {
        let permutation = OptionPermutation::identity(5);
        let payload = principles(vec![1, 3]);
        assert_eq!(
            classify(&payload, &permutation, &Answer::Selection(vec![1, 3, 4])),
            OutcomeType::Incorrect
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Completed),
            OutcomeType::Incorrect
        );
    }

    #[test]
    fn empty_ground_truth_matches_empty_selection() {
        let permutation = OptionPermutation::identity(5);
        let payload = principles(Vec::new());
        assert_eq!(
            classify(&payload, &permutation, &Answer::Selection(Vec::new())),
            OutcomeType::Correct
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Selection(vec![2])),
            OutcomeType::Incorrect
        );
    }

    #[test]
    fn find_error_uses_segment_flag() {
        let payload = InteractionPayload::FindError {
            segments: vec![
                Segment { id: 10, text: "Write ".into(), is_error: false },
                Segment { id: 11, text: "describe our culture".into(), is_error: true },
            ],
        };
        let permutation = OptionPermutation::identity(2);
        assert_eq!(
            classify(&payload, &permutation, &Answer::Segment(11)),
            OutcomeType::Correct
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Segment(10)),
            OutcomeType::Incorrect
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Segment(99)),
            OutcomeType::Incorrect
        );
    }

    #[test]
    fn fill_blank_compares_with_ground_truth() {
        let payload = InteractionPayload::FillBlank {
            template: "Use [____].".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_index: Some(2),
        };
        let permutation = OptionPermutation::from_display_order(vec![2, 1, 0]).unwrap();
        assert_eq!(
            classify(&payload, &permutation, &Answer::Choice(0)),
            OutcomeType::Correct
        );
        // canonical 1 keeps the partial tier
        assert_eq!(
            classify(&payload, &permutation, &Answer::Choice(1)),
            OutcomeType::Partial
        );
    }

    #[test]
    fn fill_blank_second_best_pick_is_partial() {
        let payload = InteractionPayload::FillBlank {
            template: "Use [____].".into(),
            options: vec!["best".into(), "ok".into(), "bad".into()],
            correct_index: Some(0),
        };
        let permutation = OptionPermutation::identity(3);
        assert_eq!(
            classify(&payload, &permutation, &Answer::Choice(0)),
            OutcomeType::Correct
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Choice(1)),
            OutcomeType::Partial
        );
        assert_eq!(
            classify(&payload, &permutation, &Answer::Choice(2)),
            OutcomeType::Incorrect
        );
    }

    #[test]
    fn completion_types_always_resolve_correct() {
        let empty = OptionPermutation::default();
        assert_eq!(
            classify(&InteractionPayload::Completion, &empty, &Answer::Completed),
            OutcomeType::Correct
        );
        let tap = InteractionPayload::TapSequence {
            prompt: None,
            options: Vec::new(),
            required_flags: 2,
            required_replacements: 2,
        };
        assert_eq!(
            classify(&tap, &empty, &Answer::Selection(vec![0, 1])),
            OutcomeType::Correct
        );
    }

    #[test]
    fn canonical_selection_sorts_and_drops_unmapped() {
        let permutation = OptionPermutation::from_display_order(vec![2, 0, 1]).unwrap();
        assert_eq!(
            canonical_selection(&permutation, &Answer::Selection(vec![0, 1, 9])),
            vec![0, 2]
        );
    }
}
