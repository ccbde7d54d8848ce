use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use sim_core::{
    classifier::classify,
    model::{Answer, Attempt, OutcomeType, Step},
    randomizer::OptionPermutation,
    scoring::{self, ScoreResult},
    time::elapsed_secs,
};

pub const DEFAULT_FEEDBACK: &str = "Your decision has been recorded.";
pub const SPEED_BONUS_SUFFIX: &str = " \u{23f0} Speed Bonus!";

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// What the learner is told after a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFeedback {
    pub outcome: OutcomeType,
    pub points: u32,
    /// Hidden (`None`) for incorrect outcomes.
    pub percentile: Option<u8>,
    pub timed_bonus: bool,
    pub first_attempt: bool,
    pub message: String,
    pub outcome_text: Option<String>,
}

impl StepFeedback {
    #[must_use]
    pub fn from_attempt(step: &Step, attempt: &Attempt) -> Self {
        let mut message = step
            .immediate_feedback()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(DEFAULT_FEEDBACK)
            .to_string();
        if attempt.first_attempt && attempt.timed_bonus {
            message.push_str(SPEED_BONUS_SUFFIX);
        }

        Self {
            outcome: attempt.outcome,
            points: attempt.points,
            percentile: attempt.visible_percentile(),
            timed_bonus: attempt.timed_bonus,
            first_attempt: attempt.first_attempt,
            message,
            outcome_text: step.outcome_text(attempt.outcome).map(str::to_string),
        }
    }
}

//
// ─── EVALUATION ────────────────────────────────────────────────────────────────
//

/// Result of evaluating one submit: the durable attempt and its feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub attempt: Attempt,
    pub feedback: StepFeedback,
}

/// Inputs captured by the controller at submit time.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub step: &'a Step,
    pub permutation: &'a OptionPermutation,
    pub answer: &'a Answer,
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    pub first_attempt: bool,
    pub prior_streak: u32,
}

/// Classify and score a submission.
///
/// Pure apart from `rng`, which only feeds the over-budget percentile.
pub fn evaluate<R: Rng + ?Sized>(submission: Submission<'_>, rng: &mut R) -> Evaluation {
    let Submission {
        step,
        permutation,
        answer,
        started_at,
        submitted_at,
        first_attempt,
        prior_streak,
    } = submission;

    let payload = step.payload();
    let outcome = classify(payload, permutation, answer);
    let elapsed = elapsed_secs(started_at, submitted_at);
    let budget = scoring::time_budget_secs(step.question(), payload.option_labels());
    let ScoreResult {
        points,
        streak,
        percentile,
        timed_bonus,
    } = scoring::score(outcome, elapsed, first_attempt, prior_streak, budget, rng);

    debug!(
        step_id = %step.id(),
        outcome = outcome.as_str(),
        elapsed,
        budget,
        points,
        streak,
        first_attempt,
        "step evaluated"
    );

    let attempt = Attempt {
        answer: answer.clone(),
        elapsed_secs: elapsed,
        outcome,
        points,
        percentile,
        timed_bonus,
        first_attempt,
        streak,
    };
    let feedback = StepFeedback::from_attempt(step, &attempt);
    Evaluation { attempt, feedback }
}
