//! Points, streak and percentile math for a single attempt.

use rand::Rng;

use crate::model::OutcomeType;

/// Shortest time budget a step can get.
pub const MIN_BUDGET_SECS: u32 = 15;
/// Longest time budget a step can get.
pub const MAX_BUDGET_SECS: u32 = 30;
/// Characters of question + options granted per second of budget.
pub const CHARS_PER_SECOND: usize = 15;

const PERCENTILE_FLOOR: u8 = 60;
const PERCENTILE_CEILING: u8 = 98;
const PERCENTILE_SPAN: f64 = 38.0;
const SLOW_PERCENTILE: std::ops::Range<u8> = 40..60;

/// Result of scoring one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub points: u32,
    pub streak: u32,
    pub percentile: u8,
    pub timed_bonus: bool,
}

/// Seconds a learner gets for a step before the speed bonus lapses.
///
/// `clamp(ceil(chars / 15), 15, 30)` over the question and every option label.
#[must_use]
pub fn time_budget_secs(question: &str, options: &[String]) -> u32 {
    let chars = question.chars().count()
        + options
            .iter()
            .map(|option| option.chars().count())
            .sum::<usize>();
    let secs = chars.div_ceil(CHARS_PER_SECOND);
    u32::try_from(secs)
        .unwrap_or(MAX_BUDGET_SECS)
        .clamp(MIN_BUDGET_SECS, MAX_BUDGET_SECS)
}

/// Correct or partial, answered within the budget.
#[must_use]
pub fn is_timed_bonus(outcome: OutcomeType, elapsed_secs: f64, budget_secs: u32) -> bool {
    outcome.earns_credit() && elapsed_secs <= f64::from(budget_secs)
}

/// Cosmetic "faster than X% of candidates" figure.
///
/// Within budget: `clamp(floor(60 + (budget - elapsed) / budget * 38), 60, 98)`.
/// Over budget: uniform in `[40, 60)`.
pub fn percentile<R: Rng + ?Sized>(elapsed_secs: f64, budget_secs: u32, rng: &mut R) -> u8 {
    let budget = f64::from(budget_secs);
    if budget > 0.0 && elapsed_secs <= budget {
        let raw = (f64::from(PERCENTILE_FLOOR) + (budget - elapsed_secs) / budget * PERCENTILE_SPAN)
            .floor()
            .clamp(f64::from(PERCENTILE_FLOOR), f64::from(PERCENTILE_CEILING));
        // Clamped into 60..=98 above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = raw as u8;
        value
    } else {
        rng.random_range(SLOW_PERCENTILE)
    }
}

/// Score an attempt.
///
/// Points and the streak only move on a first attempt: a timed bonus extends
/// the streak, anything else (slow answers included) resets it. Re-attempts
/// still get a percentile for feedback but keep `prior_streak` and earn 0.
pub fn score<R: Rng + ?Sized>(
    outcome: OutcomeType,
    elapsed_secs: f64,
    is_first_attempt: bool,
    prior_streak: u32,
    budget_secs: u32,
    rng: &mut R,
) -> ScoreResult {
    let timed_bonus = is_timed_bonus(outcome, elapsed_secs, budget_secs);
    let percentile = percentile(elapsed_secs, budget_secs, rng);

    if !is_first_attempt {
        return ScoreResult {
            points: 0,
            streak: prior_streak,
            percentile,
            timed_bonus,
        };
    }

    let streak = if timed_bonus {
        prior_streak.saturating_add(1)
    } else {
        0
    };

    ScoreResult {
        points: outcome.points(),
        streak,
        percentile,
        timed_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    #[test]
    fn budget_is_clamped_between_fifteen_and_thirty() {
        assert_eq!(time_budget_secs("short", &[]), 15);

        // 300 chars -> 20s
        let question = "q".repeat(240);
        let options = vec!["o".repeat(30), "o".repeat(30)];
        assert_eq!(time_budget_secs(&question, &options), 20);

        // 301 chars rounds up to 21s
        let question = "q".repeat(241);
        assert_eq!(time_budget_secs(&question, &options), 21);

        assert_eq!(time_budget_secs(&"q".repeat(2_000), &[]), 30);
    }

    #[test]
    fn percentile_within_budget_scales_with_speed() {
        let mut rng = rng();
        assert_eq!(percentile(0.0, 20, &mut rng), 98);
        assert_eq!(percentile(10.0, 20, &mut rng), 79);
        assert_eq!(percentile(20.0, 20, &mut rng), 60);
    }

    #[test]
    fn percentile_bounds_hold() {
        let mut rng = rng();
        for tenths in 0..600 {
            let elapsed = f64::from(tenths) / 10.0;
            let value = percentile(elapsed, 25, &mut rng);
            if elapsed <= 25.0 {
                assert!((60..=98).contains(&value), "{elapsed} -> {value}");
            } else {
                assert!((40..60).contains(&value), "{elapsed} -> {value}");
            }
        }
    }

    #[test]
    fn first_attempt_points_and_streak() {
        let mut rng = rng();
        let correct = score(OutcomeType::Correct, 5.0, true, 2, 20, &mut rng);
        assert_eq!(correct.points, 10);
        assert_eq!(correct.streak, 3);
        assert!(correct.timed_bonus);

        let partial = score(OutcomeType::Partial, 5.0, true, 0, 20, &mut rng);
        assert_eq!(partial.points, 5);
        assert_eq!(partial.streak, 1);

        let incorrect = score(OutcomeType::Incorrect, 1.0, true, 4, 20, &mut rng);
        assert_eq!(incorrect.points, 0);
        assert_eq!(incorrect.streak, 0);
        assert!(!incorrect.timed_bonus);
    }

    #[test]
    fn slow_correct_answer_resets_streak_but_scores() {
        let mut rng = rng();
        let result = score(OutcomeType::Correct, 45.0, true, 3, 20, &mut rng);
        assert_eq!(result.points, 10);
        assert_eq!(result.streak, 0);
        assert!(!result.timed_bonus);
        assert!((40..60).contains(&result.percentile));
    }

    #[test]
    fn reattempt_awards_nothing_and_keeps_streak() {
        let mut rng = rng();
        let result = score(OutcomeType::Correct, 2.0, false, 4, 20, &mut rng);
        assert_eq!(result.points, 0);
        assert_eq!(result.streak, 4);
        assert!(result.timed_bonus);

        let result = score(OutcomeType::Incorrect, 2.0, false, 4, 20, &mut rng);
        assert_eq!(result.streak, 4);
    }

    #[test]
    fn streak_tracks_trailing_bonus_run() {
        let mut rng = rng();
        let attempts = [
            (OutcomeType::Correct, 3.0),
            (OutcomeType::Partial, 4.0),
            (OutcomeType::Correct, 40.0),
            (OutcomeType::Correct, 2.0),
            (OutcomeType::Correct, 2.0),
        ];
        let mut streak = 0;
        let mut trailing = 0;
        for (outcome, elapsed) in attempts {
            streak = score(outcome, elapsed, true, streak, 20, &mut rng).streak;
            trailing = if is_timed_bonus(outcome, elapsed, 20) {
                trailing + 1
            } else {
                0
            };
            assert_eq!(streak, trailing);
        }
        assert_eq!(streak, 2);
    }
}
