use serde::Serialize;
use thiserror::Error;

use crate::model::history::HistoryEntry;
use crate::model::outcome::OutcomeType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("too many history entries for a single simulation: {len}")]
    TooManyEntries { len: usize },

    #[error("total entries ({total}) does not match outcome counts ({sum})")]
    CountMismatch { total: u32, sum: u32 },
}

/// Aggregate of a simulation's history for the result screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    total: u32,
    correct: u32,
    partial: u32,
    incorrect: u32,
    points: u32,
}

impl SimulationSummary {
    /// # Errors
    ///
    /// Returns `SummaryError::CountMismatch` if the outcome counts do not add up.
    pub fn from_counts(
        total: u32,
        correct: u32,
        partial: u32,
        incorrect: u32,
        points: u32,
    ) -> Result<Self, SummaryError> {
        let sum = correct + partial + incorrect;
        if sum != total {
            return Err(SummaryError::CountMismatch { total, sum });
        }
        Ok(Self {
            total,
            correct,
            partial,
            incorrect,
            points,
        })
    }

    /// # Errors
    ///
    /// Returns `SummaryError::TooManyEntries` if the entry count cannot fit in `u32`.
    pub fn from_history(entries: &[HistoryEntry]) -> Result<Self, SummaryError> {
        let mut correct = 0_u32;
        let mut partial = 0_u32;
        let mut incorrect = 0_u32;
        let mut points = 0_u32;

        for entry in entries {
            match entry.outcome {
                OutcomeType::Correct => correct = correct.saturating_add(1),
                OutcomeType::Partial => partial = partial.saturating_add(1),
                OutcomeType::Incorrect => incorrect = incorrect.saturating_add(1),
            }
            points = points.saturating_add(entry.points);
        }

        let total = u32::try_from(entries.len())
            .map_err(|_| SummaryError::TooManyEntries { len: entries.len() })?;

        Self::from_counts(total, correct, partial, incorrect, points)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn partial(&self) -> u32 {
        self.partial
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn all_correct(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}
