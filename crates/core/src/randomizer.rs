//! Display-order shuffling of a step's options.
//!
//! Everything downstream of the randomizer works with canonical indices; the
//! permutation is the only place display positions exist.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use thiserror::Error;

use crate::model::InteractionPayload;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PermutationError {
    #[error("index {index} is out of range for {len} options")]
    OutOfRange { index: usize, len: usize },
    #[error("canonical index {0} appears more than once")]
    Duplicate(usize),
}

/// Bijection `display index -> canonical index` together with its inverse.
///
/// Lives for one step visit; a fresh one is drawn on every step entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionPermutation {
    display_to_canonical: Vec<usize>,
    canonical_to_display: Vec<usize>,
}

impl OptionPermutation {
    /// The mapping that leaves every index where it is.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        let order: Vec<usize> = (0..len).collect();
        Self {
            display_to_canonical: order.clone(),
            canonical_to_display: order,
        }
    }

    /// Uniform random permutation of `[0..len)` (Fisher-Yates via `SliceRandom`).
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.as_mut_slice().shuffle(rng);
        let canonical_to_display = invert(&order);
        Self {
            display_to_canonical: order,
            canonical_to_display,
        }
    }

    /// Builds a permutation from an explicit display order.
    ///
    /// # Errors
    ///
    /// Returns `PermutationError` when `order` is not a bijection on `[0..len)`.
    pub fn from_display_order(order: Vec<usize>) -> Result<Self, PermutationError> {
        let len = order.len();
        let mut seen = vec![false; len];
        for &index in &order {
            if index >= len {
                return Err(PermutationError::OutOfRange { index, len });
            }
            if seen[index] {
                return Err(PermutationError::Duplicate(index));
            }
            seen[index] = true;
        }
        let canonical_to_display = invert(&order);
        Ok(Self {
            display_to_canonical: order,
            canonical_to_display,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.display_to_canonical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_to_canonical.is_empty()
    }

    /// Canonical index shown at `display`, or `None` if unmapped.
    #[must_use]
    pub fn canonical_index(&self, display: usize) -> Option<usize> {
        self.display_to_canonical.get(display).copied()
    }

    /// Display position of the canonical option `canonical`.
    #[must_use]
    pub fn display_index(&self, canonical: usize) -> Option<usize> {
        self.canonical_to_display.get(canonical).copied()
    }

    #[must_use]
    pub fn display_order(&self) -> &[usize] {
        &self.display_to_canonical
    }

    /// Rearranges a canonical list into display order.
    ///
    /// Falls back to canonical order when the lengths disagree.
    #[must_use]
    pub fn arrange<T: Clone>(&self, canonical: &[T]) -> Vec<T> {
        if canonical.len() != self.len() {
            return canonical.to_vec();
        }
        self.display_to_canonical
            .iter()
            .map(|&index| canonical[index].clone())
            .collect()
    }
}

fn invert(order: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; order.len()];
    for (display, &canonical) in order.iter().enumerate() {
        inverse[canonical] = display;
    }
    inverse
}

/// Draws the permutation for a step visit.
///
/// Payloads without a canonical option list get the identity mapping.
pub fn permutation_for<R: Rng + ?Sized>(
    payload: &InteractionPayload,
    rng: &mut R,
) -> OptionPermutation {
    match payload.canonical_options() {
        Some(options) => OptionPermutation::shuffled(options.len(), rng),
        None => OptionPermutation::identity(payload.identity_len()),
    }
}
