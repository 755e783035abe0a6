//! # Feedback Engine
//!
//! Pure comparison of a guessed Pokémon against the daily target.
//!
//! `compute_feedback` is total and side-effect free: every call produces
//! exactly seven verdicts, one per compared attribute. No attribute is
//! ever skipped.
//!
//! ## Directionality Convention
//!
//! Ordinal hints name the TARGET's position relative to the guess:
//! `TargetIsLower` means the hidden answer's value is numerically below
//! the guessed value ("move your next guess down"). Guessing evolution
//! stage 3 against a target at stage 2 yields `TargetIsLower`.

use crate::types::Pokemon;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// =============================================================================
// VERDICTS
// =============================================================================

/// Verdict for a categorical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The guessed value equals the target value.
    Correct,
    /// The guessed value differs from the target value.
    Incorrect,
}

/// Verdict for an ordinal attribute: equal, or a directional hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalHint {
    /// The guessed value equals the target value.
    Correct,
    /// The target's value is below the guessed value.
    TargetIsLower,
    /// The target's value is above the guessed value.
    TargetIsHigher,
}

// =============================================================================
// FEEDBACK
// =============================================================================

/// Per-attribute comparison result between a guess and the target.
///
/// Derived on demand from a (guess, target) pair; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Primary type tag comparison.
    pub primary_type: Verdict,
    /// Secondary type tag comparison. Both absent counts as correct;
    /// absent against present is incorrect.
    pub secondary_type: Verdict,
    /// Evolution-chain position, with directional hint.
    pub evolution_stage: OrdinalHint,
    /// Final-stage flag comparison.
    pub fully_evolved: Verdict,
    /// Color tag comparison.
    pub color: Verdict,
    /// Habitat tag comparison. Same absence rule as the secondary type.
    pub habitat: Verdict,
    /// Generation number, with directional hint.
    pub generation: OrdinalHint,
}

impl Feedback {
    /// Whether every attribute matched the target.
    #[must_use]
    pub fn all_correct(&self) -> bool {
        self.primary_type == Verdict::Correct
            && self.secondary_type == Verdict::Correct
            && self.evolution_stage == OrdinalHint::Correct
            && self.fully_evolved == Verdict::Correct
            && self.color == Verdict::Correct
            && self.habitat == Verdict::Correct
            && self.generation == OrdinalHint::Correct
    }
}

// =============================================================================
// COMPUTATION
// =============================================================================

/// Compare two values for a categorical verdict.
fn categorical<T: PartialEq>(candidate: &T, target: &T) -> Verdict {
    if candidate == target {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// Compare two ordinals, hinting at the target's position.
fn ordinal(candidate: u32, target: u32) -> OrdinalHint {
    match target.cmp(&candidate) {
        Ordering::Equal => OrdinalHint::Correct,
        Ordering::Less => OrdinalHint::TargetIsLower,
        Ordering::Greater => OrdinalHint::TargetIsHigher,
    }
}

/// Compute per-attribute feedback for a candidate against the target.
///
/// Pure function: same inputs always yield the same `Feedback`.
#[must_use]
pub fn compute_feedback(candidate: &Pokemon, target: &Pokemon) -> Feedback {
    Feedback {
        primary_type: categorical(&candidate.primary_type, &target.primary_type),
        secondary_type: categorical(&candidate.secondary_type, &target.secondary_type),
        evolution_stage: ordinal(candidate.evolution_stage, target.evolution_stage),
        fully_evolved: categorical(&candidate.fully_evolved, &target.fully_evolved),
        color: categorical(&candidate.color, &target.color),
        habitat: categorical(&candidate.habitat, &target.habitat),
        generation: ordinal(candidate.generation, target.generation),
    }
}

// =============================================================================
// TESTS
// =============================================================================
