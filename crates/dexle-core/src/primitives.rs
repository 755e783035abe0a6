//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Dexle engine and its boundaries.
//!
//! These are compiled into the binary and immutable at runtime. Boundary
//! layers (HTTP API, CLI) validate inputs against them before anything
//! reaches the engine.

/// Default guess budget for a new session.
pub const DEFAULT_MAX_GUESSES: u32 = 6;

/// Upper bound on a caller-supplied guess budget.
///
/// All sessions must be computationally bounded; a budget beyond this
/// is rejected at the boundary.
pub const MAX_MAX_GUESSES: u32 = 100;

/// Maximum length for caller-supplied session identifiers.
///
/// Prevents memory exhaustion from malicious or malformed input.
pub const MAX_SESSION_ID_LENGTH: usize = 128;

/// Maximum length for guess text and Pokémon names.
///
/// The longest real name is well under this; anything longer is rejected
/// before catalog lookup.
pub const MAX_NAME_LENGTH: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_within_bounds() {
        assert!(DEFAULT_MAX_GUESSES >= 1);
        assert!(DEFAULT_MAX_GUESSES <= MAX_MAX_GUESSES);
    }
}
