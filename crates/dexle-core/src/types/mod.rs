//! # Core Type Definitions
//!
//! This module contains all core types for the Dexle game engine:
//! - Catalog types (`PokemonId`, `Pokemon`)
//! - Scheduling types (`DailyTarget`)
//! - Session types (`GameSession`, `Guess`)
//! - Error types (`DexleError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where used as `BTreeMap` keys
//! - Are plain data: views are assembled by the storage layer and handed
//!   to the engine as typed records, never as ambient untyped shapes

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// CATALOG IDENTIFIERS
// =============================================================================

/// Unique identifier for a Pokémon in the candidate catalog.
///
/// Matches the national dex numbering of the external data source,
/// but the engine treats it as an opaque key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PokemonId(pub u64);

// =============================================================================
// POKEMON
// =============================================================================

/// A catalog entry: the thing being guessed about.
///
/// Immutable once created. Owned by the catalog; the engine only reads it.
/// All seven comparable attributes feed the feedback computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Catalog identifier.
    pub id: PokemonId,
    /// Display name. Guess resolution against this name is case-insensitive.
    pub name: String,
    /// Primary type tag (always present).
    pub primary_type: String,
    /// Secondary type tag. Many Pokémon have none.
    pub secondary_type: Option<String>,
    /// 0-based position within the evolution chain.
    pub evolution_stage: u32,
    /// Whether this is the final stage of its evolution chain.
    pub fully_evolved: bool,
    /// Categorical color tag.
    pub color: String,
    /// Categorical habitat tag. Absent for Pokémon without habitat data.
    pub habitat: Option<String>,
    /// Generation the Pokémon was introduced in (1-based).
    pub generation: u32,
    /// Display-asset reference for the presentation layer.
    pub sprite_url: String,
}

// =============================================================================
// DAILY TARGET
// =============================================================================

/// Binds a calendar date to exactly one Pokémon.
///
/// At most one target exists per date (storage keys by date).
/// Created by an external scheduling process; read-only to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTarget {
    /// The calendar date this target answers for.
    pub date: NaiveDate,
    /// The hidden answer for that date.
    pub pokemon: PokemonId,
}

impl DailyTarget {
    /// Create a new daily target.
    #[must_use]
    pub const fn new(date: NaiveDate, pokemon: PokemonId) -> Self {
        Self { date, pokemon }
    }
}

// =============================================================================
// GAME SESSION
// =============================================================================

/// One player's bounded attempt at a daily target.
///
/// Lifecycle: `Active` → `Completed-Won` | `Completed-Lost`.
/// Terminal states accept no further guesses. Mutated only by the
/// guess-admission transition in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// Caller-supplied unique session identifier.
    pub id: String,
    /// The date of the daily target this session plays against.
    pub date: NaiveDate,
    /// Maximum number of guesses allowed (positive).
    pub max_guesses: u32,
    /// Guesses made so far. Invariant: `guesses_made <= max_guesses`.
    pub guesses_made: u32,
    /// Whether the session has reached a terminal state.
    pub completed: bool,
    /// Whether the session ended in a correct guess. Implies `completed`.
    pub won: bool,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session reached a terminal state. Set iff `completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Create a new active session with zero guesses.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        max_guesses: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            max_guesses,
            guesses_made: 0,
            completed: false,
            won: false,
            created_at,
            completed_at: None,
        }
    }

    /// Whether the session still accepts guesses.
    #[must_use]
    pub fn can_guess(&self) -> bool {
        !self.completed
    }

    /// Transition to a terminal state.
    ///
    /// Sets `completed_at` exactly once; calling on an already-terminal
    /// session is a no-op to preserve the original completion time.
    pub fn complete(&mut self, won: bool, at: DateTime<Utc>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.won = won;
        self.completed_at = Some(at);
    }
}

// =============================================================================
// GUESS
// =============================================================================

/// One admitted attempt within a session.
///
/// Immutable once written. The sequence of guesses for a session,
/// ordered by `sequence`, is the full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    /// The owning session.
    pub session_id: String,
    /// 1-based sequence number, dense and unique within the session.
    pub sequence: u32,
    /// The guessed Pokémon.
    pub pokemon: PokemonId,
    /// Whether this guess hit the daily target.
    pub correct: bool,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Dexle engine.
///
/// - No silent failures
/// - Use `Result<T, DexleError>` for fallible operations
/// - The engine should never panic; all errors must be recoverable
/// - All domain errors are terminal for the single request; the engine
///   never retries. The transport layer maps them to protocol responses.
#[derive(Debug, Error)]
pub enum DexleError {
    /// The requested session or daily target does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A session with the given identifier already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A guess was submitted to a session in a terminal state.
    #[error("session already completed: {0}")]
    AlreadyCompleted(String),

    /// The session has used its full guess budget.
    ///
    /// Defensive guard: admission completes the session at `max_guesses`,
    /// so under correct sequencing this is unreachable.
    #[error("guess limit exceeded for session: {0}")]
    GuessLimitExceeded(String),

    /// The guess text does not resolve to a catalog entry.
    #[error("unknown candidate: {0}")]
    UnknownCandidate(String),

    /// A request failed boundary validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
