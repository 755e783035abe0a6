//! # Storage Module
//!
//! The typed persistence boundary for the Dexle engine.
//!
//! The engine never touches a database handle directly: it is handed a
//! [`StorageBackend`] at construction (no module-level globals) and talks
//! to it through the [`GameStore`] trait. Storage assembles plain typed
//! records (`Pokemon`, `GameSession`, `Guess`) and the engine consumes
//! them as data.
//!
//! Two backends are provided:
//! - [`MemoryStore`]: BTreeMap-backed, volatile (tests, demos)
//! - [`RedbStore`]: disk-backed ACID storage via redb

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::types::{DailyTarget, DexleError, GameSession, Guess, Pokemon, PokemonId};
use chrono::NaiveDate;

// =============================================================================
// GAMESTORE TRAIT
// =============================================================================

/// Storage operations required by the game engine.
///
/// All fallible operations return `Result<T, DexleError>` so in-memory and
/// persistent backends are handled uniformly.
pub trait GameStore {
    /// Insert a Pokémon into the candidate catalog.
    /// Replaces any existing entry with the same id.
    fn insert_pokemon(&mut self, pokemon: Pokemon) -> Result<(), DexleError>;

    /// Look up a catalog entry by identifier.
    fn pokemon_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, DexleError>;

    /// Resolve a catalog entry by name. Matching is case-insensitive since
    /// guesses arrive as free text.
    fn pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>, DexleError>;

    /// Number of entries in the candidate catalog.
    fn pokemon_count(&self) -> Result<usize, DexleError>;

    /// Bind a date to a target Pokémon. Replaces any existing binding for
    /// that date, so at most one target exists per date.
    fn set_daily_target(&mut self, target: &DailyTarget) -> Result<(), DexleError>;

    /// Get the target bound to a date, if any.
    fn daily_target(&self, date: NaiveDate) -> Result<Option<PokemonId>, DexleError>;

    /// Insert a new session. Fails with `AlreadyExists` if the identifier
    /// is already in use (insert-if-absent).
    fn insert_session(&mut self, session: &GameSession) -> Result<(), DexleError>;

    /// Look up a session by identifier.
    fn session(&self, id: &str) -> Result<Option<GameSession>, DexleError>;

    /// Number of sessions ever created.
    fn session_count(&self) -> Result<usize, DexleError>;

    /// Admit a guess: persist the updated session and append the guess to
    /// the ledger as a single unit. On failure nothing changes.
    ///
    /// Fails with `AlreadyExists` if the (session, sequence) slot is
    /// already occupied; ledger entries are never overwritten.
    fn admit_guess(&mut self, session: &GameSession, guess: &Guess) -> Result<(), DexleError>;

    /// Read a session's full guess history, ordered by sequence number.
    /// Ordering is enforced by the read, not assumed from storage layout.
    fn guesses(&self, session_id: &str) -> Result<Vec<Guess>, DexleError>;
}

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a game engine.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned.

impl GameStore for StorageBackend {
    fn insert_pokemon(&mut self, pokemon: Pokemon) -> Result<(), DexleError> {
        match self {
            Self::InMemory(store) => store.insert_pokemon(pokemon),
            Self::Persistent(store) => store.insert_pokemon(pokemon),
        }
    }

    fn pokemon_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, DexleError> {
        match self {
            Self::InMemory(store) => store.pokemon_by_id(id),
            Self::Persistent(store) => store.pokemon_by_id(id),
        }
    }

    fn pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>, DexleError> {
        match self {
            Self::InMemory(store) => store.pokemon_by_name(name),
            Self::Persistent(store) => store.pokemon_by_name(name),
        }
    }

    fn pokemon_count(&self) -> Result<usize, DexleError> {
        match self {
            Self::InMemory(store) => store.pokemon_count(),
            Self::Persistent(store) => store.pokemon_count(),
        }
    }

    fn set_daily_target(&mut self, target: &DailyTarget) -> Result<(), DexleError> {
        match self {
            Self::InMemory(store) => store.set_daily_target(target),
            Self::Persistent(store) => store.set_daily_target(target),
        }
    }

    fn daily_target(&self, date: NaiveDate) -> Result<Option<PokemonId>, DexleError> {
        match self {
            Self::InMemory(store) => store.daily_target(date),
            Self::Persistent(store) => store.daily_target(date),
        }
    }

    fn insert_session(&mut self, session: &GameSession) -> Result<(), DexleError> {
        match self {
            Self::InMemory(store) => store.insert_session(session),
            Self::Persistent(store) => store.insert_session(session),
        }
    }

    fn session(&self, id: &str) -> Result<Option<GameSession>, DexleError> {
        match self {
            Self::InMemory(store) => store.session(id),
            Self::Persistent(store) => store.session(id),
        }
    }

    fn session_count(&self) -> Result<usize, DexleError> {
        match self {
            Self::InMemory(store) => store.session_count(),
            Self::Persistent(store) => store.session_count(),
        }
    }

    fn admit_guess(&mut self, session: &GameSession, guess: &Guess) -> Result<(), DexleError> {
        match self {
            Self::InMemory(store) => store.admit_guess(session, guess),
            Self::Persistent(store) => store.admit_guess(session, guess),
        }
    }

    fn guesses(&self, session_id: &str) -> Result<Vec<Guess>, DexleError> {
        match self {
            Self::InMemory(store) => store.guesses(session_id),
            Self::Persistent(store) => store.guesses(session_id),
        }
    }
}
