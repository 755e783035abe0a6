//! # In-Memory Store
//!
//! BTreeMap-backed implementation of [`GameStore`].
//!
//! Volatile: nothing survives the process. Used for tests, demos, and the
//! `memory` CLI backend. Uses `BTreeMap` exclusively for deterministic
//! iteration order.

use crate::store::GameStore;
use crate::types::{DailyTarget, DexleError, GameSession, Guess, Pokemon, PokemonId};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// In-memory game store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Candidate catalog: PokemonId -> Pokemon.
    pokemon: BTreeMap<PokemonId, Pokemon>,
    /// Case-insensitive name index: lowercased name -> PokemonId.
    name_index: BTreeMap<String, PokemonId>,
    /// Daily targets: date -> PokemonId. The map key gives at most one
    /// target per date.
    targets: BTreeMap<NaiveDate, PokemonId>,
    /// Sessions: session id -> GameSession.
    sessions: BTreeMap<String, GameSession>,
    /// Guess ledger: (session id, sequence) -> Guess. Append-only.
    guesses: BTreeMap<(String, u32), Guess>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn insert_pokemon(&mut self, pokemon: Pokemon) -> Result<(), DexleError> {
        self.name_index
            .insert(pokemon.name.to_lowercase(), pokemon.id);
        self.pokemon.insert(pokemon.id, pokemon);
        Ok(())
    }

    fn pokemon_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, DexleError> {
        Ok(self.pokemon.get(&id).cloned())
    }

    fn pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>, DexleError> {
        let Some(id) = self.name_index.get(&name.to_lowercase()) else {
            return Ok(None);
        };
        Ok(self.pokemon.get(id).cloned())
    }

    fn pokemon_count(&self) -> Result<usize, DexleError> {
        Ok(self.pokemon.len())
    }

    fn set_daily_target(&mut self, target: &DailyTarget) -> Result<(), DexleError> {
        self.targets.insert(target.date, target.pokemon);
        Ok(())
    }

    fn daily_target(&self, date: NaiveDate) -> Result<Option<PokemonId>, DexleError> {
        Ok(self.targets.get(&date).copied())
    }

    fn insert_session(&mut self, session: &GameSession) -> Result<(), DexleError> {
        if self.sessions.contains_key(&session.id) {
            return Err(DexleError::AlreadyExists(session.id.clone()));
        }
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn session(&self, id: &str) -> Result<Option<GameSession>, DexleError> {
        Ok(self.sessions.get(id).cloned())
    }

    fn session_count(&self) -> Result<usize, DexleError> {
        Ok(self.sessions.len())
    }

    fn admit_guess(&mut self, session: &GameSession, guess: &Guess) -> Result<(), DexleError> {
        let key = (guess.session_id.clone(), guess.sequence);
        if self.guesses.contains_key(&key) {
            return Err(DexleError::AlreadyExists(format!(
                "guess {} for session {}",
                guess.sequence, guess.session_id
            )));
        }
        // Ledger first, then the session row; both are in-process writes
        // so the pair cannot partially fail.
        self.guesses.insert(key, guess.clone());
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn guesses(&self, session_id: &str) -> Result<Vec<Guess>, DexleError> {
        let mut history: Vec<Guess> = self
            .guesses
            .range((session_id.to_string(), 0)..=(session_id.to_string(), u32::MAX))
            .map(|(_, guess)| guess.clone())
            .collect();
        // Presentation order is by sequence number, never storage order.
        history.sort_by_key(|guess| guess.sequence);
        Ok(history)
    }
}

// =============================================================================
// TESTS
// =============================================================================
