//! # redb-backed Game Store
//!
//! A disk-backed [`GameStore`] using the redb embedded database, providing:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! ## Atomic Guess Admission
//!
//! `admit_guess` groups the session-row update and the ledger append into
//! one write transaction. Either the guess is fully admitted or nothing
//! changes, which is what keeps the dense-sequence invariant intact.

use crate::store::GameStore;
use crate::types::{DailyTarget, DexleError, GameSession, Guess, Pokemon, PokemonId};
use chrono::NaiveDate;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for the candidate catalog: PokemonId(u64) -> serialized Pokemon bytes.
const POKEMON: TableDefinition<u64, &[u8]> = TableDefinition::new("pokemon");

/// Table for the name index: lowercased name -> PokemonId(u64).
const NAME_INDEX: TableDefinition<&str, u64> = TableDefinition::new("name_index");

/// Table for daily targets: ISO date string -> PokemonId(u64).
/// Keying by date enforces at most one target per date.
const TARGETS: TableDefinition<&str, u64> = TableDefinition::new("targets");

/// Table for sessions: session id -> serialized GameSession bytes.
const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Table for the guess ledger: (session id, sequence) -> serialized Guess bytes.
/// The composite key enables per-session range reads.
const GUESSES: TableDefinition<(&str, u32), &[u8]> = TableDefinition::new("guesses");

/// A disk-backed game store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

/// ISO key for the targets table.
fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl RedbStore {
    /// Open or create a game database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DexleError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| DexleError::IoError(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(POKEMON)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(NAME_INDEX)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(TARGETS)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(SESSIONS)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(GUESSES)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| DexleError::IoError(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), DexleError> {
        self.db
            .compact()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Insert a batch of catalog entries in a single ACID transaction.
    ///
    /// Used by catalog import: grouping all writes into one transaction
    /// reduces fsync overhead from O(N) to O(1).
    pub fn insert_pokemon_batch(&mut self, batch: &[Pokemon]) -> Result<(), DexleError> {
        if batch.is_empty() {
            return Ok(());
        }

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        {
            let mut pokemon_table = write_txn
                .open_table(POKEMON)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let mut name_table = write_txn
                .open_table(NAME_INDEX)
                .map_err(|e| DexleError::IoError(e.to_string()))?;

            for pokemon in batch {
                let bytes = postcard::to_allocvec(pokemon)
                    .map_err(|e| DexleError::SerializationError(e.to_string()))?;
                pokemon_table
                    .insert(pokemon.id.0, bytes.as_slice())
                    .map_err(|e| DexleError::IoError(e.to_string()))?;
                name_table
                    .insert(pokemon.name.to_lowercase().as_str(), pokemon.id.0)
                    .map_err(|e| DexleError::IoError(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(())
    }

    fn read_pokemon(&self, id: u64) -> Result<Option<Pokemon>, DexleError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(POKEMON)
            .map_err(|e| DexleError::IoError(e.to_string()))?;

        let Some(data) = table
            .get(id)
            .map_err(|e| DexleError::IoError(e.to_string()))?
        else {
            return Ok(None);
        };
        let pokemon: Pokemon = postcard::from_bytes(data.value())
            .map_err(|e| DexleError::SerializationError(e.to_string()))?;
        Ok(Some(pokemon))
    }
}

// =============================================================================
// GAMESTORE TRAIT IMPLEMENTATION
// =============================================================================

impl GameStore for RedbStore {
    fn insert_pokemon(&mut self, pokemon: Pokemon) -> Result<(), DexleError> {
        self.insert_pokemon_batch(std::slice::from_ref(&pokemon))
    }

    fn pokemon_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, DexleError> {
        self.read_pokemon(id.0)
    }

    fn pokemon_by_name(&self, name: &str) -> Result<Option<Pokemon>, DexleError> {
        let id = {
            let read_txn = self
                .db
                .begin_read()
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let table = read_txn
                .open_table(NAME_INDEX)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            table
                .get(name.to_lowercase().as_str())
                .map_err(|e| DexleError::IoError(e.to_string()))?
                .map(|v| v.value())
        };

        match id {
            Some(id) => self.read_pokemon(id),
            None => Ok(None),
        }
    }

    fn pokemon_count(&self) -> Result<usize, DexleError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(POKEMON)
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let len = table
            .len()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(len as usize)
    }

    fn set_daily_target(&mut self, target: &DailyTarget) -> Result<(), DexleError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TARGETS)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            table
                .insert(date_key(target.date).as_str(), target.pokemon.0)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(())
    }

    fn daily_target(&self, date: NaiveDate) -> Result<Option<PokemonId>, DexleError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(TARGETS)
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(table
            .get(date_key(date).as_str())
            .map_err(|e| DexleError::IoError(e.to_string()))?
            .map(|v| PokemonId(v.value())))
    }

    fn insert_session(&mut self, session: &GameSession) -> Result<(), DexleError> {
        let bytes = postcard::to_allocvec(session)
            .map_err(|e| DexleError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SESSIONS)
                .map_err(|e| DexleError::IoError(e.to_string()))?;

            // Insert-if-absent: check and insert inside one transaction.
            let exists = table
                .get(session.id.as_str())
                .map_err(|e| DexleError::IoError(e.to_string()))?
                .is_some();
            if exists {
                return Err(DexleError::AlreadyExists(session.id.clone()));
            }
            table
                .insert(session.id.as_str(), bytes.as_slice())
                .map_err(|e| DexleError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(())
    }

    fn session(&self, id: &str) -> Result<Option<GameSession>, DexleError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SESSIONS)
            .map_err(|e| DexleError::IoError(e.to_string()))?;

        let Some(data) = table
            .get(id)
            .map_err(|e| DexleError::IoError(e.to_string()))?
        else {
            return Ok(None);
        };
        let session: GameSession = postcard::from_bytes(data.value())
            .map_err(|e| DexleError::SerializationError(e.to_string()))?;
        Ok(Some(session))
    }

    fn session_count(&self) -> Result<usize, DexleError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SESSIONS)
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let len = table
            .len()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(len as usize)
    }

    fn admit_guess(&mut self, session: &GameSession, guess: &Guess) -> Result<(), DexleError> {
        let session_bytes = postcard::to_allocvec(session)
            .map_err(|e| DexleError::SerializationError(e.to_string()))?;
        let guess_bytes = postcard::to_allocvec(guess)
            .map_err(|e| DexleError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        {
            let mut guesses_table = write_txn
                .open_table(GUESSES)
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            let mut sessions_table = write_txn
                .open_table(SESSIONS)
                .map_err(|e| DexleError::IoError(e.to_string()))?;

            // Ledger entries are append-only; an occupied slot aborts the
            // whole transaction, leaving session counters untouched.
            let occupied = guesses_table
                .get((guess.session_id.as_str(), guess.sequence))
                .map_err(|e| DexleError::IoError(e.to_string()))?
                .is_some();
            if occupied {
                return Err(DexleError::AlreadyExists(format!(
                    "guess {} for session {}",
                    guess.sequence, guess.session_id
                )));
            }

            guesses_table
                .insert(
                    (guess.session_id.as_str(), guess.sequence),
                    guess_bytes.as_slice(),
                )
                .map_err(|e| DexleError::IoError(e.to_string()))?;
            sessions_table
                .insert(session.id.as_str(), session_bytes.as_slice())
                .map_err(|e| DexleError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        Ok(())
    }

    fn guesses(&self, session_id: &str) -> Result<Vec<Guess>, DexleError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| DexleError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(GUESSES)
            .map_err(|e| DexleError::IoError(e.to_string()))?;

        let mut history = Vec::new();
        for entry in table
            .range((session_id, 0u32)..=(session_id, u32::MAX))
            .map_err(|e| DexleError::IoError(e.to_string()))?
        {
            let (_, value) = entry.map_err(|e| DexleError::IoError(e.to_string()))?;
            let guess: Guess = postcard::from_bytes(value.value())
                .map_err(|e| DexleError::SerializationError(e.to_string()))?;
            history.push(guess);
        }
        // Presentation order is by sequence number, never storage order.
        history.sort_by_key(|guess| guess.sequence);
        Ok(history)
    }
}

// =============================================================================
// TESTS
// =============================================================================
