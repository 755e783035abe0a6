//! # Game Engine
//!
//! The session state machine: creation, guess admission, terminal
//! transitions, and typed session views.
//!
//! ## Lifecycle
//!
//! `Active` → `Completed-Won` | `Completed-Lost`. Both terminal states
//! are absorbing: no transition leaves them. A correct guess wins the
//! session immediately regardless of remaining budget; an incorrect guess
//! that exhausts the budget loses it.
//!
//! ## Concurrency
//!
//! Engine methods take `&mut self`, so each operation is a single
//! read-compute-write unit. The app layer serializes access through
//! `Arc<RwLock<GameEngine>>`; the persistent backend additionally commits
//! each admission as one ACID transaction.

use crate::feedback::{Feedback, compute_feedback};
use crate::store::{GameStore, MemoryStore, RedbStore, StorageBackend};
use crate::types::{DexleError, GameSession, Guess, Pokemon, PokemonId};
use chrono::{NaiveDate, Utc};
use std::path::Path;

// =============================================================================
// TYPED VIEWS
// =============================================================================

/// One history entry in a session view: the admitted guess paired with the
/// resolved Pokémon and its feedback against the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessView {
    /// 1-based position of this guess within the session.
    pub sequence: u32,
    /// The guessed Pokémon, fully resolved.
    pub pokemon: Pokemon,
    /// Whether this guess hit the target.
    pub correct: bool,
    /// Per-attribute comparison against the target.
    pub feedback: Feedback,
}

/// The complete externally visible state of a session.
///
/// Information hiding: `target` is populated only once the session is
/// terminal. While guessing is still possible the answer never leaves
/// the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// The session record.
    pub session: GameSession,
    /// Full guess history, ordered by sequence number.
    pub guesses: Vec<GuessView>,
    /// The daily target, revealed only for terminal sessions.
    pub target: Option<Pokemon>,
    /// True iff the session is still active.
    pub can_guess: bool,
}

// =============================================================================
// GAME ENGINE
// =============================================================================

/// The Dexle session state machine over an injected storage capability.
#[derive(Debug, Default)]
pub struct GameEngine {
    /// The storage backend (in-memory or persistent).
    store: StorageBackend,
}

impl GameEngine {
    /// Create an engine over an explicit backend.
    #[must_use]
    pub fn new(store: StorageBackend) -> Self {
        Self { store }
    }

    /// Create an engine with volatile in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(StorageBackend::InMemory(MemoryStore::new()))
    }

    /// Create an engine with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, DexleError> {
        let store = RedbStore::open(path)?;
        Ok(Self::new(StorageBackend::Persistent(store)))
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.store, StorageBackend::Persistent(_))
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn store(&self) -> &StorageBackend {
        &self.store
    }

    /// Get a mutable reference to the storage backend.
    ///
    /// Catalog population and target scheduling go through here; session
    /// mutation goes only through the engine operations.
    #[must_use]
    pub fn store_mut(&mut self) -> &mut StorageBackend {
        &mut self.store
    }

    // =========================================================================
    // SESSION CREATION
    // =========================================================================

    /// Create a new active session against the daily target for `date`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `max_guesses` is zero
    /// - `NotFound` if no daily target is scheduled for `date`
    /// - `AlreadyExists` if the session identifier is already in use
    pub fn create_session(
        &mut self,
        session_id: &str,
        date: NaiveDate,
        max_guesses: u32,
    ) -> Result<SessionView, DexleError> {
        if max_guesses == 0 {
            return Err(DexleError::InvalidRequest(
                "max_guesses must be positive".to_string(),
            ));
        }
        if self.store.daily_target(date)?.is_none() {
            return Err(DexleError::NotFound(format!("no daily target for {date}")));
        }

        let session = GameSession::new(session_id, date, max_guesses, Utc::now());
        self.store.insert_session(&session)?;
        self.view_of(session)
    }

    // =========================================================================
    // GUESS ADMISSION
    // =========================================================================

    /// Submit a guess to a session and return the refreshed view.
    ///
    /// The error ladder runs in order: unknown session, terminal session,
    /// exhausted budget (defensive, normally unreachable), unresolvable
    /// candidate. Only after all checks pass is anything written, and the
    /// session update and ledger append land together or not at all.
    pub fn submit_guess(
        &mut self,
        session_id: &str,
        candidate_name: &str,
    ) -> Result<SessionView, DexleError> {
        let mut session = self
            .store
            .session(session_id)?
            .ok_or_else(|| DexleError::NotFound(session_id.to_string()))?;

        if session.completed {
            return Err(DexleError::AlreadyCompleted(session_id.to_string()));
        }
        // Admission completes the session at max_guesses, so an active
        // session with an exhausted budget indicates corrupted state.
        if session.guesses_made >= session.max_guesses {
            return Err(DexleError::GuessLimitExceeded(session_id.to_string()));
        }

        let candidate = self
            .store
            .pokemon_by_name(candidate_name)?
            .ok_or_else(|| DexleError::UnknownCandidate(candidate_name.to_string()))?;

        let target_id = self.target_of(&session)?;
        let correct = candidate.id == target_id;

        let sequence = session.guesses_made.saturating_add(1);
        session.guesses_made = sequence;
        if correct {
            session.complete(true, Utc::now());
        } else if session.guesses_made == session.max_guesses {
            session.complete(false, Utc::now());
        }

        let guess = Guess {
            session_id: session.id.clone(),
            sequence,
            pokemon: candidate.id,
            correct,
        };
        self.store.admit_guess(&session, &guess)?;

        self.view_of(session)
    }

    // =========================================================================
    // SESSION VIEW
    // =========================================================================

    /// Get the current view of a session.
    ///
    /// # Errors
    ///
    /// `NotFound` if no session matches `session_id`.
    pub fn session_view(&self, session_id: &str) -> Result<SessionView, DexleError> {
        let session = self
            .store
            .session(session_id)?
            .ok_or_else(|| DexleError::NotFound(session_id.to_string()))?;
        self.view_of(session)
    }

    /// Resolve the target Pokémon id for a session's date.
    fn target_of(&self, session: &GameSession) -> Result<PokemonId, DexleError> {
        self.store
            .daily_target(session.date)?
            .ok_or_else(|| DexleError::NotFound(format!("no daily target for {}", session.date)))
    }

    /// Assemble the typed view: ordered history with feedback, plus the
    /// target once (and only once) the session is terminal.
    fn view_of(&self, session: GameSession) -> Result<SessionView, DexleError> {
        let target_id = self.target_of(&session)?;
        let target = self
            .store
            .pokemon_by_id(target_id)?
            .ok_or_else(|| DexleError::NotFound(format!("target pokemon {}", target_id.0)))?;

        let mut guesses = Vec::with_capacity(session.guesses_made as usize);
        for guess in self.store.guesses(&session.id)? {
            let pokemon = self
                .store
                .pokemon_by_id(guess.pokemon)?
                .ok_or_else(|| DexleError::NotFound(format!("pokemon {}", guess.pokemon.0)))?;
            let feedback = compute_feedback(&pokemon, &target);
            guesses.push(GuessView {
                sequence: guess.sequence,
                pokemon,
                correct: guess.correct,
                feedback,
            });
        }

        let can_guess = session.can_guess();
        let target = if session.completed { Some(target) } else { None };

        Ok(SessionView {
            session,
            guesses,
            target,
            can_guess,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{OrdinalHint, Verdict};
    use crate::types::DailyTarget;

    fn pokemon(id: u64, name: &str, primary: &str, generation: u32) -> Pokemon {
        Pokemon {
            id: PokemonId(id),
            name: name.to_string(),
            primary_type: primary.to_string(),
            secondary_type: None,
            evolution_stage: 1,
            fully_evolved: false,
            color: "yellow".to_string(),
            habitat: Some("forest".to_string()),
            generation,
            sprite_url: format!("https://sprites.test/{id}.png"),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    /// Engine with a three-entry catalog and Pikachu as the daily target.
    fn engine() -> GameEngine {
        let mut engine = GameEngine::in_memory();
        let store = engine.store_mut();
        store
            .insert_pokemon(pokemon(25, "Pikachu", "electric", 1))
            .expect("insert");
        store
            .insert_pokemon(pokemon(4, "Charmander", "fire", 1))
            .expect("insert");
        store
            .insert_pokemon(pokemon(152, "Chikorita", "grass", 2))
            .expect("insert");
        store
            .set_daily_target(&DailyTarget::new(date(), PokemonId(25)))
            .expect("target");
        engine
    }

    #[test]
    fn create_session_requires_a_target() {
        let mut engine = engine();
        let missing = NaiveDate::from_ymd_opt(2024, 6, 2).expect("valid date");
        let err = engine
            .create_session("s1", missing, 6)
            .expect_err("no target");
        assert!(matches!(err, DexleError::NotFound(_)));
    }

    #[test]
    fn create_session_rejects_zero_budget() {
        let mut engine = engine();
        let err = engine.create_session("s1", date(), 0).expect_err("zero");
        assert!(matches!(err, DexleError::InvalidRequest(_)));
    }

    #[test]
    fn duplicate_session_id_rejected() {
        let mut engine = engine();
        engine.create_session("s1", date(), 6).expect("create");
        let err = engine.create_session("s1", date(), 6).expect_err("dup");
        assert!(matches!(err, DexleError::AlreadyExists(_)));
    }

    #[test]
    fn new_session_hides_the_target() {
        let mut engine = engine();
        let view = engine.create_session("s1", date(), 6).expect("create");
        assert!(view.can_guess);
        assert!(view.target.is_none());
        assert!(view.guesses.is_empty());
        assert_eq!(view.session.guesses_made, 0);
    }

    #[test]
    fn correct_guess_wins_with_budget_remaining() {
        let mut engine = engine();
        engine.create_session("s1", date(), 6).expect("create");

        let view = engine.submit_guess("s1", "pikachu").expect("guess");
        assert!(view.session.completed);
        assert!(view.session.won);
        assert!(!view.can_guess);
        assert_eq!(view.session.guesses_made, 1);
        assert!(view.session.completed_at.is_some());
        assert_eq!(view.target.as_ref().map(|p| p.id), Some(PokemonId(25)));
        assert!(view.guesses[0].correct);
        assert!(view.guesses[0].feedback.all_correct());
    }

    #[test]
    fn budget_exhaustion_loses_the_session() {
        let mut engine = engine();
        engine.create_session("s1", date(), 2).expect("create");

        let view = engine.submit_guess("s1", "Charmander").expect("guess 1");
        assert!(!view.session.completed);
        assert!(view.can_guess);
        assert!(view.target.is_none());

        let view = engine.submit_guess("s1", "Chikorita").expect("guess 2");
        assert!(view.session.completed);
        assert!(!view.session.won);
        assert!(!view.can_guess);
        assert_eq!(view.session.guesses_made, 2);
        // The answer is revealed once the session is terminal.
        assert_eq!(view.target.as_ref().map(|p| p.id), Some(PokemonId(25)));
    }

    #[test]
    fn terminal_session_rejects_guesses_without_mutation() {
        let mut engine = engine();
        engine.create_session("s1", date(), 1).expect("create");
        engine.submit_guess("s1", "Charmander").expect("guess");

        let err = engine
            .submit_guess("s1", "Pikachu")
            .expect_err("terminal session");
        assert!(matches!(err, DexleError::AlreadyCompleted(_)));

        let view = engine.session_view("s1").expect("view");
        assert_eq!(view.session.guesses_made, 1);
        assert_eq!(view.guesses.len(), 1);
    }

    #[test]
    fn unknown_candidate_rejected_without_mutation() {
        let mut engine = engine();
        engine.create_session("s1", date(), 6).expect("create");

        let err = engine
            .submit_guess("s1", "MissingNo")
            .expect_err("unknown candidate");
        assert!(matches!(err, DexleError::UnknownCandidate(_)));

        let view = engine.session_view("s1").expect("view");
        assert_eq!(view.session.guesses_made, 0);
        assert!(view.guesses.is_empty());
        assert!(view.can_guess);
    }

    #[test]
    fn guess_on_missing_session_is_not_found() {
        let mut engine = engine();
        let err = engine
            .submit_guess("ghost", "Pikachu")
            .expect_err("missing session");
        assert!(matches!(err, DexleError::NotFound(_)));
    }

    #[test]
    fn guess_limit_guard_fires_on_corrupted_state() {
        let mut engine = engine();
        engine.create_session("s1", date(), 2).expect("create");

        // Forge an active session whose counter already equals the budget,
        // bypassing the admission transition.
        let mut forged = engine
            .store()
            .session("s1")
            .expect("read")
            .expect("present");
        forged.guesses_made = forged.max_guesses;
        let guess = Guess {
            session_id: "s1".to_string(),
            sequence: u32::MAX,
            pokemon: PokemonId(4),
            correct: false,
        };
        engine
            .store_mut()
            .admit_guess(&forged, &guess)
            .expect("forge");

        let err = engine
            .submit_guess("s1", "Pikachu")
            .expect_err("defensive guard");
        assert!(matches!(err, DexleError::GuessLimitExceeded(_)));
    }

    #[test]
    fn history_carries_feedback_against_the_target() {
        let mut engine = engine();
        engine.create_session("s1", date(), 6).expect("create");
        engine.submit_guess("s1", "chikorita").expect("guess");

        let view = engine.session_view("s1").expect("view");
        let entry = &view.guesses[0];
        assert_eq!(entry.sequence, 1);
        assert_eq!(entry.pokemon.name, "Chikorita");
        assert!(!entry.correct);
        assert_eq!(entry.feedback.primary_type, Verdict::Incorrect);
        // Chikorita is gen 2, Pikachu is gen 1: the target is lower.
        assert_eq!(entry.feedback.generation, OrdinalHint::TargetIsLower);
        assert_eq!(entry.feedback.color, Verdict::Correct);
    }

    #[test]
    fn sequences_stay_dense_across_guesses() {
        let mut engine = engine();
        engine.create_session("s1", date(), 4).expect("create");
        engine.submit_guess("s1", "Charmander").expect("guess");
        engine.submit_guess("s1", "Chikorita").expect("guess");
        engine.submit_guess("s1", "Charmander").expect("guess");

        let view = engine.session_view("s1").expect("view");
        let sequences: Vec<u32> = view.guesses.iter().map(|g| g.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(view.session.guesses_made, 3);
    }
}
