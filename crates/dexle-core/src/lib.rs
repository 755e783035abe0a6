//! # dexle-core
//!
//! The deterministic game engine for Dexle - THE LOGIC.
//!
//! Dexle is a daily-puzzle guessing game: a hidden Pokémon is chosen per
//! calendar date, and a player submits guesses against the candidate
//! catalog, receiving per-attribute comparison feedback until they hit the
//! target or exhaust their guess budget.
//!
//! This crate owns the session state machine, the feedback computation,
//! and the guess ledger. Transport (HTTP, CLI) and catalog population live
//! in the app layer.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is the ONLY place where game state transitions happen
//! - Receives its storage capability explicitly; no module-level globals
//! - Is minimal: if a feature is not essential to playing a session, it
//!   is removed
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod engine;
pub mod feedback;
pub mod primitives;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{DailyTarget, DexleError, GameSession, Guess, Pokemon, PokemonId};

// =============================================================================
// RE-EXPORTS: Game Engine
// =============================================================================

pub use engine::{GameEngine, GuessView, SessionView};
pub use feedback::{Feedback, OrdinalHint, Verdict, compute_feedback};
pub use store::{GameStore, MemoryStore, RedbStore, StorageBackend};
