//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use chrono::NaiveDate;
use dexle_core::{
    DexleError, Feedback, GuessView, SessionView,
    primitives::{MAX_MAX_GUESSES, MAX_NAME_LENGTH, MAX_SESSION_ID_LENGTH},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Server status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub pokemon_count: usize,
    pub session_count: usize,
    /// Whether a daily target is scheduled for today (UTC).
    pub target_scheduled: bool,
    pub date: NaiveDate,
}

// =============================================================================
// CREATE SESSION REQUEST
// =============================================================================

/// Session creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Caller-supplied unique session identifier.
    pub session_id: String,
    /// Puzzle date; defaults to today (UTC) when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Guess budget; defaults to `DEFAULT_MAX_GUESSES` when omitted.
    #[serde(default)]
    pub max_guesses: Option<u32>,
}

impl CreateSessionRequest {
    /// Validate boundary limits before the request reaches the engine.
    ///
    /// Rejects empty or oversized session identifiers and budgets outside
    /// `1..=MAX_MAX_GUESSES`. This keeps malformed payloads out of the
    /// engine and the database.
    pub fn validate(&self) -> Result<(), DexleError> {
        if self.session_id.is_empty() {
            return Err(DexleError::InvalidRequest(
                "session_id must not be empty".to_string(),
            ));
        }
        if self.session_id.len() > MAX_SESSION_ID_LENGTH {
            return Err(DexleError::InvalidRequest(format!(
                "session_id length {} exceeds maximum {} bytes",
                self.session_id.len(),
                MAX_SESSION_ID_LENGTH
            )));
        }
        if let Some(max_guesses) = self.max_guesses {
            if max_guesses == 0 || max_guesses > MAX_MAX_GUESSES {
                return Err(DexleError::InvalidRequest(format!(
                    "max_guesses must be within 1..={MAX_MAX_GUESSES}"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// GUESS REQUEST
// =============================================================================

/// Guess submission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    pub session_id: String,
    /// Free-text candidate name; resolution is case-insensitive.
    pub guess: String,
}

impl GuessRequest {
    /// Validate boundary limits before the request reaches the engine.
    pub fn validate(&self) -> Result<(), DexleError> {
        if self.session_id.is_empty() || self.session_id.len() > MAX_SESSION_ID_LENGTH {
            return Err(DexleError::InvalidRequest(
                "invalid session_id".to_string(),
            ));
        }
        if self.guess.is_empty() {
            return Err(DexleError::InvalidRequest(
                "guess must not be empty".to_string(),
            ));
        }
        if self.guess.len() > MAX_NAME_LENGTH {
            return Err(DexleError::InvalidRequest(format!(
                "guess length {} exceeds maximum {} bytes",
                self.guess.len(),
                MAX_NAME_LENGTH
            )));
        }
        Ok(())
    }
}

// =============================================================================
// SET TARGET REQUEST
// =============================================================================

/// Daily target scheduling request (the external scheduler's entry point).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTargetRequest {
    /// Date to schedule; defaults to today (UTC) when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Name of the Pokémon to hide behind that date.
    pub pokemon: String,
}

/// Daily target scheduling response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTargetResponse {
    pub success: bool,
    pub date: Option<NaiveDate>,
    pub error: Option<String>,
}

impl SetTargetResponse {
    pub fn success(date: NaiveDate) -> Self {
        Self {
            success: true,
            date: Some(date),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            date: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SESSION RESPONSE
// =============================================================================

/// One guessed Pokémon with its feedback, as presented to the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessJson {
    pub sequence: u32,
    pub name: String,
    pub sprite_url: String,
    pub correct: bool,
    pub feedback: Feedback,
}

impl From<&GuessView> for GuessJson {
    fn from(view: &GuessView) -> Self {
        Self {
            sequence: view.sequence,
            name: view.pokemon.name.clone(),
            sprite_url: view.pokemon.sprite_url.clone(),
            correct: view.correct,
            feedback: view.feedback,
        }
    }
}

/// The revealed answer, present only for terminal sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetJson {
    pub name: String,
    pub sprite_url: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub generation: u32,
}

/// Session state as seen by the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionJson {
    pub session_id: String,
    pub date: NaiveDate,
    pub max_guesses: u32,
    pub guesses_made: u32,
    pub completed: bool,
    pub won: bool,
    pub can_guess: bool,
    pub guesses: Vec<GuessJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub target: Option<TargetJson>,
}

impl From<&SessionView> for SessionJson {
    fn from(view: &SessionView) -> Self {
        Self {
            session_id: view.session.id.clone(),
            date: view.session.date,
            max_guesses: view.session.max_guesses,
            guesses_made: view.session.guesses_made,
            completed: view.session.completed,
            won: view.session.won,
            can_guess: view.can_guess,
            guesses: view.guesses.iter().map(GuessJson::from).collect(),
            target: view.target.as_ref().map(|pokemon| TargetJson {
                name: pokemon.name.clone(),
                sprite_url: pokemon.sprite_url.clone(),
                primary_type: pokemon.primary_type.clone(),
                secondary_type: pokemon.secondary_type.clone(),
                generation: pokemon.generation,
            }),
        }
    }
}

/// Envelope for session-returning endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: Option<SessionJson>,
    pub error: Option<String>,
}

impl SessionResponse {
    pub fn success(view: &SessionView) -> Self {
        Self {
            success: true,
            session: Some(SessionJson::from(view)),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            session: None,
            error: Some(msg.into()),
        }
    }
}
