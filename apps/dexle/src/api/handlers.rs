//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers, including the
//! mapping from engine errors to protocol status codes. The engine never
//! retries a failed request; every error is surfaced verbatim here.

use super::{
    AppState,
    types::{
        CreateSessionRequest, GuessRequest, HealthResponse, SessionResponse, SetTargetRequest,
        SetTargetResponse, StatusResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use dexle_core::{DailyTarget, DexleError, GameStore};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Map an engine error to the protocol status code.
fn error_status(error: &DexleError) -> StatusCode {
    match error {
        DexleError::NotFound(_) => StatusCode::NOT_FOUND,
        DexleError::AlreadyExists(_) => StatusCode::CONFLICT,
        DexleError::AlreadyCompleted(_)
        | DexleError::GuessLimitExceeded(_)
        | DexleError::UnknownCandidate(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DexleError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        DexleError::SerializationError(_) | DexleError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get server status: catalog size, session count, today's schedule.
///
/// A status probe that cannot read storage reports the failure; it never
/// dresses a broken backend up as an empty-but-healthy server.
pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    let engine = state.engine.read().await;
    let store = engine.store();
    let today = Utc::now().date_naive();

    let pokemon_count = store.pokemon_count().map_err(storage_failure)?;
    let session_count = store.session_count().map_err(storage_failure)?;
    let target_scheduled = store.daily_target(today).map_err(storage_failure)?.is_some();

    Ok(Json(StatusResponse {
        pokemon_count,
        session_count,
        target_scheduled,
        date: today,
    }))
}

/// Surface a storage failure from the status probe.
fn storage_failure(error: DexleError) -> (StatusCode, String) {
    tracing::error!(error = %error, "status query failed");
    (error_status(&error), error.to_string())
}

// =============================================================================
// SESSION HANDLERS
// =============================================================================

/// Create a new session for a daily puzzle.
pub async fn create_session_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return (
            error_status(&e),
            Json(SessionResponse::error(e.to_string())),
        );
    }

    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let max_guesses = request
        .max_guesses
        .unwrap_or(dexle_core::primitives::DEFAULT_MAX_GUESSES);

    let mut engine = state.engine.write().await;
    match engine.create_session(&request.session_id, date, max_guesses) {
        Ok(view) => (StatusCode::CREATED, Json(SessionResponse::success(&view))),
        Err(e) => (
            error_status(&e),
            Json(SessionResponse::error(e.to_string())),
        ),
    }
}

/// Submit a guess and return the refreshed session view.
pub async fn guess_handler(
    State(state): State<AppState>,
    Json(request): Json<GuessRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return (
            error_status(&e),
            Json(SessionResponse::error(e.to_string())),
        );
    }

    let mut engine = state.engine.write().await;
    match engine.submit_guess(&request.session_id, &request.guess) {
        Ok(view) => (StatusCode::OK, Json(SessionResponse::success(&view))),
        Err(e) => (
            error_status(&e),
            Json(SessionResponse::error(e.to_string())),
        ),
    }
}

/// Get the current view of a session.
pub async fn session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let engine = state.engine.read().await;
    match engine.session_view(&session_id) {
        Ok(view) => (StatusCode::OK, Json(SessionResponse::success(&view))),
        Err(e) => (
            error_status(&e),
            Json(SessionResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// TARGET HANDLER
// =============================================================================

/// Schedule a daily target. Replaces any existing binding for the date.
pub async fn target_handler(
    State(state): State<AppState>,
    Json(request): Json<SetTargetRequest>,
) -> impl IntoResponse {
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    let mut engine = state.engine.write().await;
    let pokemon = match engine.store().pokemon_by_name(&request.pokemon) {
        Ok(Some(pokemon)) => pokemon,
        Ok(None) => {
            let e = DexleError::UnknownCandidate(request.pokemon.clone());
            return (
                error_status(&e),
                Json(SetTargetResponse::error(e.to_string())),
            );
        }
        Err(e) => {
            return (
                error_status(&e),
                Json(SetTargetResponse::error(e.to_string())),
            );
        }
    };

    match engine
        .store_mut()
        .set_daily_target(&DailyTarget::new(date, pokemon.id))
    {
        Ok(()) => {
            tracing::info!(date = %date, pokemon = %pokemon.name, "daily target scheduled");
            (StatusCode::OK, Json(SetTargetResponse::success(date)))
        }
        Err(e) => (
            error_status(&e),
            Json(SetTargetResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (DexleError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DexleError::AlreadyExists("x".into()), StatusCode::CONFLICT),
            (
                DexleError::AlreadyCompleted("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DexleError::GuessLimitExceeded("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DexleError::UnknownCandidate("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DexleError::InvalidRequest("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DexleError::SerializationError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DexleError::IoError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error_status(&error), expected);
        }
    }

    #[test]
    fn test_status_storage_failure_is_a_500_not_empty_counts() {
        let (status, body) = storage_failure(DexleError::IoError("disk gone".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("disk gone"));
    }
}
