//! Unit tests for API types serialization/deserialization and validation.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use dexle::api::{
    CreateSessionRequest, GuessRequest, HealthResponse, SessionResponse, SetTargetRequest,
    StatusResponse,
};
use dexle_core::primitives::{MAX_MAX_GUESSES, MAX_NAME_LENGTH, MAX_SESSION_ID_LENGTH};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
}

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.4.2".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.4.2\""));
}

// =============================================================================
// STATUS RESPONSE TESTS
// =============================================================================

#[test]
fn test_status_response_serialization() {
    let status = StatusResponse {
        pokemon_count: 151,
        session_count: 12,
        target_scheduled: true,
        date: date(),
    };

    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"pokemon_count\":151"));
    assert!(json.contains("\"session_count\":12"));
    assert!(json.contains("\"target_scheduled\":true"));
    assert!(json.contains("\"date\":\"2026-08-23\""));
}

#[test]
fn test_status_response_deserialization() {
    let json =
        r#"{"pokemon_count":10,"session_count":2,"target_scheduled":false,"date":"2026-08-23"}"#;
    let status: StatusResponse = serde_json::from_str(json).unwrap();

    assert_eq!(status.pokemon_count, 10);
    assert_eq!(status.session_count, 2);
    assert!(!status.target_scheduled);
    assert_eq!(status.date, date());
}

// =============================================================================
// CREATE SESSION REQUEST TESTS
// =============================================================================

#[test]
fn test_create_session_request_defaults() {
    // Omitted date and max_guesses deserialize to None.
    let json = r#"{"session_id":"alice"}"#;
    let request: CreateSessionRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.session_id, "alice");
    assert!(request.date.is_none());
    assert!(request.max_guesses.is_none());
    assert!(request.validate().is_ok());
}

#[test]
fn test_create_session_request_full() {
    let json = r#"{"session_id":"alice","date":"2026-08-23","max_guesses":8}"#;
    let request: CreateSessionRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.date, Some(date()));
    assert_eq!(request.max_guesses, Some(8));
    assert!(request.validate().is_ok());
}

#[test]
fn test_create_session_request_rejects_empty_id() {
    let request = CreateSessionRequest {
        session_id: String::new(),
        date: None,
        max_guesses: None,
    };
    assert!(request.validate().is_err());
}

#[test]
fn test_create_session_request_rejects_oversized_id() {
    let request = CreateSessionRequest {
        session_id: "x".repeat(MAX_SESSION_ID_LENGTH + 1),
        date: None,
        max_guesses: None,
    };
    assert!(request.validate().is_err());
}

#[test]
fn test_create_session_request_budget_limits() {
    let at_limit = CreateSessionRequest {
        session_id: "alice".to_string(),
        date: None,
        max_guesses: Some(MAX_MAX_GUESSES),
    };
    assert!(at_limit.validate().is_ok());

    let over_limit = CreateSessionRequest {
        session_id: "alice".to_string(),
        date: None,
        max_guesses: Some(MAX_MAX_GUESSES + 1),
    };
    assert!(over_limit.validate().is_err());

    let zero = CreateSessionRequest {
        session_id: "alice".to_string(),
        date: None,
        max_guesses: Some(0),
    };
    assert!(zero.validate().is_err());
}

// =============================================================================
// GUESS REQUEST TESTS
// =============================================================================

#[test]
fn test_guess_request_valid() {
    let json = r#"{"session_id":"alice","guess":"Pikachu"}"#;
    let request: GuessRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.guess, "Pikachu");
    assert!(request.validate().is_ok());
}

#[test]
fn test_guess_request_rejects_empty_guess() {
    let request = GuessRequest {
        session_id: "alice".to_string(),
        guess: String::new(),
    };
    assert!(request.validate().is_err());
}

#[test]
fn test_guess_request_rejects_oversized_guess() {
    let request = GuessRequest {
        session_id: "alice".to_string(),
        guess: "x".repeat(MAX_NAME_LENGTH + 1),
    };
    assert!(request.validate().is_err());
}

// =============================================================================
// SET TARGET REQUEST TESTS
// =============================================================================

#[test]
fn test_set_target_request_date_optional() {
    let json = r#"{"pokemon":"pikachu"}"#;
    let request: SetTargetRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.pokemon, "pikachu");
    assert!(request.date.is_none());
}

// =============================================================================
// SESSION RESPONSE TESTS
// =============================================================================

#[test]
fn test_session_response_error_shape() {
    let response = SessionResponse::error("not found: ghost");

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"success\":false"));
    assert!(json.contains("\"session\":null"));
    assert!(json.contains("not found: ghost"));
}

#[test]
fn test_session_json_target_omitted_when_hidden() {
    // An active session serializes without a "target" key at all.
    let json = r#"{
        "success": true,
        "session": {
            "session_id": "alice",
            "date": "2026-08-23",
            "max_guesses": 6,
            "guesses_made": 0,
            "completed": false,
            "won": false,
            "can_guess": true,
            "guesses": []
        },
        "error": null
    }"#;
    let response: SessionResponse = serde_json::from_str(json).unwrap();
    let session = response.session.unwrap();
    assert!(session.target.is_none());

    let serialized = serde_json::to_string(&SessionResponse {
        success: true,
        session: Some(session),
        error: None,
    })
    .unwrap();
    assert!(!serialized.contains("\"target\""));
}
