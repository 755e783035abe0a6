//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use chrono::{NaiveDate, Utc};
use dexle_core::{
    DailyTarget, DexleError, GameEngine, GameStore, OrdinalHint, Pokemon, SessionView, Verdict,
};
use std::path::PathBuf;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for catalog import (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_IMPORT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &PathBuf, max_size: u64) -> Result<(), DexleError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| DexleError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(DexleError::InvalidRequest(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate file path for security.
///
/// This function:
/// 1. Canonicalizes the path to resolve symlinks and ".."
/// 2. Ensures the path exists
/// 3. Ensures the path is a file (not a directory)
fn validate_file_path(path: &std::path::Path) -> Result<PathBuf, DexleError> {
    // Canonicalize resolves "..", symlinks, and validates existence
    let canonical = path.canonicalize().map_err(|e| {
        DexleError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    // Ensure it's a file, not a directory
    if !canonical.is_file() {
        return Err(DexleError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// ENGINE LOADING
// =============================================================================

/// Open the engine over the requested backend.
fn load_engine(db_path: &PathBuf, backend: &str) -> Result<GameEngine, DexleError> {
    match backend {
        "memory" => {
            tracing::warn!("memory backend is volatile; nothing will be persisted");
            Ok(GameEngine::in_memory())
        }
        "redb" => GameEngine::with_redb(db_path),
        other => Err(DexleError::InvalidRequest(format!(
            "unknown backend '{other}' (expected 'redb' or 'memory')"
        ))),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &PathBuf,
    backend: &str,
    host: &str,
    port: u16,
) -> Result<(), DexleError> {
    let engine = load_engine(db_path, backend)?;

    println!("Dexle Game Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", backend);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  POST /session      - Create a session");
    println!("  POST /guess        - Submit a guess");
    println!("  GET  /session/{{id}} - Session view with history");
    println!("  POST /target       - Schedule a daily target");
    println!("  GET  /status       - Server status");
    println!("  GET  /health       - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, engine).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show catalog and session status.
pub fn cmd_status(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), DexleError> {
    let engine = load_engine(db_path, backend)?;
    let store = engine.store();

    let pokemon_count = store.pokemon_count()?;
    let session_count = store.session_count()?;
    let target_scheduled = store.daily_target(today())?.is_some();

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": backend,
            "pokemon_count": pokemon_count,
            "session_count": session_count,
            "target_scheduled": target_scheduled,
            "date": today().to_string(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Dexle Status");
    println!("============");
    println!("Database: {:?}", db_path);
    println!("Backend:  {}", backend);
    println!();
    println!("Catalog:  {} Pokémon", pokemon_count);
    println!("Sessions: {}", session_count);
    println!(
        "Today:    {} ({})",
        today(),
        if target_scheduled {
            "target scheduled"
        } else {
            "NO TARGET SCHEDULED"
        }
    );

    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import the candidate catalog from a JSON file.
///
/// The file is a JSON array of catalog entries matching the `Pokemon`
/// shape. Existing entries with the same id are replaced.
pub fn cmd_import(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    file: &PathBuf,
) -> Result<(), DexleError> {
    let canonical = validate_file_path(file)?;
    validate_file_size(&canonical, MAX_IMPORT_FILE_SIZE)?;

    let contents = std::fs::read_to_string(&canonical)
        .map_err(|e| DexleError::IoError(format!("Cannot read '{}': {}", file.display(), e)))?;
    let catalog: Vec<Pokemon> = serde_json::from_str(&contents)
        .map_err(|e| DexleError::SerializationError(format!("Invalid catalog JSON: {}", e)))?;

    let mut engine = load_engine(db_path, backend)?;
    let imported = catalog.len();
    match engine.store_mut() {
        dexle_core::StorageBackend::Persistent(store) => {
            // Single transaction for the whole batch.
            store.insert_pokemon_batch(&catalog)?;
        }
        store => {
            for pokemon in catalog {
                store.insert_pokemon(pokemon)?;
            }
        }
    }

    if json_mode {
        let output = serde_json::json!({ "imported": imported });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Imported {} catalog entries", imported);
    }
    Ok(())
}

// =============================================================================
// TARGET COMMAND
// =============================================================================

/// Schedule a daily target, or show whether one is scheduled.
pub fn cmd_target(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    name: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<(), DexleError> {
    let mut engine = load_engine(db_path, backend)?;
    let date = date.unwrap_or_else(today);

    match name {
        Some(name) => {
            let pokemon = engine
                .store()
                .pokemon_by_name(name)?
                .ok_or_else(|| DexleError::UnknownCandidate(name.to_string()))?;
            engine
                .store_mut()
                .set_daily_target(&DailyTarget::new(date, pokemon.id))?;

            if json_mode {
                let output = serde_json::json!({ "date": date.to_string(), "scheduled": true });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).unwrap_or_default()
                );
            } else {
                // The answer is not echoed back; operators grep logs, players
                // read terminals.
                println!("Target scheduled for {}", date);
            }
        }
        None => {
            let scheduled = engine.store().daily_target(date)?.is_some();
            if json_mode {
                let output =
                    serde_json::json!({ "date": date.to_string(), "scheduled": scheduled });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).unwrap_or_default()
                );
            } else if scheduled {
                println!("{}: target scheduled", date);
            } else {
                println!("{}: no target scheduled", date);
            }
        }
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty database.
pub fn cmd_init(db_path: &PathBuf, backend: &str, force: bool) -> Result<(), DexleError> {
    if backend != "redb" {
        return Err(DexleError::InvalidRequest(
            "init only applies to the redb backend".to_string(),
        ));
    }

    if db_path.exists() {
        if !force {
            return Err(DexleError::AlreadyExists(format!(
                "database '{}' already exists (use --force to overwrite)",
                db_path.display()
            )));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| DexleError::IoError(format!("Cannot remove database: {}", e)))?;
    }

    let _ = GameEngine::with_redb(db_path)?;
    println!("Initialized empty database at {:?}", db_path);
    Ok(())
}

// =============================================================================
// SESSION COMMANDS
// =============================================================================

/// Create a game session.
pub fn cmd_new(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    session_id: &str,
    date: Option<NaiveDate>,
    max_guesses: u32,
) -> Result<(), DexleError> {
    let mut engine = load_engine(db_path, backend)?;
    let date = date.unwrap_or_else(today);

    let view = engine.create_session(session_id, date, max_guesses)?;
    render_view(&view, json_mode);
    Ok(())
}

/// Submit a guess to a session.
pub fn cmd_guess(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    session_id: &str,
    name: &str,
) -> Result<(), DexleError> {
    let mut engine = load_engine(db_path, backend)?;
    let view = engine.submit_guess(session_id, name)?;
    render_view(&view, json_mode);
    Ok(())
}

/// Show a session's history and feedback.
pub fn cmd_show(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    session_id: &str,
) -> Result<(), DexleError> {
    let engine = load_engine(db_path, backend)?;
    let view = engine.session_view(session_id)?;
    render_view(&view, json_mode);
    Ok(())
}

// =============================================================================
// RENDERING
// =============================================================================

fn verdict_mark(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Correct => "=",
        Verdict::Incorrect => "x",
    }
}

fn hint_mark(hint: OrdinalHint) -> &'static str {
    match hint {
        OrdinalHint::Correct => "=",
        OrdinalHint::TargetIsLower => "v",
        OrdinalHint::TargetIsHigher => "^",
    }
}

/// Print a session view as a feedback table or JSON.
fn render_view(view: &SessionView, json_mode: bool) {
    if json_mode {
        let json = api::SessionResponse::success(view);
        println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_default()
        );
        return;
    }

    let session = &view.session;
    let state = if session.won {
        "WON"
    } else if session.completed {
        "LOST"
    } else {
        "active"
    };
    println!(
        "Session {} [{}] - {}/{} guesses",
        session.id, state, session.guesses_made, session.max_guesses
    );
    println!();
    println!("  #  guess          type  type2 stage final color habitat gen");

    for entry in &view.guesses {
        let feedback = &entry.feedback;
        println!(
            "  {}  {:<14} {:<5} {:<5} {:<5} {:<5} {:<5} {:<7} {}",
            entry.sequence,
            entry.pokemon.name,
            verdict_mark(feedback.primary_type),
            verdict_mark(feedback.secondary_type),
            hint_mark(feedback.evolution_stage),
            verdict_mark(feedback.fully_evolved),
            verdict_mark(feedback.color),
            verdict_mark(feedback.habitat),
            hint_mark(feedback.generation),
        );
    }

    if let Some(target) = &view.target {
        println!();
        println!("The answer was: {}", target.name);
    } else {
        println!();
        println!("Keep guessing! (= match, x miss, ^ target higher, v target lower)");
    }
}
