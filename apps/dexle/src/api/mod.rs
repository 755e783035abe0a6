//! # Dexle HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /session` - Create a session for a daily puzzle
//! - `POST /guess` - Submit a guess
//! - `GET /session/{id}` - Get a session view with full history
//! - `POST /target` - Schedule a daily target
//! - `GET /status` - Get server status
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `DEXLE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `DEXLE_RATE_LIMIT`: General requests per second (default: 100, 0 to disable)
//! - `DEXLE_GUESS_RATE_LIMIT`: Guess submissions per second (default: 20)
//! - `DEXLE_API_KEY`: If set, requires Bearer token authentication for
//!   everything except `/health` and `/status`

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{ApiRateLimiter, get_guess_rate_limit_from_env, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `dexle::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    create_session_handler, guess_handler, health_handler, session_handler, status_handler,
    target_handler,
};
#[allow(unused_imports)]
pub use types::{
    CreateSessionRequest, GuessJson, GuessRequest, HealthResponse, SessionJson, SessionResponse,
    SetTargetRequest, SetTargetResponse, StatusResponse, TargetJson,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use dexle_core::{DexleError, GameEngine};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the game engine.
#[derive(Clone)]
pub struct AppState {
    /// The engine owning the storage capability. The RwLock serializes
    /// guess admission; reads of session views proceed concurrently.
    pub engine: Arc<RwLock<GameEngine>>,
}

impl AppState {
    /// Create new app state with an engine.
    #[must_use]
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `DEXLE_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("DEXLE_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (DEXLE_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            // Parse comma-separated origins
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in DEXLE_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No DEXLE_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        let guess_limit = get_guess_rate_limit_from_env();
        tracing::info!(
            "Rate limiting enabled: {} requests/second general, {} guesses/second",
            rate_limit,
            guess_limit
        );
        Some(ApiRateLimiter::new(rate_limit, guess_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set DEXLE_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/session", post(handlers::create_session_handler))
        .route("/session/{id}", get(handlers::session_handler))
        .route("/guess", post(handlers::guess_handler))
        .route("/target", post(handlers::target_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, engine: GameEngine) -> Result<(), DexleError> {
    let state = AppState::new(engine);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DexleError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Dexle HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| DexleError::IoError(format!("Server error: {}", e)))
}
