//! # Bearer-Key Authentication
//!
//! Gate for everything that can touch game state. When `DEXLE_API_KEY`
//! is set, session creation, guessing, session views, and target
//! scheduling all require `Authorization: Bearer <key>`.
//!
//! The unauthenticated surface is exactly the endpoints that leak no
//! session or target data: `/health` for load balancer probes and
//! `/status` for dashboards polling catalog and session counts.
//!
//! When `DEXLE_API_KEY` is unset the gate is open. That mode exists for
//! local play; the router logs a warning at startup.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// Paths served without a key. Nothing here reveals a target, a guess
/// history, or a per-player record.
const PUBLIC_PATHS: &[&str] = &["/health", "/status"];

/// Get API key from environment variable.
///
/// Returns `Some(key)` if `DEXLE_API_KEY` is set and non-empty,
/// `None` otherwise (disabling authentication).
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("DEXLE_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Constant-time key comparison.
///
/// Both keys are padded to a common length and compared over every byte,
/// so the comparison cost does not depend on where a mismatch occurs.
/// The length check happens after the scan for the same reason.
fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let max_len = provided.len().max(expected.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided.len()].copy_from_slice(provided);
    padded_expected[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided.len() == expected.len()
}

/// API key authentication middleware.
///
/// Accepts `Authorization: Bearer <key>` as well as the raw key.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    if is_public(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v));

    let authorized = match provided {
        Some(key) => keys_match(key, &expected),
        None => {
            tracing::warn!(
                path = %request.uri().path(),
                "rejected request without an api key"
            );
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
        }
    };

    if authorized {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            path = %request.uri().path(),
            "rejected request with an invalid api key"
        );
        Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_key_empty_returns_none() {
        // Clear the env var if set
        // SAFETY: This is a unit test running in isolation.
        unsafe { std::env::remove_var("DEXLE_API_KEY") };
        assert!(get_api_key_from_env().is_none());
    }

    #[test]
    fn test_public_surface_is_health_and_status_only() {
        assert!(is_public("/health"));
        assert!(is_public("/status"));
        assert!(!is_public("/session"));
        assert!(!is_public("/session/alice"));
        assert!(!is_public("/guess"));
        assert!(!is_public("/target"));
    }

    #[test]
    fn test_keys_match_exact() {
        assert!(keys_match("secret", "secret"));
    }

    #[test]
    fn test_keys_match_rejects_wrong_key() {
        assert!(!keys_match("secret", "hunter2"));
    }

    #[test]
    fn test_keys_match_rejects_prefix_and_extension() {
        // Same prefix, different length: the padded scan alone would pass.
        assert!(!keys_match("secret", "secret-longer"));
        assert!(!keys_match("sec", "secret"));
        assert!(!keys_match("", "secret"));
    }
}
