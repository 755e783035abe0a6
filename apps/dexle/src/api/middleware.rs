//! # Request Throttling
//!
//! Two token buckets guard the API. A general per-second budget covers
//! the whole surface; `/guess` gets a separate, tighter bucket because
//! guess submission is the endpoint worth scripting against: seven
//! feedback fields narrow the catalog quickly, so a bot that can guess
//! fast can solve every daily puzzle by brute force.
//!
//! ## Configuration
//!
//! - `DEXLE_RATE_LIMIT`: general requests per second (default: 100,
//!   0 disables throttling entirely)
//! - `DEXLE_GUESS_RATE_LIMIT`: guess submissions per second (default: 20)

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Default general budget: 100 requests per second.
const DEFAULT_RPS: NonZeroU32 = NonZeroU32::new(100).unwrap();

/// Default guess budget: 20 submissions per second.
const DEFAULT_GUESS_RPS: NonZeroU32 = NonZeroU32::new(20).unwrap();

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

// =============================================================================
// RATE LIMITER
// =============================================================================

/// Path-aware rate limiter for the game API.
pub struct ApiRateLimiter {
    /// Budget for everything except guess submission.
    general: DirectLimiter,
    /// Separate, tighter budget for `/guess`.
    guesses: DirectLimiter,
}

impl ApiRateLimiter {
    /// Build a limiter with the given per-second budgets.
    ///
    /// A zero budget falls back to the corresponding default; disabling
    /// throttling is the router's decision, not the limiter's.
    #[must_use]
    pub fn new(general_rps: u32, guess_rps: u32) -> Arc<Self> {
        let general = NonZeroU32::new(general_rps).unwrap_or(DEFAULT_RPS);
        let guesses = NonZeroU32::new(guess_rps).unwrap_or(DEFAULT_GUESS_RPS);
        Arc::new(Self {
            general: RateLimiter::direct(Quota::per_second(general)),
            guesses: RateLimiter::direct(Quota::per_second(guesses)),
        })
    }

    /// Whether a request for `path` fits the current budget.
    fn allow(&self, path: &str) -> bool {
        let bucket = if path == "/guess" {
            &self.guesses
        } else {
            &self.general
        };
        bucket.check().is_ok()
    }
}

/// Get the general rate limit from the environment.
///
/// Returns the value of `DEXLE_RATE_LIMIT` or 100 if not set.
pub fn get_rate_limit_from_env() -> u32 {
    std::env::var("DEXLE_RATE_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100)
}

/// Get the guess-submission rate limit from the environment.
///
/// Returns the value of `DEXLE_GUESS_RATE_LIMIT` or 20 if not set.
pub fn get_guess_rate_limit_from_env() -> u32 {
    std::env::var("DEXLE_GUESS_RATE_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(20)
}

/// Rate limiting middleware.
///
/// Returns 429 Too Many Requests when the path's budget is exhausted.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<ApiRateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if limiter.allow(request.uri().path()) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "rate limit exceeded");
        Err((StatusCode::TOO_MANY_REQUESTS, "Too Many Requests"))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_budget_admits_first_request() {
        let limiter = ApiRateLimiter::new(50, 20);
        assert!(limiter.allow("/status"));
    }

    #[test]
    fn test_zero_budgets_fall_back_to_defaults() {
        let limiter = ApiRateLimiter::new(0, 0);
        assert!(limiter.allow("/status"));
        assert!(limiter.allow("/guess"));
    }

    #[test]
    fn test_guess_bucket_is_independent_of_general() {
        // One guess per second: the second submission is rejected while
        // the general surface keeps serving.
        let limiter = ApiRateLimiter::new(100, 1);
        assert!(limiter.allow("/guess"));
        assert!(!limiter.allow("/guess"));
        assert!(limiter.allow("/status"));
        assert!(limiter.allow("/session/alice"));
    }

    #[test]
    fn test_general_exhaustion_leaves_guess_bucket_intact() {
        let limiter = ApiRateLimiter::new(1, 100);
        assert!(limiter.allow("/status"));
        assert!(!limiter.allow("/status"));
        assert!(limiter.allow("/guess"));
    }
}
