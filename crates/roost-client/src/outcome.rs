//! Outcome classification for reported requests
//!
//! The caller observes the raw response and classifies it into an
//! [`Outcome`]; the pool only records the classification. `RateLimited` and
//! `AuthFailed` are attributable to the account, `NetworkError` is not, and
//! `NotFound` means the *requested entity* was missing while the account
//! itself behaved.

/// Classification of a single request outcome, as reported to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Request succeeded; clears the group lock and decays priority.
    Success,
    /// External throttling; bounded cooldown for the group.
    RateLimited,
    /// Credentials rejected; account is disabled until external reactivation.
    AuthFailed,
    /// Transport-level failure, not attributable to the account.
    NetworkError,
    /// The requested entity does not exist (e.g. deleted user); counted in
    /// stats only.
    NotFound,
}

impl Outcome {
    /// Outcome label for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::RateLimited => "rate_limited",
            Outcome::AuthFailed => "auth_failed",
            Outcome::NetworkError => "network_error",
            Outcome::NotFound => "not_found",
        }
    }
}

/// Rate-limit phrases that appear in 2xx-coded error envelopes. The API
/// sometimes reports throttling inside a successful HTTP response.
const RATE_LIMIT_PATTERNS: &[&str] = &["rate limit exceeded", "over capacity"];

/// Classify an HTTP status and response body into an [`Outcome`].
///
/// 429 is throttling, 401/403 are credential rejections, 404 is a missing
/// entity, 408 and 5xx are transport trouble. 2xx responses are scanned for
/// rate-limit phrasing in the body before being treated as success. Anything
/// else is treated as a network-class failure: unattributable to the account.
pub fn classify_status(status: u16, body: &str) -> Outcome {
    match status {
        429 => Outcome::RateLimited,
        401 | 403 => Outcome::AuthFailed,
        404 => Outcome::NotFound,
        408 | 500..=599 => Outcome::NetworkError,
        200..=299 => {
            let lower = body.to_lowercase();
            if RATE_LIMIT_PATTERNS.iter().any(|p| lower.contains(p)) {
                Outcome::RateLimited
            } else {
                Outcome::Success
            }
        }
        _ => Outcome::NetworkError,
    }
}
