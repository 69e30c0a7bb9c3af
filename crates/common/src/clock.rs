//! Wall-clock helpers
//!
//! All persisted timestamps in the workspace are unix milliseconds stored as
//! `u64`. Lock expiries, error history entries and `last_used` all share this
//! resolution, so persisted rows round-trip without loss.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
