//! Process environment snapshot
//!
//! The two environment knobs the workspace consumes (`ROOST_PROXY` and
//! `ROOST_LOG_LEVEL`) are read once at process start and cached. Components
//! take the snapshot (or individual values) instead of reaching into
//! `std::env` at call sites, so behavior cannot change mid-process.

use std::sync::OnceLock;

/// Environment variable holding the process-wide proxy override.
pub const PROXY_ENV: &str = "ROOST_PROXY";

/// Environment variable holding the log verbosity level.
pub const LOG_LEVEL_ENV: &str = "ROOST_LOG_LEVEL";

/// Values read from the process environment at startup.
#[derive(Debug, Clone)]
pub struct ProcessEnv {
    /// Process-wide proxy override, between the per-call override and the
    /// account-level proxy in resolution order.
    pub proxy: Option<String>,
    /// Log verbosity (`trace`..`error`), defaults to `info`.
    pub log_level: String,
}

impl ProcessEnv {
    /// Read the environment directly, bypassing the cache. Used by tests and
    /// by [`ProcessEnv::global`] for the first read.
    pub fn from_process() -> Self {
        Self {
            proxy: non_empty(std::env::var(PROXY_ENV).ok()),
            log_level: non_empty(std::env::var(LOG_LEVEL_ENV).ok())
                .unwrap_or_else(|| "info".to_string()),
        }
    }

    /// The cached process-wide snapshot, read on first access.
    pub fn global() -> &'static Self {
        static ENV: OnceLock<ProcessEnv> = OnceLock::new();
        ENV.get_or_init(Self::from_process)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
