//! Tracing subscriber installation
//!
//! One process-wide subscriber, installed at most once. Verbosity comes from
//! `ROOST_LOG_LEVEL`, with `RUST_LOG` taking precedence when set so standard
//! tracing filter syntax still works.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::ProcessEnv;

/// Install the global tracing subscriber. Safe to call more than once; only
/// the first call installs anything.
pub fn init() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&ProcessEnv::global().log_level));
        // try_init: another subscriber may already be installed (tests)
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
