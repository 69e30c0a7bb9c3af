//! Account pool for a rate-limited, authentication-gated API
//!
//! Manages a shared pool of scraper accounts with load-balanced selection,
//! per-(account, endpoint-group) cooldown locks, and priority-weighted
//! reactivation. The [`roost_store::AccountStore`] is the single source of
//! truth; the pool reads rows at selection time and applies every reported
//! outcome as one atomic row update.
//!
//! Account lifecycle:
//! 1. Account provisioned into the store → `active`, no locks
//! 2. Caller selects an account for group Q → reserved for a grace window,
//!    `last_used` refreshed
//! 3. Caller issues the request itself (the pool performs no network I/O)
//!    and reports the classified outcome
//! 4. Rate limit → cooldown lock for Q sized by the recent error count
//! 5. Credential rejection, or too many failures inside the retention
//!    window → account disabled until external reactivation
//! 6. Cooldown expiry or `set_active(true)` → account selectable again

pub mod config;
pub mod error;
pub mod locks;
pub mod pool;
pub mod reactivation;

pub use config::PoolConfig;
pub use error::{Error, Result};
pub use pool::AccountPool;
