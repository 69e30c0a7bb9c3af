//! The persisted account record
//!
//! All timestamps are unix milliseconds (`u64`), which round-trip through the
//! persisted JSON form exactly. Map-typed fields default to empty on both
//! construction and deserialization, so rows written by older versions load
//! cleanly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One authenticated scraper identity.
///
/// `username` is the unique key. `locks` maps an endpoint-group name to the
/// unix-millisecond time at which the account becomes usable for that group
/// again; an entry at or before "now" is equivalent to no entry. `stats`
/// counts cumulative requests per group. `error_history` is an ascending list
/// of failure timestamps, bounded by the pool's retention window and history
/// cap. `reactivation_priority` grows with consecutive failures and decays on
/// success; higher means more urgent to retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub email: String,
    pub email_password: String,
    pub user_agent: String,
    pub active: bool,
    #[serde(default)]
    pub locks: HashMap<String, u64>,
    #[serde(default)]
    pub stats: HashMap<String, u64>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub cookies: HashMap<String, String>,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub last_used: Option<u64>,
    #[serde(default)]
    pub error_history: Vec<u64>,
    #[serde(default)]
    pub reactivation_priority: u32,
}

impl Account {
    /// Create an active account with fresh, empty session state. Each call
    /// produces its own maps; nothing is shared between instances.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        email_password: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            email_password: email_password.into(),
            user_agent: user_agent.into(),
            active: true,
            locks: HashMap::new(),
            stats: HashMap::new(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            proxy: None,
            error_msg: None,
            last_used: None,
            error_history: Vec::new(),
            reactivation_priority: 0,
        }
    }

    /// Cumulative requests recorded for an endpoint group.
    pub fn requests_for(&self, group: &str) -> u64 {
        self.stats.get(group).copied().unwrap_or(0)
    }
}
