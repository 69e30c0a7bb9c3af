//! Pool tuning configuration
//!
//! Every knob the pool's policies depend on lives here rather than in
//! constants: the cooldown curve, the failure threshold and retention window
//! behind automatic disabling, the priority weights per failure kind, and the
//! selection grace window. Loadable from TOML with per-field defaults, so an
//! empty file is a valid configuration.

use std::path::Path;

use serde::Deserialize;

use roost_client::Outcome;

/// Tuning parameters for the account pool.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// Base cooldown applied on the first recent rate limit.
    #[serde(default = "default_cooldown_base_secs")]
    pub cooldown_base_secs: u64,
    /// Exponent cap for the cooldown curve: `base * 2^min(n, cap)`.
    #[serde(default = "default_cooldown_cap_exp")]
    pub cooldown_cap_exp: u32,
    /// How long error-history entries count toward thresholds and backoff.
    #[serde(default = "default_retention_window_secs")]
    pub retention_window_secs: u64,
    /// Failures within the retention window that disable an account.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: usize,
    /// Hard cap on stored error-history entries per account.
    #[serde(default = "default_error_history_cap")]
    pub error_history_cap: usize,
    /// Ceiling for `reactivation_priority`.
    #[serde(default = "default_priority_cap")]
    pub priority_cap: u32,
    /// Priority bump for a credential rejection.
    #[serde(default = "default_auth_failure_weight")]
    pub auth_failure_weight: u32,
    /// Priority bump for an external rate limit.
    #[serde(default = "default_rate_limit_weight")]
    pub rate_limit_weight: u32,
    /// Priority bump for a transport failure (not attributable to the
    /// account, so the smallest weight).
    #[serde(default = "default_network_error_weight")]
    pub network_error_weight: u32,
    /// How long a selected account stays reserved for its group before an
    /// abandoned reservation lapses.
    #[serde(default = "default_grace_window_secs")]
    pub grace_window_secs: u64,
}

fn default_cooldown_base_secs() -> u64 {
    30
}

fn default_cooldown_cap_exp() -> u32 {
    6
}

fn default_retention_window_secs() -> u64 {
    3600
}

fn default_failure_threshold() -> usize {
    5
}

fn default_error_history_cap() -> usize {
    100
}

fn default_priority_cap() -> u32 {
    100
}

fn default_auth_failure_weight() -> u32 {
    4
}

fn default_rate_limit_weight() -> u32 {
    2
}

fn default_network_error_weight() -> u32 {
    1
}

fn default_grace_window_secs() -> u64 {
    30
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            cooldown_base_secs: default_cooldown_base_secs(),
            cooldown_cap_exp: default_cooldown_cap_exp(),
            retention_window_secs: default_retention_window_secs(),
            failure_threshold: default_failure_threshold(),
            error_history_cap: default_error_history_cap(),
            priority_cap: default_priority_cap(),
            auth_failure_weight: default_auth_failure_weight(),
            rate_limit_weight: default_rate_limit_weight(),
            network_error_weight: default_network_error_weight(),
            grace_window_secs: default_grace_window_secs(),
        }
    }
}

impl PoolConfig {
    /// Load from a TOML file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pool cannot operate under.
    pub fn validate(&self) -> common::Result<()> {
        if self.failure_threshold == 0 {
            return Err(common::Error::Config(
                "failure_threshold must be at least 1".into(),
            ));
        }
        if self.retention_window_secs == 0 {
            return Err(common::Error::Config(
                "retention_window_secs must be positive".into(),
            ));
        }
        if self.grace_window_secs == 0 {
            return Err(common::Error::Config(
                "grace_window_secs must be positive".into(),
            ));
        }
        if self.cooldown_cap_exp >= 32 {
            return Err(common::Error::Config(
                "cooldown_cap_exp must be below 32".into(),
            ));
        }
        if self.auth_failure_weight == 0
            || self.rate_limit_weight == 0
            || self.network_error_weight == 0
        {
            return Err(common::Error::Config(
                "priority weights must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Priority bump for a reported outcome. Success and a missing target
    /// entity carry no blame.
    pub fn weight(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::AuthFailed => self.auth_failure_weight,
            Outcome::RateLimited => self.rate_limit_weight,
            Outcome::NetworkError => self.network_error_weight,
            Outcome::Success | Outcome::NotFound => 0,
        }
    }

    pub fn retention_window_ms(&self) -> u64 {
        self.retention_window_secs * 1000
    }

    pub fn grace_window_ms(&self) -> u64 {
        self.grace_window_secs * 1000
    }
}
