//! Failure history and reactivation priority
//!
//! Round-robin retry wastes budget hammering permanently broken accounts.
//! Instead every failure raises the account's `reactivation_priority` by a
//! weight that depends on the failure kind, and sustained success decays it
//! back toward zero. The priority ranks which blocked accounts deserve a
//! retry first; ties are broken randomly so equal-priority accounts cannot
//! starve each other.

use std::cmp::Reverse;

use roost_store::Account;
use roost_client::Outcome;
use tracing::warn;

use crate::config::PoolConfig;

/// Current reactivation score. Higher means more urgent to retry.
pub fn priority(account: &Account) -> u32 {
    account.reactivation_priority
}

/// Failures recorded within the retention window ending at `now_ms`.
pub fn recent_failures(account: &Account, config: &PoolConfig, now_ms: u64) -> usize {
    let cutoff = now_ms.saturating_sub(config.retention_window_ms());
    account
        .error_history
        .iter()
        .filter(|ts| **ts > cutoff)
        .count()
}

/// Record a failed request: append to the error history (bounded by the
/// history cap), raise the priority by the outcome's weight (saturating at
/// the cap), and disable the account when the retention window holds
/// `failure_threshold` failures. The disable trip fires at most once; an
/// already-inactive account just accumulates history.
pub fn record_failure(account: &mut Account, outcome: Outcome, config: &PoolConfig, now_ms: u64) {
    account.error_history.push(now_ms);
    if account.error_history.len() > config.error_history_cap {
        let excess = account.error_history.len() - config.error_history_cap;
        account.error_history.drain(..excess);
    }

    account.reactivation_priority = account
        .reactivation_priority
        .saturating_add(config.weight(outcome))
        .min(config.priority_cap);

    if account.active && recent_failures(account, config, now_ms) >= config.failure_threshold {
        account.active = false;
        warn!(
            username = %account.username,
            threshold = config.failure_threshold,
            "failure threshold reached, disabling account"
        );
    }
}

/// Record a successful request: halve the priority and drop history entries
/// that have aged out of the retention window.
pub fn record_success(account: &mut Account, config: &PoolConfig, now_ms: u64) {
    account.reactivation_priority /= 2;
    let cutoff = now_ms.saturating_sub(config.retention_window_ms());
    account.error_history.retain(|ts| *ts > cutoff);
}

/// Order accounts for reactivation attempts: highest priority first, equal
/// priorities in random order. The randomized tie-break is what keeps
/// low-priority accounts from being starved indefinitely.
pub fn reactivation_order(accounts: Vec<Account>) -> Vec<Account> {
    let mut keyed: Vec<(Reverse<u32>, u64, Account)> = accounts
        .into_iter()
        .map(|a| (Reverse(priority(&a)), rand::random::<u64>(), a))
        .collect();
    keyed.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    keyed.into_iter().map(|(_, _, a)| a).collect()
}
