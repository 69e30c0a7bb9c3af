//! Per-group cooldown locks
//!
//! A lock is an entry in the account's `locks` map: endpoint group → unix
//! millisecond at which the account becomes usable for that group again.
//! Locks are scoped per (account, group); an account locked for "search"
//! stays usable for "timeline", because the upstream rate-limit windows are
//! independent per group. An expiry at or before "now" is equivalent to no
//! lock at all.

use roost_store::Account;

use crate::config::PoolConfig;

/// Whether the account is cooling down for a group. True only when a stored
/// expiry exists and is strictly after `now_ms`.
pub fn is_locked(account: &Account, group: &str, now_ms: u64) -> bool {
    account
        .locks
        .get(group)
        .is_some_and(|until| *until > now_ms)
}

/// Set or overwrite the cooldown expiry for a group.
pub fn lock(account: &mut Account, group: &str, until_ms: u64) {
    account.locks.insert(group.to_string(), until_ms);
}

/// Remove the cooldown entry for a group.
pub fn clear(account: &mut Account, group: &str) {
    account.locks.remove(group);
}

/// Cooldown length for an account with `recent_errors` failures inside the
/// retention window: `base * 2^min(n, cap)`. Non-decreasing in the error
/// count, capped so repeated throttling cannot push an account out for days.
/// Saturates at `u64::MAX` for extreme configured bases rather than wrapping.
pub fn cooldown_ms(recent_errors: usize, config: &PoolConfig) -> u64 {
    let exp = (recent_errors as u32).min(config.cooldown_cap_exp).min(63);
    config
        .cooldown_base_secs
        .saturating_mul(1000)
        .checked_mul(1u64 << exp)
        .unwrap_or(u64::MAX)
}
