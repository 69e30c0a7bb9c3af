//! Account selection and outcome reporting
//!
//! The pool answers "give me an account usable for endpoint group Q". It
//! filters the store to active accounts not cooling down for the group,
//! prefers the least-loaded and healthiest candidate, and reserves the
//! winner for a short grace window so concurrent selectors for the same
//! group cannot double-allocate one slot. Callers report the classified
//! outcome back; the pool applies it to the row as a single atomic update.
//!
//! Nothing here performs network I/O and nothing blocks beyond the row and
//! reservation locks: when no account is eligible, `select` returns
//! `Unavailable` immediately and the caller backs off.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use roost_client::Outcome;
use roost_store::{Account, AccountStore};
use tokio::sync::Mutex;
use tracing::{debug, info};

use common::now_ms;

use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::{locks, reactivation};

/// Shared pool over an account store.
pub struct AccountPool {
    store: Arc<AccountStore>,
    config: PoolConfig,
    /// (username, group) → reservation expiry in unix ms. Entries lapse at
    /// expiry and are dropped lazily during the next selection scan.
    reservations: Mutex<HashMap<(String, String), u64>>,
}

impl AccountPool {
    pub fn new(store: Arc<AccountStore>, config: PoolConfig) -> Self {
        Self {
            store,
            config,
            reservations: Mutex::new(HashMap::new()),
        }
    }

    /// Select the best available account for an endpoint group.
    ///
    /// See [`AccountPool::select_at`]; this variant uses the wall clock.
    pub async fn select(&self, group: &str) -> Result<Account> {
        self.select_at(group, now_ms()).await
    }

    /// Select the best available account for `group` as of `now_ms`.
    ///
    /// Candidates are active accounts neither locked nor reserved for the
    /// group. The winner is the candidate with the fewest requests recorded
    /// for the group, ties broken by lowest reactivation priority, then by
    /// earliest `last_used` (never-used first). The winner is reserved for
    /// the grace window before the reservation lock is released, which makes
    /// selection atomic with respect to concurrent selectors.
    pub async fn select_at(&self, group: &str, now_ms: u64) -> Result<Account> {
        let accounts = self.store.list().await;

        let mut reservations = self.reservations.lock().await;
        reservations.retain(|_, until| *until > now_ms);

        let chosen = accounts
            .iter()
            .filter(|a| {
                a.active
                    && !locks::is_locked(a, group, now_ms)
                    && !reservations.contains_key(&(a.username.clone(), group.to_string()))
            })
            .min_by_key(|a| {
                (
                    a.requests_for(group),
                    reactivation::priority(a),
                    a.last_used.unwrap_or(0),
                )
            });

        let Some(chosen) = chosen else {
            let message = self.unavailable_message(&accounts, &reservations, group, now_ms);
            drop(reservations);
            counter!("roost_pool_unavailable_total", "group" => group.to_string()).increment(1);
            debug!(group, "no account available");
            return Err(Error::Unavailable(message));
        };

        let username = chosen.username.clone();
        reservations.insert(
            (username.clone(), group.to_string()),
            now_ms + self.config.grace_window_ms(),
        );
        drop(reservations);

        counter!("roost_pool_selections_total", "group" => group.to_string()).increment(1);
        debug!(username = %username, group, "selected account");
        self.store
            .update(&username, |a| a.last_used = Some(now_ms))
            .await
            .map_err(Error::from_store)
    }

    /// Report a classified request outcome for an account and group.
    ///
    /// See [`AccountPool::report_at`]; this variant uses the wall clock.
    pub async fn report(&self, username: &str, group: &str, outcome: Outcome) -> Result<Account> {
        self.report_at(username, group, outcome, now_ms()).await
    }

    /// Apply a classified outcome as one atomic update to the account row.
    ///
    /// Every outcome releases the caller's reservation, bumps the group's
    /// request count and refreshes `last_used`. Success clears the group
    /// lock and decays the reactivation priority; a rate limit starts a
    /// cooldown sized by the recent error count; a credential rejection
    /// disables the account until external reactivation; a network error is
    /// recorded with the smallest priority weight and no lock, since it is
    /// not the account's fault; a missing target entity is stats-only.
    pub async fn report_at(
        &self,
        username: &str,
        group: &str,
        outcome: Outcome,
        now_ms: u64,
    ) -> Result<Account> {
        self.release(username, group).await;

        let updated = self
            .store
            .update(username, |a| {
                *a.stats.entry(group.to_string()).or_insert(0) += 1;
                a.last_used = Some(now_ms);
                match outcome {
                    Outcome::Success => {
                        locks::clear(a, group);
                        reactivation::record_success(a, &self.config, now_ms);
                        a.error_msg = None;
                    }
                    Outcome::RateLimited => {
                        reactivation::record_failure(a, outcome, &self.config, now_ms);
                        let recent = reactivation::recent_failures(a, &self.config, now_ms);
                        locks::lock(a, group, now_ms + locks::cooldown_ms(recent, &self.config));
                        a.error_msg = Some(format!("rate limited on {group}"));
                    }
                    Outcome::AuthFailed => {
                        reactivation::record_failure(a, outcome, &self.config, now_ms);
                        a.active = false;
                        a.error_msg = Some("credentials rejected by upstream".to_string());
                    }
                    Outcome::NetworkError => {
                        reactivation::record_failure(a, outcome, &self.config, now_ms);
                    }
                    Outcome::NotFound => {}
                }
            })
            .await
            .map_err(Error::from_store)?;

        counter!(
            "roost_pool_outcomes_total",
            "group" => group.to_string(),
            "outcome" => outcome.label()
        )
        .increment(1);
        debug!(username, group, outcome = outcome.label(), "recorded outcome");
        Ok(updated)
    }

    /// Release a reservation without reporting an outcome. The cancellation
    /// path for callers that abandon a request after selecting.
    pub async fn release(&self, username: &str, group: &str) {
        let mut reservations = self.reservations.lock().await;
        if reservations
            .remove(&(username.to_string(), group.to_string()))
            .is_some()
        {
            debug!(username, group, "released reservation");
        }
    }

    /// Manually cool an account down for a group until `until_ms`.
    pub async fn lock_until(&self, username: &str, group: &str, until_ms: u64) -> Result<Account> {
        self.store
            .update(username, |a| locks::lock(a, group, until_ms))
            .await
            .map_err(Error::from_store)
    }

    /// Manually clear the cooldown for a group.
    pub async fn unlock(&self, username: &str, group: &str) -> Result<Account> {
        self.store
            .update(username, |a| locks::clear(a, group))
            .await
            .map_err(Error::from_store)
    }

    /// Clear every group cooldown on an account.
    pub async fn reset_locks(&self, username: &str) -> Result<Account> {
        self.store
            .update(username, |a| a.locks.clear())
            .await
            .map_err(Error::from_store)
    }

    /// Flip the active flag. This is the external reactivation action:
    /// enabling an account clears its error message and resets its
    /// reactivation priority.
    pub async fn set_active(&self, username: &str, active: bool) -> Result<Account> {
        let updated = self
            .store
            .update(username, |a| {
                a.active = active;
                if active {
                    a.error_msg = None;
                    a.reactivation_priority = 0;
                }
            })
            .await
            .map_err(Error::from_store)?;
        info!(username, active, "set account active flag");
        Ok(updated)
    }

    /// Accounts that cannot serve right now (inactive, or cooling down for
    /// any group), ordered by reactivation urgency. Consumed by the external
    /// reactivation tooling.
    pub async fn reactivation_queue(&self) -> Vec<Account> {
        let now = now_ms();
        let blocked: Vec<Account> = self
            .store
            .list()
            .await
            .into_iter()
            .filter(|a| !a.active || a.locks.values().any(|until| *until > now))
            .collect();
        reactivation::reactivation_order(blocked)
    }

    /// Group-independent pool health: per-state counts and an overall label.
    /// An account counts as cooling when any group lock is still running.
    /// All available → healthy, some → degraded, none → unhealthy.
    pub async fn health(&self) -> serde_json::Value {
        let now = now_ms();
        let accounts = self.store.list().await;

        let total = accounts.len();
        let mut inactive = 0usize;
        let mut cooling = 0usize;
        let mut available = 0usize;
        for a in &accounts {
            if !a.active {
                inactive += 1;
            } else if a.locks.values().any(|until| *until > now) {
                cooling += 1;
            } else {
                available += 1;
            }
        }

        serde_json::json!({
            "status": health_label(total, available),
            "accounts_total": total,
            "accounts_available": available,
            "accounts_cooling_down": cooling,
            "accounts_inactive": inactive,
        })
    }

    /// Pool health for an endpoint group as of the wall clock.
    ///
    /// See [`AccountPool::health_at`].
    pub async fn health_for(&self, group: &str) -> serde_json::Value {
        self.health_at(group, now_ms()).await
    }

    /// Pool health for an endpoint group as of `now_ms`: per-state counts
    /// and an overall label. All eligible → healthy, some → degraded, none
    /// → unhealthy.
    pub async fn health_at(&self, group: &str, now_ms: u64) -> serde_json::Value {
        let now = now_ms;
        let accounts = self.store.list().await;
        let reservations = self.reservations.lock().await;

        let total = accounts.len();
        let mut inactive = 0usize;
        let mut cooling = 0usize;
        let mut reserved = 0usize;
        let mut eligible = 0usize;
        for a in &accounts {
            if !a.active {
                inactive += 1;
            } else if locks::is_locked(a, group, now) {
                cooling += 1;
            } else if reservations
                .get(&(a.username.clone(), group.to_string()))
                .is_some_and(|until| *until > now)
            {
                reserved += 1;
            } else {
                eligible += 1;
            }
        }

        serde_json::json!({
            "status": health_label(total, eligible),
            "group": group,
            "accounts_total": total,
            "accounts_eligible": eligible,
            "accounts_cooling_down": cooling,
            "accounts_reserved": reserved,
            "accounts_inactive": inactive,
        })
    }

    fn unavailable_message(
        &self,
        accounts: &[Account],
        reservations: &HashMap<(String, String), u64>,
        group: &str,
        now_ms: u64,
    ) -> String {
        let mut inactive = 0usize;
        let mut cooling = 0usize;
        let mut reserved = 0usize;
        for a in accounts {
            if !a.active {
                inactive += 1;
            } else if locks::is_locked(a, group, now_ms) {
                cooling += 1;
            } else if reservations.contains_key(&(a.username.clone(), group.to_string())) {
                reserved += 1;
            }
        }
        serde_json::json!({
            "group": group,
            "accounts_total": accounts.len(),
            "accounts_cooling_down": cooling,
            "accounts_reserved": reserved,
            "accounts_inactive": inactive,
        })
        .to_string()
    }
}

/// Overall status label from serving capacity.
fn health_label(total: usize, serving: usize) -> &'static str {
    if total > 0 && serving == total {
        "healthy"
    } else if serving > 0 {
        "degraded"
    } else {
        "unhealthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_700_000_000_000;

    fn test_account(username: &str) -> Account {
        Account::new(
            username,
            "pw",
            format!("{username}@example.com"),
            "epw",
            "ua/1.0",
        )
    }

    fn test_config() -> PoolConfig {
        PoolConfig {
            failure_threshold: 3,
            ..PoolConfig::default()
        }
    }

    async fn pool_with(accounts: Vec<Account>) -> (tempfile::TempDir, AccountPool) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(AccountStore::open(dir.path()).await.unwrap());
        for account in accounts {
            store.upsert(account).await.unwrap();
        }
        (dir, AccountPool::new(store, test_config()))
    }

    #[tokio::test]
    async fn select_prefers_fewest_requests_for_group() {
        let a = test_account("a");
        let mut b = test_account("b");
        b.stats.insert("timeline".into(), 5);
        let (_dir, pool) = pool_with(vec![a, b]).await;

        let chosen = pool.select_at("timeline", T).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn select_breaks_ties_by_lowest_priority() {
        let mut a = test_account("a");
        a.reactivation_priority = 8;
        let b = test_account("b");
        let (_dir, pool) = pool_with(vec![a, b]).await;

        let chosen = pool.select_at("timeline", T).await.unwrap();
        assert_eq!(chosen.username, "b");
    }

    #[tokio::test]
    async fn select_breaks_remaining_ties_by_earliest_last_used() {
        let mut a = test_account("a");
        a.last_used = Some(T - 1000);
        let mut b = test_account("b");
        b.last_used = Some(T - 60_000);
        let (_dir, pool) = pool_with(vec![a, b]).await;

        let chosen = pool.select_at("timeline", T).await.unwrap();
        assert_eq!(chosen.username, "b");
    }

    #[tokio::test]
    async fn select_excludes_locked_accounts_until_expiry() {
        let mut a = test_account("a");
        a.locks.insert("timeline".into(), T + 60_000);
        let (_dir, pool) = pool_with(vec![a]).await;

        // Locked at T+10s
        assert!(matches!(
            pool.select_at("timeline", T + 10_000).await,
            Err(Error::Unavailable(_))
        ));
        // Eligible again at T+61s
        let chosen = pool.select_at("timeline", T + 61_000).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn lock_scopes_do_not_cross_groups() {
        let mut a = test_account("a");
        a.locks.insert("search".into(), T + 60_000);
        let (_dir, pool) = pool_with(vec![a]).await;

        let chosen = pool.select_at("timeline", T).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn select_never_returns_inactive_accounts() {
        let mut a = test_account("a");
        a.active = false;
        let (_dir, pool) = pool_with(vec![a]).await;

        assert!(matches!(
            pool.select_at("timeline", T).await,
            Err(Error::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn unavailable_carries_pool_counts() {
        let mut a = test_account("a");
        a.active = false;
        let mut b = test_account("b");
        b.locks.insert("timeline".into(), T + 60_000);
        let (_dir, pool) = pool_with(vec![a, b]).await;

        let err = pool.select_at("timeline", T).await.unwrap_err();
        let Error::Unavailable(message) = err else {
            panic!("expected Unavailable");
        };
        let counts: serde_json::Value = serde_json::from_str(&message).unwrap();
        assert_eq!(counts["accounts_total"], 2);
        assert_eq!(counts["accounts_inactive"], 1);
        assert_eq!(counts["accounts_cooling_down"], 1);
    }

    #[tokio::test]
    async fn selection_updates_last_used() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;
        let chosen = pool.select_at("timeline", T).await.unwrap();
        assert_eq!(chosen.last_used, Some(T));
    }

    #[tokio::test]
    async fn reservation_prevents_double_allocation() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        let first = pool.select_at("timeline", T).await.unwrap();
        assert_eq!(first.username, "a");
        // Same instant, same group: the one slot is reserved
        assert!(matches!(
            pool.select_at("timeline", T).await,
            Err(Error::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn reservation_is_per_group() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        pool.select_at("timeline", T).await.unwrap();
        // Other groups are unaffected by the timeline reservation
        let chosen = pool.select_at("search", T).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn reservation_lapses_after_grace_window() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;
        let grace = test_config().grace_window_ms();

        pool.select_at("timeline", T).await.unwrap();
        let chosen = pool.select_at("timeline", T + grace + 1).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn release_frees_the_slot_immediately() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        pool.select_at("timeline", T).await.unwrap();
        pool.release("a", "timeline").await;
        let chosen = pool.select_at("timeline", T).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn report_releases_the_reservation() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        pool.select_at("timeline", T).await.unwrap();
        pool.report_at("a", "timeline", Outcome::Success, T + 100)
            .await
            .unwrap();
        let chosen = pool.select_at("timeline", T + 200).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn every_outcome_counts_toward_stats() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        for (i, outcome) in [
            Outcome::Success,
            Outcome::RateLimited,
            Outcome::NetworkError,
            Outcome::NotFound,
        ]
        .into_iter()
        .enumerate()
        {
            pool.report_at("a", "search", outcome, T + i as u64).await.unwrap();
        }
        let account = pool
            .report_at("a", "search", Outcome::Success, T + 10)
            .await
            .unwrap();
        assert_eq!(account.requests_for("search"), 5);
    }

    #[tokio::test]
    async fn rate_limit_locks_the_group_with_backoff() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;
        let config = test_config();

        let account = pool
            .report_at("a", "search", Outcome::RateLimited, T)
            .await
            .unwrap();
        let until = account.locks["search"];
        // One recent error: base * 2^1
        assert_eq!(until, T + 2 * config.cooldown_base_secs * 1000);
        assert!(locks::is_locked(&account, "search", T));
        assert!(!locks::is_locked(&account, "timeline", T));
        assert!(account.error_msg.is_some());
    }

    #[tokio::test]
    async fn repeated_rate_limits_lengthen_the_cooldown() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        let first = pool
            .report_at("a", "search", Outcome::RateLimited, T)
            .await
            .unwrap();
        let second = pool
            .report_at("a", "search", Outcome::RateLimited, T + 1000)
            .await
            .unwrap();
        let first_len = first.locks["search"] - T;
        let second_len = second.locks["search"] - (T + 1000);
        assert!(second_len > first_len);
    }

    #[tokio::test]
    async fn success_clears_lock_and_error() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        pool.report_at("a", "search", Outcome::RateLimited, T)
            .await
            .unwrap();
        let account = pool
            .report_at("a", "search", Outcome::Success, T + 1000)
            .await
            .unwrap();
        assert!(!account.locks.contains_key("search"));
        assert_eq!(account.error_msg, None);
    }

    #[tokio::test]
    async fn auth_failure_disables_the_account() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        let account = pool
            .report_at("a", "search", Outcome::AuthFailed, T)
            .await
            .unwrap();
        assert!(!account.active);
        assert!(account.error_msg.is_some());
        assert!(matches!(
            pool.select_at("search", T + 1).await,
            Err(Error::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn three_rate_limits_at_threshold_three_disable() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        let first = pool
            .report_at("a", "search", Outcome::RateLimited, T)
            .await
            .unwrap();
        assert!(first.active);
        let second = pool
            .report_at("a", "search", Outcome::RateLimited, T + 1000)
            .await
            .unwrap();
        assert!(second.active);
        let third = pool
            .report_at("a", "search", Outcome::RateLimited, T + 2000)
            .await
            .unwrap();
        assert!(!third.active, "third failure within the window must disable");
    }

    #[tokio::test]
    async fn network_error_records_without_locking() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        let account = pool
            .report_at("a", "search", Outcome::NetworkError, T)
            .await
            .unwrap();
        assert!(account.locks.is_empty());
        assert_eq!(account.error_history.len(), 1);
        assert_eq!(
            account.reactivation_priority,
            test_config().network_error_weight
        );
    }

    #[tokio::test]
    async fn not_found_outcome_is_stats_only() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        let account = pool
            .report_at("a", "search", Outcome::NotFound, T)
            .await
            .unwrap();
        assert_eq!(account.requests_for("search"), 1);
        assert!(account.error_history.is_empty());
        assert_eq!(account.reactivation_priority, 0);
        assert!(account.active);
    }

    #[tokio::test]
    async fn report_for_unknown_account_is_not_found() {
        let (_dir, pool) = pool_with(vec![]).await;
        assert!(matches!(
            pool.report_at("ghost", "search", Outcome::Success, T).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn set_active_reenables_and_resets_priority() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        pool.report_at("a", "search", Outcome::AuthFailed, T)
            .await
            .unwrap();
        let account = pool.set_active("a", true).await.unwrap();
        assert!(account.active);
        assert_eq!(account.reactivation_priority, 0);
        assert_eq!(account.error_msg, None);

        let chosen = pool.select_at("search", T + 1000).await.unwrap();
        assert_eq!(chosen.username, "a");
    }

    #[tokio::test]
    async fn manual_lock_and_unlock() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;

        pool.lock_until("a", "search", T + 60_000).await.unwrap();
        assert!(matches!(
            pool.select_at("search", T).await,
            Err(Error::Unavailable(_))
        ));

        pool.unlock("a", "search").await.unwrap();
        assert_eq!(pool.select_at("search", T).await.unwrap().username, "a");
    }

    #[tokio::test]
    async fn reset_locks_clears_every_group() {
        let (_dir, pool) = pool_with(vec![test_account("a")]).await;
        pool.lock_until("a", "search", T + 60_000).await.unwrap();
        pool.lock_until("a", "timeline", T + 60_000).await.unwrap();

        let account = pool.reset_locks("a").await.unwrap();
        assert!(account.locks.is_empty());
    }

    #[tokio::test]
    async fn reactivation_queue_ranks_blocked_accounts() {
        let mut disabled = test_account("disabled");
        disabled.active = false;
        disabled.reactivation_priority = 9;
        let mut cooling = test_account("cooling");
        cooling.locks.insert("search".into(), now_ms() + 600_000);
        cooling.reactivation_priority = 2;
        let healthy = test_account("healthy");
        let (_dir, pool) = pool_with(vec![disabled, cooling, healthy]).await;

        let queue = pool.reactivation_queue().await;
        let names: Vec<&str> = queue.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["disabled", "cooling"]);
    }

    #[tokio::test]
    async fn health_reflects_pool_state() {
        let a = test_account("a");
        let mut b = test_account("b");
        b.active = false;
        let (_dir, pool) = pool_with(vec![a, b]).await;

        let health = pool.health_at("search", T).await;
        assert_eq!(health["status"], "degraded");
        assert_eq!(health["accounts_total"], 2);
        assert_eq!(health["accounts_eligible"], 1);
        assert_eq!(health["accounts_inactive"], 1);

        pool.report_at("a", "search", Outcome::AuthFailed, T + 100)
            .await
            .unwrap();
        let health = pool.health_at("search", T + 200).await;
        assert_eq!(health["status"], "unhealthy");
    }

    #[tokio::test]
    async fn health_at_counts_cooling_accounts_at_a_fixed_instant() {
        let mut a = test_account("a");
        a.locks.insert("search".into(), T + 60_000);
        let (_dir, pool) = pool_with(vec![a, test_account("b")]).await;

        let during = pool.health_at("search", T + 10_000).await;
        assert_eq!(during["status"], "degraded");
        assert_eq!(during["accounts_cooling_down"], 1);
        assert_eq!(during["accounts_eligible"], 1);

        let after = pool.health_at("search", T + 61_000).await;
        assert_eq!(after["status"], "healthy");
        assert_eq!(after["accounts_cooling_down"], 0);
    }

    #[tokio::test]
    async fn aggregate_health_spans_all_groups() {
        let mut cooling = test_account("cooling");
        cooling.locks.insert("search".into(), now_ms() + 600_000);
        let mut disabled = test_account("disabled");
        disabled.active = false;
        let (_dir, pool) = pool_with(vec![cooling, disabled, test_account("fresh")]).await;

        let health = pool.health().await;
        assert_eq!(health["status"], "degraded");
        assert_eq!(health["accounts_total"], 3);
        assert_eq!(health["accounts_available"], 1);
        assert_eq!(health["accounts_cooling_down"], 1);
        assert_eq!(health["accounts_inactive"], 1);
    }

    #[tokio::test]
    async fn aggregate_health_of_empty_pool_is_unhealthy() {
        let (_dir, pool) = pool_with(vec![]).await;
        let health = pool.health().await;
        assert_eq!(health["status"], "unhealthy");
        assert_eq!(health["accounts_total"], 0);
    }

    #[tokio::test]
    async fn concurrent_selectors_never_share_a_slot() {
        let (_dir, pool) = pool_with(vec![test_account("a"), test_account("b")]).await;
        let pool = Arc::new(pool);

        let mut handles = vec![];
        for _ in 0..4 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                pool.select_at("timeline", T).await.ok().map(|a| a.username)
            }));
        }
        let mut winners = vec![];
        for h in handles {
            if let Some(name) = h.await.unwrap() {
                winners.push(name);
            }
        }
        winners.sort();
        winners.dedup();
        assert_eq!(winners.len(), 2, "two slots, two distinct winners");
    }
}
