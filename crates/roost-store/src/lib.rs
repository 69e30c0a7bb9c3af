//! Durable account records for the roost pool
//!
//! Every scraper identity is a single [`Account`] row: credentials, saved
//! session state, per-endpoint-group locks and request counts, and the error
//! history the reactivation scheduler ranks on. The [`AccountStore`] persists
//! one JSON file per account and is the single source of truth; the pool
//! reads and mutates rows exclusively through it.
//!
//! Concurrency contract:
//! - writers to *different* accounts never contend
//! - writers to the *same* account serialize on a per-row mutex
//! - every mutation is persisted atomically (temp file + rename) before the
//!   row lock is released, so a crash never leaves a half-written row

pub mod account;
pub mod error;
pub mod store;

pub use account::Account;
pub use error::{Error, Result};
pub use store::AccountStore;
