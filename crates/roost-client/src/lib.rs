//! Request configuration for roost accounts
//!
//! Turns a stored [`roost_store::Account`] into a ready-to-use
//! [`RequestConfig`]: resolved proxy, merged headers, and the minimal
//! authentication cookie pair. Building a config is a pure function of
//! account state; no I/O happens until the caller issues requests.
//!
//! This crate also owns [`Outcome`] and [`classify_status`]. Classifying a
//! raw response is the caller's responsibility — the pool only records the
//! classified outcome and never inspects responses itself.

pub mod constants;
pub mod factory;
pub mod outcome;

pub use factory::{RequestConfig, build_request_config, build_request_config_with_proxy};
pub use outcome::{Outcome, classify_status};
