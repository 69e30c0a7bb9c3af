//! Error types for pool operations

/// Errors from pool operations.
///
/// `Unavailable` is an expected outcome, not a fault: it means every account
/// is inactive, locked, or reserved for the requested group right now and the
/// caller should back off and retry. `NotFound` is a caller bug. `Store`
/// wraps persistence failures, which are fatal to the calling operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no account available: {0}")]
    Unavailable(String),

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("account store error: {0}")]
    Store(#[from] roost_store::Error),
}

impl Error {
    /// Lift a store error, surfacing a missing row as the pool-level
    /// `NotFound` instead of a persistence failure.
    pub(crate) fn from_store(e: roost_store::Error) -> Self {
        match e {
            roost_store::Error::NotFound(username) => Error::NotFound(username),
            other => Error::Store(other),
        }
    }
}

/// Result alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;
