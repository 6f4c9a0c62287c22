//! Error surface of the entity-store boundary.

use super::lifecycle::LifecycleError;

/// Failures owned by the storage layer itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Raised by conditional writes that bundle a lifecycle check with the
/// store mutation (approve/reject finalization, unique-enrollment insert).
/// The two sides stay distinguishable so the caller can tell "someone got
/// there first" from "the store is down".
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
