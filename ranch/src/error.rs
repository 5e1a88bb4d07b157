//! Error taxonomy for the ranch. Callers are expected to match on the kind
//! (`storage-operator/src/util/error.rs`'s style), not on type identity.

use thiserror::Error;

/// Errors raised by a `Store` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource {0:?} not found")]
    ResourceNotFound(String),
    #[error("drlc {0:?} not found")]
    DrlcNotFound(String),
    #[error("resource {0:?} already exists")]
    AlreadyExists(String),
    /// The caller's observed revision has been superseded by a newer write.
    #[error("conflicting update to {0:?}")]
    Conflict(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors raised by the ranch's operations. These are the kinds external
/// callers are expected to branch on; `Conflict` from the store is retried
/// internally and never surfaces here except as `Internal` once retries are
/// exhausted, which indicates a bug or a pathologically contended resource
/// rather than a condition callers should special-case.
#[derive(Debug, Error)]
pub enum RanchError {
    #[error("resource {0:?} not found")]
    ResourceNotFound(String),
    #[error("resource type {0:?} not found")]
    ResourceTypeNotFound(String),
    #[error("resource {name:?} is owned by {actual:?}, not {expected:?}")]
    OwnerMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("resource {name:?} is in state {actual:?}, not {expected:?}")]
    StateMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("configuration is invalid: {0}")]
    Configuration(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0} retries exhausted retrying a conflicting update to {1:?}")]
    Internal(u32, String),
}

impl RanchError {
    pub fn not_found(name: impl Into<String>) -> Self {
        RanchError::ResourceNotFound(name.into())
    }
}
