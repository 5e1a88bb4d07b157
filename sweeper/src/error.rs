//! Error taxonomy for the sweeper, mirroring `ranch::error`'s "kinds, not
//! types" approach (`storage-operator/src/util/error.rs`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// The caller's principal lacks visibility into this kind/region; a
    /// `ListAll` failure of this kind is downgraded to a skip, not an
    /// aggregate failure.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Throttling or a timeout the cloud client's own backoff already
    /// exhausted.
    #[error("transient cloud API error: {0}")]
    Transient(String),

    /// Invalid configuration discovered at startup; fatal.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Any other cloud API failure.
    #[error("cloud API error: {0}")]
    CloudApi(String),

    #[error("object store error: {0}")]
    ObjectStore(String),
}
