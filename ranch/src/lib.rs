//! Leasing and reclamation service for pooled cloud test resources ("the ranch").
//!
//! The crate is split the way `eosin-platform-eosin`'s `meta` service is: a
//! typed data model (`types`), a persistence seam (`store`), the state
//! machine itself (`ranch`), and a convergence loop over a declarative
//! configuration (`reconciler`).

pub mod args;
pub mod error;
pub mod id;
pub mod ranch;
pub mod reconciler;
pub mod request_queue;
pub mod store;
pub mod types;

pub use error::RanchError;
pub use ranch::Ranch;
pub use request_queue::RequestQueue;
pub use types::{BoskosConfig, ConfigEntry, Drlc, Metric, Resource};
