//! A mark-and-sweep garbage collector for leaked AWS test resources
//! ("the sweeper"): enumerate, tag-and-TTL filter, and delete ~25 kinds of
//! cloud objects in dependency order, with durable first-seen state
//! carried across runs.

pub mod args;
pub mod cloud_api;
pub mod error;
pub mod kind;
pub mod object_store;
pub mod options;
pub mod pipeline;
pub mod regions;
pub mod resource_set;
pub mod sweeper;
pub mod tag;

pub use error::SweepError;
pub use options::Options;
pub use resource_set::ResourceSet;
pub use sweeper::Sweeper;
