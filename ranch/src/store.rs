//! The persistence seam. `spec.md` treats the backing database as an
//! external capability; this crate only ships the trait plus an
//! in-memory reference implementation, mirroring how
//! `reitermarkus-mayastor-control-plane`'s `common/src/store` keeps the
//! `Store` trait separate from its concrete `Etcd` backend.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{Drlc, Resource};

/// An opaque, monotonically increasing revision token. Two reads of the
/// same object compare equal iff nothing has written to it in between;
/// `Store::update_*` takes the revision the caller last observed and fails
/// with `StoreError::Conflict` if it has since changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(pub u64);

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_resource(&self, name: &str) -> Result<(Resource, Revision), StoreError>;
    async fn list_resources(&self) -> Result<Vec<(Resource, Revision)>, StoreError>;
    async fn create_resource(&self, resource: Resource) -> Result<Revision, StoreError>;
    async fn update_resource(
        &self,
        resource: &Resource,
        expected: Revision,
    ) -> Result<Revision, StoreError>;
    async fn delete_resource(&self, name: &str) -> Result<(), StoreError>;

    async fn get_drlc(&self, rtype: &str) -> Result<(Drlc, Revision), StoreError>;
    async fn list_drlcs(&self) -> Result<Vec<(Drlc, Revision)>, StoreError>;
    async fn create_drlc(&self, drlc: Drlc) -> Result<Revision, StoreError>;
    async fn update_drlc(&self, drlc: &Drlc, expected: Revision) -> Result<Revision, StoreError>;
    async fn delete_drlc(&self, rtype: &str) -> Result<(), StoreError>;
}
