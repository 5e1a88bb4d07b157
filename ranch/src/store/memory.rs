//! In-memory `Store` reference implementation. Used by the crate's own
//! tests and as the default backend for local/dev runs; there is no
//! Postgres/etcd-backed implementation in this crate.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Revision, Store};
use crate::error::StoreError;
use crate::types::{Drlc, Resource};

struct Entry<T> {
    value: T,
    revision: Revision,
}

#[derive(Default)]
struct Inner {
    resources: HashMap<String, Entry<Resource>>,
    drlcs: HashMap<String, Entry<Drlc>>,
    next_revision: u64,
}

impl Inner {
    fn bump(&mut self) -> Revision {
        self.next_revision += 1;
        Revision(self.next_revision)
    }
}

/// A `parking_lot`-guarded map of resources and DRLCs, with a single
/// monotonic revision counter shared across both maps. Good enough for
/// tests and for running the ranch against nothing but itself.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_resource(&self, name: &str) -> Result<(Resource, Revision), StoreError> {
        let inner = self.inner.lock();
        inner
            .resources
            .get(name)
            .map(|e| (e.value.clone(), e.revision))
            .ok_or_else(|| StoreError::ResourceNotFound(name.to_string()))
    }

    async fn list_resources(&self) -> Result<Vec<(Resource, Revision)>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .resources
            .values()
            .map(|e| (e.value.clone(), e.revision))
            .collect())
    }

    async fn create_resource(&self, resource: Resource) -> Result<Revision, StoreError> {
        let mut inner = self.inner.lock();
        if inner.resources.contains_key(&resource.name) {
            return Err(StoreError::AlreadyExists(resource.name));
        }
        let revision = inner.bump();
        inner.resources.insert(
            resource.name.clone(),
            Entry {
                value: resource,
                revision,
            },
        );
        Ok(revision)
    }

    async fn update_resource(
        &self,
        resource: &Resource,
        expected: Revision,
    ) -> Result<Revision, StoreError> {
        let mut inner = self.inner.lock();
        let current = inner
            .resources
            .get(&resource.name)
            .ok_or_else(|| StoreError::ResourceNotFound(resource.name.clone()))?;
        if current.revision != expected {
            return Err(StoreError::Conflict(resource.name.clone()));
        }
        let revision = inner.bump();
        inner.resources.insert(
            resource.name.clone(),
            Entry {
                value: resource.clone(),
                revision,
            },
        );
        Ok(revision)
    }

    async fn delete_resource(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner
            .resources
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::ResourceNotFound(name.to_string()))
    }

    async fn get_drlc(&self, rtype: &str) -> Result<(Drlc, Revision), StoreError> {
        let inner = self.inner.lock();
        inner
            .drlcs
            .get(rtype)
            .map(|e| (e.value.clone(), e.revision))
            .ok_or_else(|| StoreError::DrlcNotFound(rtype.to_string()))
    }

    async fn list_drlcs(&self) -> Result<Vec<(Drlc, Revision)>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .drlcs
            .values()
            .map(|e| (e.value.clone(), e.revision))
            .collect())
    }

    async fn create_drlc(&self, drlc: Drlc) -> Result<Revision, StoreError> {
        let mut inner = self.inner.lock();
        if inner.drlcs.contains_key(&drlc.rtype) {
            return Err(StoreError::AlreadyExists(drlc.rtype));
        }
        let revision = inner.bump();
        inner.drlcs.insert(
            drlc.rtype.clone(),
            Entry {
                value: drlc,
                revision,
            },
        );
        Ok(revision)
    }

    async fn update_drlc(&self, drlc: &Drlc, expected: Revision) -> Result<Revision, StoreError> {
        let mut inner = self.inner.lock();
        let current = inner
            .drlcs
            .get(&drlc.rtype)
            .ok_or_else(|| StoreError::DrlcNotFound(drlc.rtype.clone()))?;
        if current.revision != expected {
            return Err(StoreError::Conflict(drlc.rtype.clone()));
        }
        let revision = inner.bump();
        inner.drlcs.insert(
            drlc.rtype.clone(),
            Entry {
                value: drlc.clone(),
                revision,
            },
        );
        Ok(revision)
    }

    async fn delete_drlc(&self, rtype: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner
            .drlcs
            .remove(rtype)
            .map(|_| ())
            .ok_or_else(|| StoreError::DrlcNotFound(rtype.to_string()))
    }
}
