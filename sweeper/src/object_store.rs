//! The durable blob store `ResourceSet::load`/`save` read and write to.
//! Treated as an external capability (no real S3 client here), same
//! pattern as `ranch::store`.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SweepError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, SweepError>;
    async fn put(&self, path: &str, data: Vec<u8>) -> Result<(), SweepError>;
}

#[derive(Default)]
pub struct InMemoryObjectStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, path: &str) -> Result<Option<Vec<u8>>, SweepError> {
        Ok(self.blobs.lock().get(path).cloned())
    }

    async fn put(&self, path: &str, data: Vec<u8>) -> Result<(), SweepError> {
        self.blobs.lock().insert(path.to_string(), data);
        Ok(())
    }
}
