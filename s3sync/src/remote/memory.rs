//! In-process object store used by tests.

use super::{Progress, RemoteStore, StoreError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

type Buckets = HashMap<String, HashMap<String, Vec<u8>>>;

/// Cloneable handle over shared in-memory buckets. Clones see the same
/// objects, so tests can inspect or tamper with state the code under test
/// wrote through another handle.
#[derive(Clone, Default)]
pub struct MemoryStore {
    buckets: Arc<Mutex<Buckets>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single, empty bucket.
    pub fn with_bucket(bucket: &str) -> Self {
        let store = Self::new();
        store
            .lock()
            .insert(bucket.to_string(), HashMap::new());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buckets> {
        self.buckets.lock().expect("store mutex poisoned")
    }

    /// Direct object read for test assertions.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.lock().get(bucket)?.get(key).cloned()
    }

    /// Direct object write for test setup and tampering.
    pub fn insert_object(&self, bucket: &str, key: &str, content: Vec<u8>) {
        self.lock()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), content);
    }

    /// Keys currently present in a bucket, sorted.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl RemoteStore for MemoryStore {
    fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        Ok(self.lock().contains_key(bucket))
    }

    fn list_buckets(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn get(&self, bucket: &str, key: &str, progress: Progress) -> Result<Vec<u8>, StoreError> {
        let content = self
            .lock()
            .get(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))?;
        let total = content.len() as u64;
        progress(total, total);
        Ok(content)
    }

    fn get_to_file(
        &self,
        bucket: &str,
        key: &str,
        dest: &Path,
        progress: Progress,
    ) -> Result<(), StoreError> {
        let content = self.get(bucket, key, progress)?;
        std::fs::write(dest, content)?;
        Ok(())
    }

    fn put(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        progress: Progress,
    ) -> Result<(), StoreError> {
        let mut buckets = self.lock();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        objects.insert(key.to_string(), content.to_vec());
        let total = content.len() as u64;
        progress(total, total);
        Ok(())
    }

    fn put_from_file(
        &self,
        bucket: &str,
        key: &str,
        src: &Path,
        progress: Progress,
    ) -> Result<(), StoreError> {
        let content = std::fs::read(src)?;
        self.put(bucket, key, &content, progress)
    }

    fn copy(&self, bucket: &str, src_key: &str, dst_key: &str) -> Result<bool, StoreError> {
        let mut buckets = self.lock();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound(bucket.to_string()))?;
        let Some(content) = objects.get(src_key).cloned() else {
            return Ok(false);
        };
        objects.insert(dst_key.to_string(), content);
        Ok(true)
    }
}
