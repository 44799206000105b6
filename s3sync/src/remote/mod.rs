//! Remote object store interface consumed by the action pipelines.
//!
//! The wire protocol lives behind [`RemoteStore`]: the core only needs
//! existence checks, transfers and a server-side copy. Downloads and copies
//! validate that the source key exists; uploads blindly create or replace.

pub mod dir;
pub mod memory;

use std::path::Path;
use thiserror::Error;

pub use dir::DirStore;
pub use memory::MemoryStore;

/// Progress callback: (bytes done, bytes total). Observational only.
pub type Progress<'a> = &'a mut dyn FnMut(u64, u64);

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("bucket {0} does not exist")]
    BucketNotFound(String),

    #[error("key {0} not found")]
    KeyNotFound(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Object store capabilities required by the sync actions.
pub trait RemoteStore {
    fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    /// Known bucket names, used for the fail-fast diagnostic listing.
    fn list_buckets(&self) -> Result<Vec<String>, StoreError>;

    /// Fetch an object into memory. Missing keys are an error.
    fn get(&self, bucket: &str, key: &str, progress: Progress) -> Result<Vec<u8>, StoreError>;

    /// Fetch an object into a local file. Missing keys are an error.
    fn get_to_file(
        &self,
        bucket: &str,
        key: &str,
        dest: &Path,
        progress: Progress,
    ) -> Result<(), StoreError>;

    /// Create or replace an object from a byte slice.
    fn put(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        progress: Progress,
    ) -> Result<(), StoreError>;

    /// Create or replace an object from a local file.
    fn put_from_file(
        &self,
        bucket: &str,
        key: &str,
        src: &Path,
        progress: Progress,
    ) -> Result<(), StoreError>;

    /// Server-side copy within a bucket. Returns `Ok(false)` when `src_key`
    /// does not exist; the destination is left untouched.
    fn copy(&self, bucket: &str, src_key: &str, dst_key: &str) -> Result<bool, StoreError>;
}
