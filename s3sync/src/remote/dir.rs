//! Directory-backed object store.
//!
//! Each bucket is a subdirectory of the store root; each object is a file
//! inside its bucket. This is the shipped implementation; a networked
//! store only needs to implement [`RemoteStore`](super::RemoteStore).

use super::{Progress, RemoteStore, StoreError};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CHUNK_SIZE: usize = 64 * 1024;

pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        let dir = self.root.join(bucket);
        if !dir.is_dir() {
            return Err(StoreError::BucketNotFound(bucket.to_string()));
        }
        Ok(dir)
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        Ok(self.bucket_dir(bucket)?.join(key))
    }

    fn copy_stream(
        mut reader: impl Read,
        mut writer: impl Write,
        total: u64,
        progress: Progress,
    ) -> Result<(), StoreError> {
        let mut buf = [0u8; CHUNK_SIZE];
        let mut done = 0u64;
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n])?;
            done += n as u64;
            progress(done, total);
        }
        writer.flush()?;
        Ok(())
    }
}

impl RemoteStore for DirStore {
    fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        Ok(self.root.join(bucket).is_dir())
    }

    fn list_buckets(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn get(&self, bucket: &str, key: &str, progress: Progress) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key)?;
        if !path.is_file() {
            return Err(StoreError::KeyNotFound(key.to_string()));
        }
        let file = File::open(&path)?;
        let total = file.metadata()?.len();
        let mut content = Vec::with_capacity(total as usize);
        Self::copy_stream(file, &mut content, total, progress)?;
        Ok(content)
    }

    fn get_to_file(
        &self,
        bucket: &str,
        key: &str,
        dest: &Path,
        progress: Progress,
    ) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        if !path.is_file() {
            return Err(StoreError::KeyNotFound(key.to_string()));
        }
        let file = File::open(&path)?;
        let total = file.metadata()?.len();
        let out = File::create(dest)?;
        Self::copy_stream(file, out, total, progress)
    }

    fn put(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        progress: Progress,
    ) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        let out = File::create(path)?;
        Self::copy_stream(content, out, content.len() as u64, progress)
    }

    fn put_from_file(
        &self,
        bucket: &str,
        key: &str,
        src: &Path,
        progress: Progress,
    ) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        let file = File::open(src)?;
        let total = file.metadata()?.len();
        let out = File::create(path)?;
        Self::copy_stream(file, out, total, progress)
    }

    fn copy(&self, bucket: &str, src_key: &str, dst_key: &str) -> Result<bool, StoreError> {
        let src = self.object_path(bucket, src_key)?;
        if !src.is_file() {
            return Ok(false);
        }
        let dst = self.object_path(bucket, dst_key)?;
        std::fs::copy(src, dst)?;
        Ok(true)
    }
}
