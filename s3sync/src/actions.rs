//! Action pipelines composing the archiver, the remote store and the
//! guarded local-delete step.
//!
//! Every remote-facing action runs as one short sequential pipeline inside a
//! [`Session`]; constructing the session is the shared precondition phase
//! (bucket resolution and existence check). Local-only actions operate on
//! the archive file alone and never touch the store.

use crate::archive;
use crate::config::Config;
use crate::fs::cleaner;
use crate::fs::filter::PathFilter;
use crate::naming::{BackupNames, DEFAULT_BACKUP_NAME, TEST_KEY};
use crate::prompt::UserPrompt;
use crate::remote::RemoteStore;
use crate::transfer::progress::{format_bytes, ProgressLogger};
use crate::utils::errors::{Result, SyncError};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One remote-facing action invocation: resolved bucket, derived names and
/// the working-tree root.
pub struct Session {
    store: Box<dyn RemoteStore>,
    bucket: String,
    names: BackupNames,
    root: PathBuf,
}

impl Session {
    /// Shared precondition phase: resolve the bucket name (configuration,
    /// else prompt) and confirm the bucket exists before any transfer. A
    /// missing bucket aborts the whole action, listing the buckets that do
    /// exist.
    pub fn new(
        config: &Config,
        root: &Path,
        store: Box<dyn RemoteStore>,
        prompt: &dyn UserPrompt,
    ) -> Result<Self> {
        let base = config
            .backup_name()
            .unwrap_or_else(|| DEFAULT_BACKUP_NAME.to_string());
        let names = BackupNames::new(&base, root);
        let bucket = match config.bucket() {
            Some(bucket) => bucket,
            None => prompt
                .input("Bucket name: ")
                .map_err(|e| SyncError::Setup(format!("bucket prompt failed: {e}")))?,
        };
        info!("Connecting to remote store: {bucket}");
        if !store.bucket_exists(&bucket)? {
            error!("Bucket {bucket} does not exist.");
            info!("Following buckets found:");
            for name in store.list_buckets()? {
                info!("  {name}");
            }
            info!("Aborting sync.");
            return Err(SyncError::Setup(format!("bucket {bucket} does not exist")));
        }
        Ok(Self {
            store,
            bucket,
            names,
            root: root.to_path_buf(),
        })
    }

    /// Archive the working tree and upload it to the backup key. A build
    /// failure is fatal: nothing is uploaded. Never deletes working-tree
    /// content.
    pub fn backup(&self) -> Result<()> {
        archive::remove_archive(&self.names.archive_path);
        let filter = PathFilter::for_archive(&self.root, &self.names);
        archive::build(&self.names.archive_path, &self.root, &filter)?;
        let size = std::fs::metadata(&self.names.archive_path)
            .map(|meta| meta.len())
            .unwrap_or(0);
        info!("Uploading {} to remote store ...", format_bytes(size));
        let mut progress = ProgressLogger::new();
        self.store.put_from_file(
            &self.bucket,
            &self.names.backup_key,
            &self.names.archive_path,
            &mut |done, total| progress.report(done, total),
        )?;
        info!("Upload complete.");
        Ok(())
    }

    /// Server-side copy of the backup key to a timestamped snapshot key.
    /// Independent of local state; a missing remote backup is a logged
    /// no-op.
    pub fn snapshot(&self) -> Result<()> {
        info!("Creating remote backup snapshot ...");
        let dest_key = self.names.snapshot_key(Local::now());
        if self
            .store
            .copy(&self.bucket, &self.names.backup_key, &dest_key)?
        {
            info!("Snapshot created.");
        } else {
            info!("No remote backup found.");
        }
        Ok(())
    }

    /// Download the backup archive and extract it over the working tree.
    /// Extraction overlays same-named files and leaves unrelated local
    /// files untouched; an extraction failure is logged, not fatal.
    pub fn update(&self) -> Result<()> {
        archive::remove_archive(&self.names.archive_path);
        info!("Downloading from remote store ...");
        let mut progress = ProgressLogger::new();
        self.store.get_to_file(
            &self.bucket,
            &self.names.backup_key,
            &self.names.archive_path,
            &mut |done, total| progress.report(done, total),
        )?;
        info!("Download complete.");
        if let Err(e) = archive::extract(&self.names.archive_path, &self.root) {
            error!("Archive extraction error: {e}");
        }
        Ok(())
    }

    /// Destructive path: delete working-tree content (sparing the delete
    /// exclusion set), then run the update pipeline. Delete-then-fetch has
    /// no rollback if the download fails after the delete phase.
    pub fn restore(&self) -> Result<()> {
        let filter = PathFilter::for_delete(&self.root);
        cleaner::delete_dir_content(&self.root, &filter, false);
        self.update()
    }

    /// Exercise the full pipeline against disposable artifacts: build and
    /// extract a test archive, preview the restore delete phase without
    /// mutating anything, then verify a remote round-trip of a known test
    /// object. A verification mismatch is logged, not fatal.
    pub fn dry_run(&self) -> Result<()> {
        archive::remove_archive(&self.names.test_archive_path);
        let filter = PathFilter::for_archive(&self.root, &self.names);
        archive::build(&self.names.test_archive_path, &self.root, &filter)?;
        if let Err(e) = archive::extract(&self.names.test_archive_path, &self.names.test_extract_dir)
        {
            error!("Archive extraction error: {e}");
        }
        let delete_filter = PathFilter::for_delete(&self.root);
        cleaner::deltree_dir_content(&self.root, &delete_filter, true);
        if !self.transfer_check()? {
            error!("Test object {TEST_KEY} read back from the store is not the one created.");
        }
        Ok(())
    }

    /// Upload the literal test object, download it back and compare
    /// byte-for-byte. Returns the verdict; callers decide how loudly to
    /// complain.
    pub fn transfer_check(&self) -> Result<bool> {
        info!("Testing upload of {TEST_KEY} ...");
        let mut up = ProgressLogger::new();
        self.store.put(
            &self.bucket,
            TEST_KEY,
            TEST_KEY.as_bytes(),
            &mut |done, total| up.report(done, total),
        )?;
        info!("Upload test complete.");

        info!("Testing download of {TEST_KEY} ...");
        let mut down = ProgressLogger::new();
        let content = self
            .store
            .get(&self.bucket, TEST_KEY, &mut |done, total| {
                down.report(done, total)
            })?;
        info!("Download test complete.");
        Ok(content == TEST_KEY.as_bytes())
    }
}

/// Build the local archive without uploading it.
pub fn archive_local(root: &Path, names: &BackupNames) -> Result<()> {
    archive::remove_archive(&names.archive_path);
    let filter = PathFilter::for_archive(root, names);
    archive::build(&names.archive_path, root, &filter)
}

/// Extract the local archive over the working tree.
pub fn extract_local(root: &Path, names: &BackupNames) -> Result<()> {
    archive::extract(&names.archive_path, root)
}

/// Log every member name of the local archive.
pub fn list_local(names: &BackupNames) -> Result<()> {
    for name in archive::list(&names.archive_path)? {
        info!("{name}");
    }
    info!("Listing complete.");
    Ok(())
}
