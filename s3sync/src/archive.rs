//! Exclusion-aware archive engine (.tar.bz2).
//!
//! Builds a compressed tar from a directory tree, extracts it back and
//! lists member names. Exclusion is evaluated on the source absolute path;
//! an excluded directory keeps its whole subtree out of the archive.

use crate::fs::filter::PathFilter;
use crate::utils::errors::{Result, SyncError};
use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

/// Build a bzip2-compressed tar of `source_root` at `archive_path`,
/// skipping every entry the filter excludes. Any pre-existing file at
/// `archive_path` is truncated; a partially written archive is left behind
/// on failure (caller's responsibility).
pub fn build(archive_path: &Path, source_root: &Path, filter: &PathFilter) -> Result<()> {
    info!("Creating {} ...", archive_path.display());
    write_tar(archive_path, source_root, filter)
        .map_err(|e| SyncError::ArchiveBuild(e.to_string()))?;
    let size_mb = std::fs::metadata(archive_path)
        .map(|meta| meta.len() >> 20)
        .unwrap_or(0);
    info!("Created {}MB {}", size_mb, archive_path.display());
    Ok(())
}

fn write_tar(archive_path: &Path, source_root: &Path, filter: &PathFilter) -> io::Result<()> {
    let file = File::create(archive_path)?;
    let encoder = BzEncoder::new(file, Compression::default());
    let mut tar = tar::Builder::new(encoder);

    let walker = WalkDir::new(source_root)
        .into_iter()
        .filter_entry(|entry| {
            let excluded = filter.excluded(entry.path());
            if excluded {
                info!("Skipping {}", filter.friendly(entry.path()));
            }
            !excluded
        });
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        if path == source_root {
            continue;
        }
        // archive-internal names are relative to the source root, rooted
        // at "." like the archives this format replaces
        let Ok(rel) = path.strip_prefix(source_root) else {
            continue;
        };
        let name = Path::new(".").join(rel);
        if entry.file_type().is_dir() {
            tar.append_dir(&name, path)?;
        } else {
            tar.append_path_with_name(path, &name)?;
        }
    }

    let encoder = tar.into_inner()?;
    let file = encoder.finish()?;
    file.sync_all()?;
    Ok(())
}

/// Decompress and unpack all archive entries under `dest_root`, preserving
/// relative structure. Same-named files are overwritten; unrelated files
/// under `dest_root` are left untouched.
pub fn extract(archive_path: &Path, dest_root: &Path) -> Result<()> {
    info!(
        "Extracting {} to {} ...",
        archive_path.display(),
        dest_root.display()
    );
    let file = File::open(archive_path)
        .map_err(|e| SyncError::ArchiveExtract(format!("{}: {e}", archive_path.display())))?;
    let mut tar = tar::Archive::new(BzDecoder::new(file));
    tar.unpack(dest_root)
        .map_err(|e| SyncError::ArchiveExtract(e.to_string()))?;
    info!("Archive extracted.");
    Ok(())
}

/// Stream the member names of an archive without extracting content.
/// Reopens the archive on every call, so the enumeration is restartable.
pub fn list(archive_path: &Path) -> Result<Vec<String>> {
    info!("Listing {} ...", archive_path.display());
    let file = File::open(archive_path)
        .map_err(|e| SyncError::ArchiveExtract(format!("{}: {e}", archive_path.display())))?;
    let mut tar = tar::Archive::new(BzDecoder::new(file));
    let entries = tar
        .entries()
        .map_err(|e| SyncError::ArchiveExtract(e.to_string()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::ArchiveExtract(e.to_string()))?;
        let path = entry
            .path()
            .map_err(|e| SyncError::ArchiveExtract(e.to_string()))?;
        names.push(path.to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Best-effort removal of a previous local archive before a rebuild or a
/// download.
pub fn remove_archive(archive_path: &Path) {
    match std::fs::remove_file(archive_path) {
        Ok(()) => info!("Local archive {} removed.", archive_path.display()),
        Err(_) => info!("No local archive {} found.", archive_path.display()),
    }
}
