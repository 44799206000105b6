//! Guarded deletion of working-tree content.
//!
//! Two traversal strategies back the restore and preview paths: a shallow
//! sweep of the root's immediate children and a deep bottom-up walk that
//! evaluates the exclusion predicate for every entry. Both support a
//! dry-run mode that only logs what would happen.

use crate::fs::filter::PathFilter;
use std::fs;
use std::path::Path;
use tracing::{error, info};
use walkdir::WalkDir;

fn prefix(dry_run: bool) -> &'static str {
    if dry_run {
        "DRY RUN: "
    } else {
        ""
    }
}

/// Remove the immediate children of `root`, sparing excluded paths.
/// Directories are removed recursively. Failures are logged and the sweep
/// continues.
pub fn delete_dir_content(root: &Path, filter: &PathFilter, dry_run: bool) {
    let pre = prefix(dry_run);
    info!("{pre}Deleting files from {}", filter.friendly(root));
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Error deleting directory content {}: {e}", root.display());
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error reading entry under {}: {e}", root.display());
                continue;
            }
        };
        let path = entry.path();
        if filter.excluded(&path) {
            info!("{pre}Skipping {}", filter.friendly(&path));
        } else if !dry_run {
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(e) = result {
                error!("Error removing {}: {e}", filter.friendly(&path));
            }
        }
    }
}

/// Walk the whole tree bottom-up, evaluating the exclusion predicate
/// independently for every file and directory. A directory is removed only
/// once its children are gone; one kept alive by excluded children is left
/// in place.
pub fn deltree_dir_content(root: &Path, filter: &PathFilter, dry_run: bool) {
    let pre = prefix(dry_run);
    info!("{pre}Removing files from {}", filter.friendly(root));
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error removing directory content {}: {e}", root.display());
                continue;
            }
        };
        if entry.path() == root {
            continue;
        }
        remove_path(entry.path(), filter, dry_run);
    }
}

/// Remove a single path unless excluded. Directories are only removed when
/// already empty.
fn remove_path(path: &Path, filter: &PathFilter, dry_run: bool) {
    let pre = prefix(dry_run);
    if filter.excluded(path) {
        info!("  {pre}Skipping {}", filter.friendly(path));
        return;
    }
    if dry_run {
        return;
    }
    let result = if path.is_dir() {
        let still_populated = fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(true);
        if still_populated {
            // kept alive by excluded children
            return;
        }
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    if let Err(e) = result {
        error!("Error removing {}: {e}", filter.friendly(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(root: &Path) -> std::io::Result<()> {
        fs::create_dir(root.join(".git"))?;
        fs::write(root.join(".git/config"), b"[core]")?;
        fs::write(root.join("s3sync.conf"), b"{}")?;
        fs::write(root.join("data.txt"), b"data")?;
        fs::create_dir(root.join("sub"))?;
        fs::write(root.join("sub/inner.txt"), b"inner")?;
        Ok(())
    }

    fn delete_filter(root: &Path) -> PathFilter {
        PathFilter::new(
            root,
            vec!["/.git".to_string()],
            vec!["s3sync.conf".to_string()],
        )
    }

    #[test]
    fn shallow_delete_spares_excluded_paths() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        populate(root)?;

        delete_dir_content(root, &delete_filter(root), false);

        assert!(root.join(".git/config").exists());
        assert!(root.join("s3sync.conf").exists());
        assert!(!root.join("data.txt").exists());
        assert!(!root.join("sub").exists());
        Ok(())
    }

    #[test]
    fn shallow_dry_run_mutates_nothing() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        populate(root)?;

        delete_dir_content(root, &delete_filter(root), true);

        assert!(root.join(".git/config").exists());
        assert!(root.join("data.txt").exists());
        assert!(root.join("sub/inner.txt").exists());
        Ok(())
    }

    #[test]
    fn deep_delete_evaluates_every_entry() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir(root.join("sub"))?;
        fs::write(root.join("sub/keep.conf"), b"keep")?;
        fs::write(root.join("sub/drop.txt"), b"drop")?;
        fs::create_dir(root.join("other"))?;
        fs::write(root.join("other/file.txt"), b"gone")?;

        let filter = PathFilter::new(root, Vec::new(), vec!["keep.conf".to_string()]);
        deltree_dir_content(root, &filter, false);

        // sub survives because an excluded child keeps it populated
        assert!(root.join("sub/keep.conf").exists());
        assert!(!root.join("sub/drop.txt").exists());
        // other was emptied and then removed bottom-up
        assert!(!root.join("other").exists());
        Ok(())
    }

    #[test]
    fn deep_dry_run_mutates_nothing() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        populate(root)?;

        deltree_dir_content(root, &delete_filter(root), true);

        assert!(root.join("data.txt").exists());
        assert!(root.join("sub/inner.txt").exists());
        Ok(())
    }
}
