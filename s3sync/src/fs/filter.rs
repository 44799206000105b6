//! Path exclusion rules shared by the archive build and local delete steps.

use crate::naming::{BackupNames, CONF_NAME, TEST_ARCHIVE_NAME, TEST_KEY};
use std::path::{Path, PathBuf};

/// Exclusion predicate over paths normalized relative to a fixed root.
///
/// Evaluation is pure: the same path always yields the same verdict. Exact
/// rules are checked against the normalized relative form first, then
/// substring rules against the same form.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: PathBuf,
    /// Exact matches against the normalized relative form (e.g. "/.git")
    exact: Vec<String>,
    /// Substring matches against the normalized relative form
    substrings: Vec<String>,
}

impl PathFilter {
    pub fn new(root: &Path, exact: Vec<String>, substrings: Vec<String>) -> Self {
        Self {
            root: root.to_path_buf(),
            exact,
            substrings,
        }
    }

    /// Rules deciding what stays out of a backup archive: trash and
    /// version-control directories plus the in-progress backup and
    /// dry-run artifacts.
    pub fn for_archive(root: &Path, names: &BackupNames) -> Self {
        let exact = [
            "Icon",
            ".DS_Store",
            ".Trash",
            "Examples",
            ".git",
            TEST_KEY,
            TEST_ARCHIVE_NAME,
        ]
        .iter()
        .map(|name| format!("/{name}"))
        .chain(std::iter::once(format!("/{}", names.backup_key)))
        .collect();
        Self::new(root, exact, Vec::new())
    }

    /// Rules deciding what a restore's delete phase must spare: trash and
    /// version-control directories, the running executable and the
    /// configuration file, so a restore cannot erase the means to restore
    /// again.
    pub fn for_delete(root: &Path) -> Self {
        let exact = [".Trash", "Examples", ".git"]
            .iter()
            .map(|name| format!("/{name}"))
            .collect();
        let mut substrings = vec![CONF_NAME.to_string()];
        if let Some(exe) = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        {
            substrings.push(exe);
        }
        Self::new(root, exact, substrings)
    }

    /// Normalize a path to the root-relative form the rules are written in.
    /// The root itself maps to the "/" sentinel.
    pub fn friendly(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel = rel.to_string_lossy();
        if rel.is_empty() || rel == "." {
            "/".to_string()
        } else {
            format!("/{}", rel.trim_start_matches('/'))
        }
    }

    /// Deterministic include/exclude verdict for a path. The root sentinel
    /// is never excluded.
    pub fn excluded(&self, path: &Path) -> bool {
        let normalized = self.friendly(path);
        if normalized == "/" {
            return false;
        }
        if self.exact.iter().any(|rule| *rule == normalized) {
            return true;
        }
        self.substrings
            .iter()
            .any(|rule| normalized.contains(rule.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(root: &Path) -> BackupNames {
        BackupNames::new("s3sync_backup", root)
    }

    #[test]
    fn root_is_never_excluded() {
        let root = Path::new("/work");
        let archive = PathFilter::for_archive(root, &names(root));
        let delete = PathFilter::for_delete(root);
        assert!(!archive.excluded(root));
        assert!(!delete.excluded(root));
    }

    #[test]
    fn verdicts_are_deterministic() {
        let root = Path::new("/work");
        let filter = PathFilter::for_archive(root, &names(root));
        let path = root.join(".git");
        let first = filter.excluded(&path);
        for _ in 0..10 {
            assert_eq!(filter.excluded(&path), first);
        }
    }

    #[test]
    fn archive_filter_excludes_exact_top_level_entries() {
        let root = Path::new("/work");
        let filter = PathFilter::for_archive(root, &names(root));
        assert!(filter.excluded(&root.join(".git")));
        assert!(filter.excluded(&root.join("Icon")));
        assert!(filter.excluded(&root.join(".DS_Store")));
        assert!(filter.excluded(&root.join(".Trash")));
        assert!(!filter.excluded(&root.join("a.txt")));
    }

    #[test]
    fn archive_filter_protects_in_progress_artifacts() {
        let root = Path::new("/work");
        let filter = PathFilter::for_archive(root, &names(root));
        assert!(filter.excluded(&root.join("s3sync_backup.tar.bz2")));
        assert!(filter.excluded(&root.join(".s3test")));
        assert!(filter.excluded(&root.join(".s3test.tar.bz2")));
    }

    #[test]
    fn exact_rules_only_match_top_level_paths() {
        let root = Path::new("/work");
        let filter = PathFilter::for_archive(root, &names(root));
        assert!(!filter.excluded(&root.join("sub/.git")));
    }

    #[test]
    fn delete_filter_spares_the_config_file_anywhere() {
        let root = Path::new("/work");
        let filter = PathFilter::for_delete(root);
        assert!(filter.excluded(&root.join("s3sync.conf")));
        assert!(filter.excluded(&root.join("nested/s3sync.conf")));
        assert!(!filter.excluded(&root.join("notes.txt")));
    }

    #[test]
    fn delete_filter_spares_version_control() {
        let root = Path::new("/work");
        let filter = PathFilter::for_delete(root);
        assert!(filter.excluded(&root.join(".git")));
        assert!(!filter.excluded(&root.join("data")));
    }

    #[test]
    fn substring_rules_match_the_normalized_form() {
        let root = Path::new("/work");
        let filter = PathFilter::new(root, Vec::new(), vec!["notes.txt".to_string()]);
        assert!(filter.excluded(&root.join("deep/notes.txt")));
        assert!(!filter.excluded(&root.join("other.txt")));
    }

    #[test]
    fn friendly_form_strips_the_root_prefix() {
        let root = Path::new("/work");
        let filter = PathFilter::new(root, Vec::new(), Vec::new());
        assert_eq!(filter.friendly(&root.join("a/b.txt")), "/a/b.txt");
        assert_eq!(filter.friendly(root), "/");
    }
}
