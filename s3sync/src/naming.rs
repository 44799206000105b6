//! Derivation of archive, backup, snapshot and test-artifact names.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Extension shared by the backup archive and all snapshot copies.
pub const BACKUP_EXT: &str = ".tar.bz2";

/// Base name used when the configuration does not provide one.
pub const DEFAULT_BACKUP_NAME: &str = "s3sync_backup";

/// Disposable remote key used by the dry-run transfer check.
pub const TEST_KEY: &str = ".s3test";

/// Local archive built and extracted by the dry-run pipeline.
pub const TEST_ARCHIVE_NAME: &str = ".s3test.tar.bz2";

/// Configuration file looked up in the working-tree root.
pub const CONF_NAME: &str = "s3sync.conf";

/// Names derived from the backup base name, computed once per action
/// invocation.
#[derive(Debug, Clone)]
pub struct BackupNames {
    /// Remote key always holding the latest archive
    pub backup_key: String,

    /// Local path the archive is built to and downloaded to
    pub archive_path: PathBuf,

    /// Local path of the dry-run test archive
    pub test_archive_path: PathBuf,

    /// Directory the dry-run test archive is extracted into
    pub test_extract_dir: PathBuf,

    base: String,
}

impl BackupNames {
    pub fn new(base: &str, root: &Path) -> Self {
        let backup_key = format!("{base}{BACKUP_EXT}");
        Self {
            archive_path: root.join(&backup_key),
            test_archive_path: root.join(TEST_ARCHIVE_NAME),
            test_extract_dir: root.join(TEST_KEY),
            backup_key,
            base: base.to_string(),
        }
    }

    /// Timestamped snapshot key with second resolution, derived at call
    /// time. Collisions within the same second are last-write-wins.
    pub fn snapshot_key(&self, now: DateTime<Local>) -> String {
        format!("{}.{}{}", self.base, now.format("%Y%m%d_%H%M%S"), BACKUP_EXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn derives_backup_key_and_paths_from_base_name() {
        let names = BackupNames::new("s3sync_backup", Path::new("/work"));
        assert_eq!(names.backup_key, "s3sync_backup.tar.bz2");
        assert_eq!(
            names.archive_path,
            Path::new("/work/s3sync_backup.tar.bz2")
        );
        assert_eq!(names.test_archive_path, Path::new("/work/.s3test.tar.bz2"));
        assert_eq!(names.test_extract_dir, Path::new("/work/.s3test"));
    }

    #[test]
    fn snapshot_key_embeds_a_second_resolution_timestamp() {
        let names = BackupNames::new("docs", Path::new("/work"));
        let now = Local.with_ymd_and_hms(2016, 3, 5, 7, 9, 11).unwrap();
        assert_eq!(names.snapshot_key(now), "docs.20160305_070911.tar.bz2");
    }

    #[test]
    fn snapshot_keys_differ_across_seconds() {
        let names = BackupNames::new("docs", Path::new("/work"));
        let first = Local.with_ymd_and_hms(2016, 3, 5, 7, 9, 11).unwrap();
        let second = Local.with_ymd_and_hms(2016, 3, 5, 7, 9, 12).unwrap();
        assert_ne!(names.snapshot_key(first), names.snapshot_key(second));
    }
}
