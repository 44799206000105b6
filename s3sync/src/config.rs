//! Key-value configuration for the sync tool.
//!
//! Settings come from a JSON file (`s3sync.conf`) in the working-tree root.
//! Loaded keys are exported into the process environment so a store
//! implementation can pick up credentials from the same file.

use crate::naming::CONF_NAME;
use crate::utils::errors::{Result, SyncError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Backup base name setting.
pub const KEY_BACKUP_NAME: &str = "S3SYNC_BACKUP";

/// Bucket name setting.
pub const KEY_BUCKET: &str = "S3SYNC_AWS_S3_BUCKET";

/// Location of the directory-backed store.
pub const KEY_STORE_DIR: &str = "S3SYNC_STORE_DIR";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    values: HashMap<String, String>,
}

impl Config {
    /// Load `s3sync.conf` from the working-tree root. A missing or
    /// unreadable file is a warning, not an error; every setting is then
    /// absent.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONF_NAME);
        match Self::from_file(&path) {
            Ok(config) => {
                info!("{CONF_NAME} loaded.");
                config
            }
            Err(_) => {
                warn!("No {CONF_NAME}, using environment settings.");
                Self::default()
            }
        }
    }

    /// Parse a configuration file and export every key into the process
    /// environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))?;
        for (key, value) in &config.values {
            std::env::set_var(key, value);
        }
        Ok(config)
    }

    /// Look up a setting. Empty values count as absent; absent settings
    /// fall back to a prompt or a fixed default at the call site.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .filter(|value| !value.is_empty())
    }

    pub fn backup_name(&self) -> Option<String> {
        self.get(KEY_BACKUP_NAME)
    }

    pub fn bucket(&self) -> Option<String> {
        self.get(KEY_BUCKET)
    }

    pub fn store_dir(&self) -> Option<PathBuf> {
        self.get(KEY_STORE_DIR).map(PathBuf::from)
    }

    #[cfg(test)]
    pub(crate) fn from_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_settings_from_the_conf_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(
            temp_dir.path().join(CONF_NAME),
            r#"{"S3SYNC_BACKUP": "docs", "S3SYNC_AWS_S3_BUCKET": "bkt"}"#,
        )?;
        let config = Config::load(temp_dir.path());
        assert_eq!(config.backup_name().as_deref(), Some("docs"));
        assert_eq!(config.bucket().as_deref(), Some("bkt"));
        Ok(())
    }

    #[test]
    fn missing_file_yields_an_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path());
        assert_eq!(config.backup_name(), None);
        assert_eq!(config.bucket(), None);
        assert_eq!(config.store_dir(), None);
    }

    #[test]
    fn empty_values_count_as_absent() {
        let config = Config::from_values(HashMap::from([(
            KEY_BACKUP_NAME.to_string(),
            String::new(),
        )]));
        assert_eq!(config.backup_name(), None);
    }

    #[test]
    fn a_malformed_conf_file_is_a_config_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONF_NAME);
        fs::write(&path, b"not json at all")?;
        let result = Config::from_file(&path);
        assert!(matches!(result, Err(SyncError::Config(_))));
        Ok(())
    }

    #[test]
    fn a_missing_explicit_conf_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::from_file(&temp_dir.path().join(CONF_NAME));
        assert!(result.is_err());
    }

    #[test]
    fn file_values_are_exported_to_the_environment() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(
            temp_dir.path().join(CONF_NAME),
            r#"{"S3SYNC_CONF_TEST_EXPORT": "exported"}"#,
        )?;
        let _config = Config::load(temp_dir.path());
        assert_eq!(
            std::env::var("S3SYNC_CONF_TEST_EXPORT").ok().as_deref(),
            Some("exported")
        );
        Ok(())
    }
}
