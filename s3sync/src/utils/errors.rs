//! Custom error types for the sync core.

use crate::remote::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Archive build error: {0}")]
    ArchiveBuild(String),

    #[error("Archive extract error: {0}")]
    ArchiveExtract(String),

    #[error("Transfer error: {0}")]
    Transfer(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
