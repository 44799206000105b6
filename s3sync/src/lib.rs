//! s3sync library
//!
//! Synchronizes a local working directory with a single-archive backup held
//! in a bucket of a remote object store.

pub mod actions;
pub mod archive;
pub mod config;
pub mod fs;
pub mod naming;
pub mod prompt;
pub mod remote;
pub mod transfer;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::SyncError;
pub type Result<T> = std::result::Result<T, SyncError>;
