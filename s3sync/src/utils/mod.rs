//! Shared utilities: error types and logging.

pub mod errors;
pub mod logger;
