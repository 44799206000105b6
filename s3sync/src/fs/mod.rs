//! Working-tree file system helpers: exclusion rules and guarded deletion.

pub mod cleaner;
pub mod filter;
