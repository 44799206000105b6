//! Transfer observability helpers.

pub mod progress;
