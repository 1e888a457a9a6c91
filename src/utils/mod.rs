//! Shared formatting helpers

pub mod format;
