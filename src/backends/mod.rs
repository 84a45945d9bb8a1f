//! Backends module - File system traversal
//!
//! Provides:
//! - walk: Lazy, filtered directory traversal with walkdir/ignore

pub mod walk;
