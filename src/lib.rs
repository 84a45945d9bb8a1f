//! ctxcat - print filtered directory contents as one delimited report
//!
//! ctxcat provides:
//! - Substring include/exclude filtering with two combination policies
//! - Lazy, restartable directory traversal with per-file error reporting
//! - Fenced text (or jsonl) report rendering
//! - Optional token statistics through a pluggable tokenizer

pub mod backends;
pub mod cli;
pub mod core;
pub mod flows;
