//! Flows module - Operations combining traversal, rendering and tokenization
//!
//! Provides:
//! - report: Filtered directory report with optional token summary

pub mod report;
