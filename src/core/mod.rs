//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Include/exclude filter predicate
//! - Report model and token accumulator
//! - Rendering for text and jsonl output
//! - Path display utilities
//! - File reading under a configurable encoding
//! - Tokenization for token statistics
//! - JSON config file loading

pub mod config;
pub mod file_reader;
pub mod filter;
pub mod model;
pub mod paths;
pub mod render;
pub mod tokenizer;
