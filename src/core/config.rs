//! Optional JSON configuration file
//!
//! ```json
//! {
//!   "include": ["src"],
//!   "exclude": [".git", "node_modules"],
//!   "policy": "strict-and",
//!   "match_target": "file-name",
//!   "encoding": "utf-8",
//!   "model": "cl100k"
//! }
//! ```
//!
//! Every field is optional. Values given on the command line (or through the
//! environment) take precedence; include/exclude lists are merged.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::filter::{FilterPolicy, MatchTarget};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub policy: Option<FilterPolicy>,
    pub match_target: Option<MatchTarget>,
    pub encoding: Option<String>,
    pub model: Option<String>,
}

impl FileConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Invalid config JSON")
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("In config file {}", path.display()))
    }
}
