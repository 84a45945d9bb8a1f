//! Report model
//!
//! One [`ReportEntry`] per file that passed the filter, plus the token accumulator
//! owned by whoever drives the traversal.

use serde::Serialize;

use crate::core::file_reader::ReadError;

/// What happened when a matched file was read
#[derive(Debug)]
pub enum EntryOutcome {
    /// Decoded file content
    Content(String),
    /// The file could not be opened or decoded
    Error(ReadError),
}

/// A matched file in traversal order
#[derive(Debug)]
pub struct ReportEntry {
    /// Path as displayed (and matched, for full-path targets)
    pub path: String,
    pub outcome: EntryOutcome,
}

impl ReportEntry {
    pub fn content(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            outcome: EntryOutcome::Content(content.into()),
        }
    }

    pub fn error(path: impl Into<String>, error: ReadError) -> Self {
        Self {
            path: path.into(),
            outcome: EntryOutcome::Error(error),
        }
    }

    /// File content, if it was read successfully
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            EntryOutcome::Content(c) => Some(c),
            EntryOutcome::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, EntryOutcome::Error(_))
    }
}

/// Token statistics accumulated over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenStats {
    pub file_count: usize,
    pub total_tokens: usize,
}

impl TokenStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successfully tokenized file
    pub fn record(&mut self, tokens: usize) {
        self.file_count += 1;
        self.total_tokens += tokens;
    }

    /// Mean tokens per file; 0.0 when nothing was counted
    pub fn average(&self) -> f64 {
        if self.file_count == 0 {
            0.0
        } else {
            self.total_tokens as f64 / self.file_count as f64
        }
    }
}
