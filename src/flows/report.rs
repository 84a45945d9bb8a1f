//! Report flow - filtered directory contents plus optional token statistics
//!
//! Drives a [`Traversal`], renders each entry as it is produced and, when a tokenizer
//! is supplied, folds successfully read files into a caller-owned [`TokenStats`].
//! Per-file failures (read, decode, tokenize) are rendered inline and never stop the run.

use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};
use tracing::{debug, warn};

use crate::backends::walk::Traversal;
use crate::core::model::{ReportEntry, TokenStats};
use crate::core::render::{Renderer, TokenOutcome};
use crate::core::tokenizer::Tokenizer;

/// Counts for one report run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals {
    /// Entries written (matched files)
    pub entries: usize,
    /// Entries whose file could not be read
    pub read_errors: usize,
    /// Files whose content could not be tokenized
    pub token_errors: usize,
}

/// Render `entries` to `writer`, counting tokens into `stats` when `tokenizer` is set
pub fn write_report<W, I>(
    entries: I,
    renderer: &Renderer,
    tokenizer: Option<&dyn Tokenizer>,
    stats: &mut TokenStats,
    writer: &mut W,
) -> io::Result<ReportTotals>
where
    W: Write,
    I: IntoIterator<Item = ReportEntry>,
{
    let mut totals = ReportTotals::default();

    for entry in entries {
        totals.entries += 1;
        if entry.is_error() {
            totals.read_errors += 1;
        }

        let tokens = match (tokenizer, entry.text()) {
            (Some(t), Some(content)) => Some(count_entry(t, &entry.path, content, stats)),
            _ => None,
        };
        if matches!(tokens, Some(Err(_))) {
            totals.token_errors += 1;
        }

        renderer.write_entry(writer, &entry, tokens.as_ref())?;
    }

    Ok(totals)
}

fn count_entry(
    tokenizer: &dyn Tokenizer,
    path: &str,
    content: &str,
    stats: &mut TokenStats,
) -> TokenOutcome {
    match tokenizer.count(content) {
        Ok(count) => {
            stats.record(count);
            debug!(path, tokens = count, "tokenized");
            Ok(count)
        }
        Err(err) => {
            warn!(path, error = %err, "could not tokenize file");
            Err(err)
        }
    }
}

/// Run the report command, writing to stdout
pub fn run_report(
    traversal: &Traversal,
    renderer: Renderer,
    tokenizer: Option<&dyn Tokenizer>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let mut stats = TokenStats::new();

    let totals = write_report(
        traversal.entries(),
        &renderer,
        tokenizer,
        &mut stats,
        &mut writer,
    )
    .context("Failed to write report")?;

    if tokenizer.is_some() {
        renderer
            .write_summary(&mut writer, &stats)
            .context("Failed to write summary")?;
    }
    writer.flush().context("Failed to flush report")?;

    debug!(
        root = %traversal.root().display(),
        entries = totals.entries,
        read_errors = totals.read_errors,
        token_errors = totals.token_errors,
        "report complete"
    );
    Ok(())
}
