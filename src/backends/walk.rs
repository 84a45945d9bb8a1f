//! Directory traversal backend
//!
//! Walks the tree with walkdir (every file, hidden and ignored ones included) or, with
//! `respect_ignore`, with the ignore crate honoring .gitignore/.ignore. Entries are
//! produced lazily: each file is filtered, read and decoded only when the iterator is
//! advanced, and [`Traversal::entries`] starts a fresh walk on every call.
//!
//! Only regular files are reported. Directory symlinks are not followed, so no cycle
//! detection is needed; file symlinks are read like regular files and dangling ones
//! surface as read errors. FIFOs, sockets and device nodes are skipped.

use ignore::WalkBuilder;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::core::file_reader::{read_text, TextEncoding};
use crate::core::filter::FilterConfig;
use crate::core::model::ReportEntry;
use crate::core::paths::display_path;

/// Traversal options that are not part of the filter itself
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Show and match paths relative to the root
    pub relative: bool,
    /// Honor .gitignore/.ignore files
    pub respect_ignore: bool,
    /// Visit directory entries sorted by file name
    pub sort: bool,
    /// Encoding used to decode file content
    pub encoding: TextEncoding,
}

/// A configured, restartable walk over one root
#[derive(Debug, Clone)]
pub struct Traversal {
    root: PathBuf,
    filter: FilterConfig,
    options: WalkOptions,
}

impl Traversal {
    pub fn new(root: impl Into<PathBuf>, filter: FilterConfig, options: WalkOptions) -> Self {
        Self {
            root: root.into(),
            filter,
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a new walk from the root
    pub fn entries(&self) -> Entries<'_> {
        let files: Box<dyn Iterator<Item = PathBuf>> = if self.options.respect_ignore {
            Box::new(ignore_files(&self.root, self.options.sort))
        } else {
            Box::new(walkdir_files(&self.root, self.options.sort))
        };

        Entries {
            traversal: self,
            files,
        }
    }
}

/// Lazy sequence of report entries
pub struct Entries<'a> {
    traversal: &'a Traversal,
    files: Box<dyn Iterator<Item = PathBuf> + 'a>,
}

impl Iterator for Entries<'_> {
    type Item = ReportEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let traversal = self.traversal;

        loop {
            let path = self.files.next()?;
            let shown = display_path(&path, &traversal.root, traversal.options.relative);

            if !traversal.filter.accepts(&shown, &path) {
                trace!(path = %shown, "filtered out");
                continue;
            }

            let entry = match read_text(&path, traversal.options.encoding) {
                Ok(content) => ReportEntry::content(shown, content),
                Err(err) => {
                    warn!(path = %shown, error = %err, "could not read file");
                    ReportEntry::error(shown, err)
                }
            };
            return Some(entry);
        }
    }
}

fn walkdir_files(root: &Path, sort: bool) -> impl Iterator<Item = PathBuf> {
    let mut walker = WalkDir::new(root);
    if sort {
        walker = walker.sort_by_file_name();
    }

    walker.into_iter().filter_map(|entry| match entry {
        Ok(e) if is_reportable(e.path(), Some(e.file_type())) => Some(e.into_path()),
        Ok(e) => {
            trace!(path = %e.path().display(), "not a regular file");
            None
        }
        Err(err) => {
            warn!(error = %err, "skipping entry");
            None
        }
    })
}

fn ignore_files(root: &Path, sort: bool) -> impl Iterator<Item = PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .parents(false)
        .require_git(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true);

    if sort {
        builder.sort_by_file_name(|a, b| a.cmp(b));
    }

    builder.build().filter_map(|entry| match entry {
        Ok(e) if is_reportable(e.path(), e.file_type()) => Some(e.into_path()),
        Ok(e) => {
            trace!(path = %e.path().display(), "not a regular file");
            None
        }
        Err(err) => {
            warn!(error = %err, "skipping entry");
            None
        }
    })
}

/// Regular files, symlinks resolving to regular files, and dangling symlinks
fn is_reportable(path: &Path, file_type: Option<FileType>) -> bool {
    match file_type {
        Some(t) if t.is_file() => true,
        Some(t) if t.is_symlink() => match fs::metadata(path) {
            Ok(meta) => meta.is_file(),
            Err(_) => true,
        },
        _ => false,
    }
}
