//! Path display utilities
//!
//! Paths shown in the report are either the walked path as-is (absolute when the root
//! was canonicalized) or relative to the root, always with '/' as separator. On Unix a
//! backslash is an ordinary file name character and is kept.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
#[cfg(windows)]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Paths already use '/' as separator
#[cfg(not(windows))]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Path string used both for display and for full-path matching
pub fn display_path(path: &Path, root: &Path, relative: bool) -> String {
    if relative {
        make_relative(path, root).unwrap_or_else(|| normalize_path(path))
    } else {
        normalize_path(path)
    }
}
