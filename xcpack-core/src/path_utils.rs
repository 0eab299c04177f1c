//! Cross-platform path utilities
//!
//! Xcode project paths always use forward slashes, while build output may be
//! produced on any host. These helpers keep generated paths consistent.

use std::path::Path;

/// Normalize path to forward slashes
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a path to a normalized string
#[inline]
pub fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// Path of `file` relative to `root`, with forward slashes.
///
/// Returns `None` when `file` is not inside `root`.
pub fn relative_project_path(root: &Path, file: &Path) -> Option<String> {
    file.strip_prefix(root).ok().map(path_to_string)
}

/// Final component of a path as an owned string
pub fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
