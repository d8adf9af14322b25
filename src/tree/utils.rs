//! Shared utility functions for tree walking

use std::ffi::OsString;
use std::io;
use std::path::Path;

use glob::Pattern;
use tracing::warn;

use super::config::WalkerConfig;

/// Check if an entry name should be left out of the walk.
pub fn should_skip_name(name: &str, config: &WalkerConfig) -> bool {
    if !config.show_hidden() && is_hidden(name) {
        return true;
    }
    config
        .ignore_patterns
        .iter()
        .any(|pattern| name == pattern || glob_match(pattern, name))
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Match a glob pattern against a name.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}

/// Get the display name of a path, defaulting to the full path for roots
/// such as `.` or `/`.
pub fn get_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the names of a directory's children, sorted by name.
///
/// Entries the OS fails to yield mid-listing are logged and dropped.
pub fn read_sorted_names(path: &Path) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(path)? {
        match entry {
            Ok(e) => names.push(e.file_name()),
            Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable directory entry"),
        }
    }
    names.sort();
    Ok(names)
}
