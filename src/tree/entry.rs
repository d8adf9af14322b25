//! Records produced by the walker

use std::path::PathBuf;

use serde::Serialize;

use crate::error::EntryAccessError;

use super::config::SymlinkPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

/// What a symbolic link resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    Directory,
    File,
    Broken,
}

/// Link details attached to symlink entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymlinkInfo {
    /// Link text as stored on disk.
    pub target: Option<PathBuf>,
    /// Fully resolved target, if the link resolves.
    pub resolved: Option<PathBuf>,
    pub target_kind: LinkTarget,
    pub policy: SymlinkPolicy,
    pub descended: bool,
    /// Set when descending would revisit a directory on the current path.
    pub cycle: bool,
}

/// One filesystem object discovered during a walk.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    pub depth: usize,
    pub parent_path: Option<PathBuf>,
    /// Canonical root joined with the root-relative components.
    pub canonical_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symlink: Option<SymlinkInfo>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_failure")]
    pub failure: Option<EntryAccessError>,
}

impl DirectoryEntry {
    pub fn is_root(&self) -> bool {
        self.parent_path.is_none()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

fn serialize_failure<S: serde::Serializer>(
    failure: &Option<EntryAccessError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match failure {
        Some(f) => serializer.serialize_some(&f.to_string()),
        None => serializer.serialize_none(),
    }
}
