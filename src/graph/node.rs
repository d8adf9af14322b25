//! Graph vertices and edges

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::tree::{DirectoryEntry, EntryKind, LinkTarget};

/// Stable node identifier, derived from the entry's canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Directory,
    File,
    SymlinkToDir,
    SymlinkToFile,
    /// Dangling link, or a link whose descent would close a cycle.
    Broken,
    /// Special files and entries that could not be accessed.
    Other,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        self == NodeKind::Directory
    }

    pub fn is_symlink(self) -> bool {
        matches!(self, NodeKind::SymlinkToDir | NodeKind::SymlinkToFile)
    }
}

/// Extra facts a renderer may want to surface next to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "reason", rename_all = "snake_case")]
pub enum Annotation {
    Cycle,
    AccessFailed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub path: PathBuf,
    /// Link text for symlink-derived nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_target: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

impl Node {
    pub fn from_entry(entry: &DirectoryEntry) -> Self {
        let mut annotation = entry
            .failure
            .as_ref()
            .map(|f| Annotation::AccessFailed(f.reason()));

        let kind = match (entry.kind, &entry.symlink) {
            (EntryKind::Directory, _) => NodeKind::Directory,
            (EntryKind::File, _) => NodeKind::File,
            (EntryKind::Symlink, Some(link)) if link.cycle => {
                annotation = Some(Annotation::Cycle);
                NodeKind::Broken
            }
            (EntryKind::Symlink, Some(link)) => match link.target_kind {
                LinkTarget::Directory => NodeKind::SymlinkToDir,
                LinkTarget::File => NodeKind::SymlinkToFile,
                LinkTarget::Broken => NodeKind::Broken,
            },
            (EntryKind::Symlink, None) => NodeKind::Broken,
            (EntryKind::Other, _) => NodeKind::Other,
        };

        let label = if entry.is_root() {
            entry.path.display().to_string()
        } else {
            entry.name.clone()
        };

        Self {
            id: NodeId::from_path(&entry.canonical_path),
            label,
            kind,
            depth: entry.depth,
            path: entry.path.clone(),
            link_target: entry.symlink.as_ref().and_then(|s| s.target.clone()),
            annotation,
        }
    }

    /// True for any node that came from a symbolic link, broken or not.
    pub fn is_link(&self) -> bool {
        self.link_target.is_some() || self.kind.is_symlink()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Parent to child containment.
    Tree,
    /// Symlink to the node of its resolved target; not a containment edge.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}
