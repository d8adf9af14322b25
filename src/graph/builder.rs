//! GraphBuilder - folds walker entries into a `Graph`

use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::BuildError;
use crate::tree::{DirectoryEntry, SymlinkPolicy};

use super::model::Graph;
use super::node::{Edge, EdgeKind, Node, NodeId};

/// Incremental graph construction.
///
/// Entries must arrive parents first, which pre-order traversal
/// guarantees. The partially built graph is never exposed; `finish`
/// hands out the completed value.
#[derive(Default)]
pub struct GraphBuilder {
    root: Option<NodeId>,
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    by_path: HashMap<PathBuf, NodeId>,
    /// Symlink node and resolved target, resolved once all nodes exist.
    pending_refs: Vec<(NodeId, PathBuf)>,
    truncated: bool,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the graph as built from a truncated walk.
    pub fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn push(&mut self, entry: DirectoryEntry) -> Result<(), BuildError> {
        let node = Node::from_entry(&entry);
        let id = node.id.clone();

        if self.nodes.contains_key(&id) {
            debug!(id = %id, "dropping duplicate entry");
            return Ok(());
        }

        match &entry.parent_path {
            None => {
                if self.root.is_some() {
                    return Err(BuildError::DuplicateRoot { path: entry.path });
                }
                if entry.depth != 0 {
                    return Err(BuildError::MissingRoot);
                }
                self.root = Some(id.clone());
            }
            Some(parent) => {
                if self.root.is_none() {
                    return Err(BuildError::MissingRoot);
                }
                let Some(parent_id) = self.by_path.get(parent) else {
                    return Err(BuildError::Structural {
                        path: entry.path,
                        parent: parent.clone(),
                    });
                };
                self.edges.push(Edge {
                    from: parent_id.clone(),
                    to: id.clone(),
                    kind: EdgeKind::Tree,
                });
            }
        }

        if let Some(link) = &entry.symlink {
            if link.policy == SymlinkPolicy::RecordOnly {
                if let Some(resolved) = &link.resolved {
                    self.pending_refs.push((id.clone(), resolved.clone()));
                }
            }
        }

        self.by_path.insert(entry.path, id.clone());
        self.nodes.insert(id, node);
        Ok(())
    }

    pub fn finish(mut self) -> Result<Graph, BuildError> {
        let root = self.root.take().ok_or(BuildError::MissingRoot)?;

        for (from, target) in std::mem::take(&mut self.pending_refs) {
            let to = NodeId::from_path(&target);
            if to != from && self.nodes.contains_key(&to) {
                self.edges.push(Edge {
                    from,
                    to,
                    kind: EdgeKind::Reference,
                });
            }
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph built"
        );
        Ok(Graph::new(root, self.nodes, self.edges, self.truncated))
    }
}

/// Build a graph from an entry sequence in one go.
pub fn build<I>(entries: I) -> Result<Graph, BuildError>
where
    I: IntoIterator<Item = DirectoryEntry>,
{
    let mut builder = GraphBuilder::new();
    for entry in entries {
        builder.push(entry)?;
    }
    builder.finish()
}
