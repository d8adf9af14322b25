//! The immutable directory graph

use indexmap::IndexMap;
use serde::Serialize;

use super::node::{Edge, EdgeKind, Node, NodeId, NodeKind};

/// Nodes and edges of one walked directory tree.
///
/// Nodes keep their insertion order and edges their traversal order, so
/// two graphs built from the same entries are identical. Only the builder
/// constructs a `Graph`; afterwards it is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    root: NodeId,
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    truncated: bool,
    /// Tree children per node position, in edge order.
    #[serde(skip)]
    child_index: Vec<Vec<usize>>,
    /// Tree parent per node position.
    #[serde(skip)]
    parent_index: Vec<Option<usize>>,
}

/// Node counts by kind. The root is not counted as a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    pub broken: usize,
    pub other: usize,
}

impl Graph {
    pub(crate) fn new(
        root: NodeId,
        nodes: IndexMap<NodeId, Node>,
        edges: Vec<Edge>,
        truncated: bool,
    ) -> Self {
        let mut child_index = vec![Vec::new(); nodes.len()];
        let mut parent_index = vec![None; nodes.len()];
        for edge in edges.iter().filter(|e| e.kind == EdgeKind::Tree) {
            if let (Some(from), Some(to)) =
                (nodes.get_index_of(&edge.from), nodes.get_index_of(&edge.to))
            {
                child_index[from].push(to);
                parent_index[to] = Some(from);
            }
        }
        Self {
            root,
            nodes,
            edges,
            truncated,
            child_index,
            parent_index,
        }
    }

    fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    pub fn root(&self) -> &Node {
        // the builder never hands out a graph without its root node
        &self.nodes[&self.root]
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Position of a node in insertion order.
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn tree_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Tree)
    }

    pub fn reference_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Reference)
    }

    /// Tree children of `id` in edge order.
    pub fn children(&self, id: &NodeId) -> Vec<&Node> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };
        self.child_index[index]
            .iter()
            .filter_map(|&child| self.node_at(child))
            .collect()
    }

    /// Tree parent of `id`; `None` for the root.
    pub fn parent(&self, id: &NodeId) -> Option<&Node> {
        let index = self.index_of(id)?;
        self.parent_index[index].and_then(|parent| self.node_at(parent))
    }

    /// True when the walk stopped at its entry limit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats::default();
        for node in self.nodes.values().filter(|n| n.id != self.root) {
            match node.kind {
                NodeKind::Directory => stats.directories += 1,
                NodeKind::File => stats.files += 1,
                NodeKind::SymlinkToDir | NodeKind::SymlinkToFile => stats.symlinks += 1,
                NodeKind::Broken => stats.broken += 1,
                NodeKind::Other => stats.other += 1,
            }
        }
        stats
    }
}
