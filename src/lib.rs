//! hexamma - folder structure graph generator
//!
//! Walks a directory tree, folds it into a node/edge graph and renders the
//! graph as an indented tree or as a Graphviz DOT description.

pub mod config;
pub mod error;
pub mod graph;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Config, generate, render};
pub use error::{BuildError, EntryAccessError, Error, FormatError, WalkError};
pub use graph::{Graph, GraphBuilder, GraphStats, Node, NodeId, NodeKind, build};
pub use output::{OutputConfig, OutputFormat, TreeFormatter, serialize, serialize_as};
pub use tree::{DirectoryEntry, EntryKind, HiddenEntries, SymlinkPolicy, Walker, WalkerConfig, walk};
