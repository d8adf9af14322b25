//! Configuration types for the filesystem walker

use serde::Serialize;

/// What to do when the walk meets a symbolic link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymlinkPolicy {
    /// Descend into linked directories unless that would close a cycle.
    Follow,
    /// Emit the link but never descend.
    Skip,
    /// Emit the link as a leaf and remember its target for a reference edge.
    #[default]
    RecordOnly,
}

/// Whether dot-prefixed entries are part of the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenEntries {
    Include,
    #[default]
    Exclude,
}

/// Configuration for tree walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Deepest level that is listed; `None` walks everything.
    pub max_depth: Option<usize>,
    pub hidden: HiddenEntries,
    pub symlinks: SymlinkPolicy,
    /// Glob patterns matched against entry names.
    pub ignore_patterns: Vec<String>,
    pub dirs_only: bool,
    /// Stop after this many entries. The root counts toward the limit and
    /// is always emitted, so `Some(0)` yields the root alone.
    pub max_entries: Option<usize>,
}

impl WalkerConfig {
    pub fn at_max_depth(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }

    pub fn show_hidden(&self) -> bool {
        self.hidden == HiddenEntries::Include
    }
}
