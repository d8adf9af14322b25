//! Directory tree walking logic
//!
//! The walker produces a lazy, deterministic, pre-order sequence of
//! [`DirectoryEntry`] records. Children are visited in lexicographic order,
//! symlinks are handled according to [`SymlinkPolicy`], and failures on
//! individual entries are recorded on the entry instead of aborting the walk.

mod config;
mod entry;
mod utils;
mod walker;

// Re-export public types
pub use config::{HiddenEntries, SymlinkPolicy, WalkerConfig};
pub use entry::{DirectoryEntry, EntryKind, LinkTarget, SymlinkInfo};
pub use utils::glob_match;
pub use walker::{Walk, Walker, walk};
