//! Error types for walking, building and serializing.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Fatal errors raised while opening the traversal root.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot access '{path}': No such file or directory")]
    RootNotFound { path: PathBuf },

    #[error("'{path}' is not a directory")]
    RootNotADirectory { path: PathBuf },

    #[error("cannot access '{path}': {source}")]
    RootAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// Classify an io error raised on the root path.
    pub fn root(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::RootNotFound { path },
            _ => Self::RootAccess { path, source },
        }
    }
}

/// What the walker was doing when an entry failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessOp {
    Stat,
    List,
}

impl AccessOp {
    fn verb(self) -> &'static str {
        match self {
            AccessOp::Stat => "stat",
            AccessOp::List => "list",
        }
    }
}

/// A recovered failure on a single entry.
///
/// Unlike [`WalkError`] this never aborts a walk; it travels with the
/// entry so renderers can show what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {} '{}': {message}", .op.verb(), .path.display())]
pub struct EntryAccessError {
    pub path: PathBuf,
    pub op: AccessOp,
    pub kind: io::ErrorKind,
    pub message: String,
}

impl EntryAccessError {
    pub fn new(path: impl Into<PathBuf>, op: AccessOp, source: &io::Error) -> Self {
        Self {
            path: path.into(),
            op,
            kind: source.kind(),
            message: source.to_string(),
        }
    }

    /// Short reason suitable for inline display.
    pub fn reason(&self) -> String {
        match self.kind {
            io::ErrorKind::PermissionDenied => "permission denied".to_string(),
            io::ErrorKind::NotFound => "vanished during walk".to_string(),
            _ => self.message.clone(),
        }
    }
}

/// Errors raised when folding entries into a graph.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("entry '{path}' refers to unknown parent '{parent}'")]
    Structural { path: PathBuf, parent: PathBuf },

    #[error("no root entry: the first entry must have depth 0")]
    MissingRoot,

    #[error("second root entry '{path}'")]
    DuplicateRoot { path: PathBuf },
}

/// Errors raised when choosing an output format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unsupported output format '{format}' (supported: tree, dot)")]
    Unsupported { format: String },
}

/// Any fatal error of the walk, build, serialize pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
