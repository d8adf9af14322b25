//! Graph serialization
//!
//! This module renders an immutable `Graph` into text:
//! - `tree` - indented listing with branch connectors (also printable in color)
//! - `dot` - Graphviz DOT description
//!
//! Both renderings are pure: no filesystem access, no mutation of the graph.

mod config;
mod dot;
mod format;
mod tree;

// Re-export public types and functions
pub use config::OutputConfig;
pub use dot::{DotFormatter, escape_label};
pub use format::OutputFormat;
pub use tree::TreeFormatter;

use crate::error::FormatError;
use crate::graph::Graph;

/// Render `graph` in `format` with plain (uncolored) defaults.
pub fn serialize(graph: &Graph, format: OutputFormat) -> String {
    serialize_with(graph, format, &OutputConfig::plain())
}

pub fn serialize_with(graph: &Graph, format: OutputFormat, config: &OutputConfig) -> String {
    match format {
        OutputFormat::Tree => TreeFormatter::new(config.clone()).format(graph),
        OutputFormat::GraphDescription => DotFormatter::new(config.clone()).format(graph),
    }
}

/// Render `graph` in the format named `format`.
///
/// Unknown names fail before anything is rendered.
pub fn serialize_as(graph: &Graph, format: &str) -> Result<String, FormatError> {
    let format: OutputFormat = format.parse()?;
    Ok(serialize(graph, format))
}
