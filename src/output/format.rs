//! Output format selection

use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// The closed set of renderings a graph can be serialized to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented listing with branch-drawing connectors.
    #[default]
    Tree,
    /// Graphviz DOT `digraph`.
    GraphDescription,
}

impl OutputFormat {
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Tree => "tree",
            OutputFormat::GraphDescription => "dot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tree" => Ok(OutputFormat::Tree),
            "dot" | "graphviz" => Ok(OutputFormat::GraphDescription),
            _ => Err(FormatError::Unsupported {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
