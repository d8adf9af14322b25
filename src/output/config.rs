//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Name of the `digraph` in DOT output.
    pub graph_name: String,
}

impl OutputConfig {
    /// No colors, default graph name.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            ..Default::default()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            graph_name: "hexamma".to_string(),
        }
    }
}
