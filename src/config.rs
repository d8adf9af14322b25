//! Top-level configuration and the walk, build, serialize pipeline

use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::graph::{Graph, GraphBuilder};
use crate::output::{OutputConfig, OutputFormat, serialize_with};
use crate::tree::{WalkerConfig, Walker};

/// Everything needed to turn a root directory into text.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub walker: WalkerConfig,
    pub format: OutputFormat,
    pub output: OutputConfig,
}

/// Walk `root` and build its graph.
pub fn generate(root: &Path, config: &WalkerConfig) -> Result<Graph, Error> {
    let mut walk = Walker::new(config.clone()).walk(root)?;
    let mut builder = GraphBuilder::new();
    for entry in walk.by_ref() {
        builder.push(entry)?;
    }
    debug!(entries = walk.emitted(), truncated = walk.is_truncated(), "walk finished");
    Ok(builder.truncated(walk.is_truncated()).finish()?)
}

/// Walk, build and serialize in one call.
pub fn render(root: &Path, config: &Config) -> Result<String, Error> {
    let graph = generate(root, &config.walker)?;
    Ok(serialize_with(&graph, config.format, &config.output))
}
