//! Tree formatter for indented text output
//!
//! This module provides `TreeFormatter` which re-walks the tree edges of a
//! `Graph` in pre-order and renders one line per node with branch-drawing
//! connectors, either to a string or to a colored terminal.

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::graph::{Annotation, Graph, Node, NodeKind};

use super::config::OutputConfig;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// One rendered line, split so colors can be applied to the label only.
struct TreeLine<'a> {
    prefix: String,
    connector: &'static str,
    node: &'a Node,
}

/// Formatter for indented tree output.
pub struct TreeFormatter {
    config: OutputConfig,
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, graph: &Graph) -> String {
        let mut output = String::new();
        for line in collect_lines(graph) {
            output.push_str(&line.prefix);
            output.push_str(line.connector);
            output.push_str(&label(line.node));
            output.push_str(&suffix(line.node));
            output.push('\n');
        }
        output
    }

    pub fn print(&self, graph: &Graph) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_colored(graph, &mut stdout)
    }

    /// Write the tree to any color-capable sink.
    pub fn write_colored<W: WriteColor>(&self, graph: &Graph, out: &mut W) -> io::Result<()> {
        for line in collect_lines(graph) {
            write!(out, "{}{}", line.prefix, line.connector)?;
            if let Some(spec) = color_for(line.node.kind) {
                out.set_color(&spec)?;
            }
            write!(out, "{}", label(line.node))?;
            out.reset()?;
            writeln!(out, "{}", suffix(line.node))?;
        }
        Ok(())
    }
}

/// Pre-order walk over tree edges, siblings ordered by label.
fn collect_lines(graph: &Graph) -> Vec<TreeLine<'_>> {
    let mut lines = Vec::with_capacity(graph.len());
    let root = graph.root();
    lines.push(TreeLine {
        prefix: String::new(),
        connector: "",
        node: root,
    });
    collect_children(graph, root, "", &mut lines);
    lines
}

fn collect_children<'a>(graph: &'a Graph, parent: &Node, prefix: &str, lines: &mut Vec<TreeLine<'a>>) {
    let mut children = graph.children(&parent.id);
    children.sort_by(|a, b| a.label.cmp(&b.label));

    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let is_last = i + 1 == count;
        lines.push(TreeLine {
            prefix: prefix.to_string(),
            connector: if is_last { LAST_BRANCH } else { BRANCH },
            node: child,
        });
        let child_prefix = format!("{}{}", prefix, if is_last { SPACE_INDENT } else { PIPE_INDENT });
        collect_children(graph, child, &child_prefix, lines);
    }
}

/// Name plus the kind marker: `dir/` and `link -> target`.
fn label(node: &Node) -> String {
    let mut text = escape_control(&node.label);
    if node.kind.is_dir() {
        if !text.ends_with('/') {
            text.push('/');
        }
    } else if let Some(target) = &node.link_target {
        text.push_str(" -> ");
        text.push_str(&escape_control(&target.display().to_string()));
        if node.kind == NodeKind::SymlinkToDir {
            text.push('/');
        }
    }
    text
}

/// Render control characters as escapes so every node stays on one line.
fn escape_control(text: &str) -> String {
    if !text.chars().any(char::is_control) {
        return text.to_string();
    }
    text.chars()
        .map(|c| {
            if c.is_control() {
                c.escape_default().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}

fn suffix(node: &Node) -> String {
    match (&node.annotation, node.kind) {
        (Some(Annotation::Cycle), _) => " [cycle]".to_string(),
        (Some(Annotation::AccessFailed(reason)), _) => format!(" [error: {}]", reason),
        (None, NodeKind::Broken) => " [broken]".to_string(),
        (None, _) => String::new(),
    }
}

fn color_for(kind: NodeKind) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match kind {
        NodeKind::Directory => spec.set_fg(Some(Color::Blue)).set_bold(true),
        NodeKind::SymlinkToDir | NodeKind::SymlinkToFile => spec.set_fg(Some(Color::Cyan)),
        NodeKind::Broken | NodeKind::Other => spec.set_fg(Some(Color::Red)),
        NodeKind::File => return None,
    };
    Some(spec)
}
