//! Graphviz DOT output
//!
//! Nodes are declared as `n<index>` in insertion order with a quoted label,
//! followed by one statement per edge in edge order. Reference edges are
//! drawn dashed.

use std::fmt::Write;

use crate::graph::{EdgeKind, Graph, Node, NodeKind};

use super::config::OutputConfig;

/// Formatter for DOT `digraph` output.
pub struct DotFormatter {
    config: OutputConfig,
}

impl DotFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, graph: &Graph) -> String {
        let mut dot = String::new();
        // writing into a String cannot fail
        let _ = self.write_dot(graph, &mut dot);
        dot
    }

    fn write_dot(&self, graph: &Graph, dot: &mut String) -> std::fmt::Result {
        writeln!(dot, "digraph \"{}\" {{", escape_label(&self.config.graph_name))?;

        for (index, node) in graph.nodes().enumerate() {
            writeln!(
                dot,
                "  n{} [label=\"{}\", shape={}];",
                index,
                escape_label(&node_label(node)),
                shape(node.kind)
            )?;
        }

        for edge in graph.edges() {
            let (Some(from), Some(to)) = (graph.index_of(&edge.from), graph.index_of(&edge.to))
            else {
                continue;
            };
            match edge.kind {
                EdgeKind::Tree => writeln!(dot, "  n{} -> n{};", from, to)?,
                EdgeKind::Reference => writeln!(dot, "  n{} -> n{} [style=dashed];", from, to)?,
            }
        }

        writeln!(dot, "}}")
    }
}

fn node_label(node: &Node) -> String {
    if node.kind.is_dir() && !node.label.ends_with('/') {
        format!("{}/", node.label)
    } else {
        node.label.clone()
    }
}

fn shape(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Directory => "folder",
        NodeKind::File => "note",
        NodeKind::SymlinkToDir | NodeKind::SymlinkToFile => "cds",
        NodeKind::Broken | NodeKind::Other => "octagon",
    }
}

/// Escape text for a DOT double-quoted string.
///
/// Backslashes and quotes get a backslash; newlines become `\n` so the
/// statement stays on one line. Other characters, carriage returns
/// included, are legal inside a quoted DOT string and pass through.
pub fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::graph::build;
    use crate::tree::{DirectoryEntry, EntryKind, LinkTarget, SymlinkInfo, SymlinkPolicy};

    use super::*;

    fn entry(path: &str, kind: EntryKind, parent: Option<&str>) -> DirectoryEntry {
        DirectoryEntry {
            path: PathBuf::from(path),
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            kind,
            depth: path.matches('/').count(),
            parent_path: parent.map(PathBuf::from),
            canonical_path: PathBuf::from("/abs").join(path),
            symlink: None,
            failure: None,
        }
    }

    /// Read back every `label="..."` value the way a DOT lexer would.
    fn parse_labels(dot: &str) -> Vec<String> {
        let mut labels = Vec::new();
        let mut rest = dot;
        while let Some(start) = rest.find("label=\"") {
            let mut chars = rest[start + 7..].char_indices();
            let mut label = String::new();
            let mut end = 0;
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some((_, '"')) => label.push('"'),
                        Some((_, '\\')) => label.push('\\'),
                        Some((_, 'n')) => label.push('\n'),
                        Some((_, other)) => {
                            label.push('\\');
                            label.push(other);
                        }
                        None => break,
                    },
                    '"' => {
                        end = i;
                        break;
                    }
                    _ => label.push(c),
                }
            }
            labels.push(label);
            rest = &rest[start + 7 + end + 1..];
        }
        labels
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("plain"), "plain");
        assert_eq!(escape_label("weird\"name"), "weird\\\"name");
        assert_eq!(escape_label("back\\slash"), "back\\\\slash");
        assert_eq!(escape_label("two\nlines"), "two\\nlines");
        assert_eq!(escape_label("a\rb"), "a\rb");
    }

    #[test]
    fn test_quoted_label_round_trips() {
        let graph = build(vec![
            entry("r", EntryKind::Directory, None),
            entry("r/weird\"name", EntryKind::File, Some("r")),
            entry("r/tricky\\\"end\\", EntryKind::File, Some("r")),
            entry("r/cr\rname", EntryKind::File, Some("r")),
            entry("r/line\nbreak", EntryKind::File, Some("r")),
        ])
        .unwrap();
        let dot = DotFormatter::new(OutputConfig::plain()).format(&graph);
        let labels = parse_labels(&dot);
        assert_eq!(
            labels,
            vec!["r/", "weird\"name", "tricky\\\"end\\", "cr\rname", "line\nbreak"]
        );
    }

    #[test]
    fn test_dot_structure() {
        let mut link = entry("r/alias", EntryKind::Symlink, Some("r"));
        link.symlink = Some(SymlinkInfo {
            target: Some(PathBuf::from("docs")),
            resolved: Some(PathBuf::from("/abs/r/docs")),
            target_kind: LinkTarget::Directory,
            policy: SymlinkPolicy::RecordOnly,
            descended: false,
            cycle: false,
        });
        let graph = build(vec![
            entry("r", EntryKind::Directory, None),
            link,
            entry("r/docs", EntryKind::Directory, Some("r")),
            entry("r/docs/readme", EntryKind::File, Some("r/docs")),
        ])
        .unwrap();
        let dot = DotFormatter::new(OutputConfig::plain()).format(&graph);

        assert!(dot.starts_with("digraph \"hexamma\" {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("  n0 [label=\"r/\", shape=folder];\n"));
        assert!(dot.contains("  n1 [label=\"alias\", shape=cds];\n"));
        assert!(dot.contains("  n3 [label=\"readme\", shape=note];\n"));
        assert!(dot.contains("  n0 -> n1;\n"));
        assert!(dot.contains("  n2 -> n3;\n"));
        assert!(dot.contains("  n1 -> n2 [style=dashed];\n"));
        assert_eq!(dot.matches("->").count(), 4);
    }
}
