//! CLI entry point for hexamma

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use hexamma::{
    Graph, HiddenEntries, OutputConfig, OutputFormat, SymlinkPolicy, TreeFormatter, WalkerConfig,
    generate, output::serialize_with,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Symlink handling
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SymlinkMode {
    /// Descend into linked directories, stopping at cycles
    Follow,
    /// Show links, never descend
    Skip,
    /// Show links as leaves and link them to their targets
    #[default]
    Record,
}

impl From<SymlinkMode> for SymlinkPolicy {
    fn from(mode: SymlinkMode) -> Self {
        match mode {
            SymlinkMode::Follow => SymlinkPolicy::Follow,
            SymlinkMode::Skip => SymlinkPolicy::Skip,
            SymlinkMode::Record => SymlinkPolicy::RecordOnly,
        }
    }
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hexamma")]
#[command(about = "Simple folder structure graph generator")]
#[command(version)]
struct Args {
    /// Directory to display
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Include hidden (dot) entries
    #[arg(short, long)]
    all: bool,

    /// Descend only N levels deep
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// List directories only
    #[arg(short = 'd', long = "dirs-only")]
    dirs_only: bool,

    /// Ignore entries matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// How to treat symbolic links
    #[arg(long = "symlinks", value_name = "MODE", default_value = "record")]
    symlinks: SymlinkMode,

    /// Output format: tree or dot
    #[arg(short = 'f', long = "format", default_value = "tree")]
    format: String,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stop after N entries
    #[arg(long = "max-entries", value_name = "N")]
    max_entries: Option<usize>,

    /// Name of the graph in dot output
    #[arg(long = "graph-name", default_value = "hexamma")]
    graph_name: String,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Omit the directory/file count after the tree
    #[arg(long = "noreport")]
    noreport: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn report(graph: &Graph) -> String {
    let stats = graph.stats();
    let dirs = stats.directories;
    let files = stats.files + stats.symlinks + stats.broken + stats.other;
    let mut line = format!("\n{} directories, {} files\n", dirs, files);
    if graph.is_truncated() {
        line.push_str("(output truncated at entry limit)\n");
    }
    line
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    // Reject unknown formats before touching the filesystem
    let format: OutputFormat = args.format.parse().unwrap_or_else(|e| {
        eprintln!("hexamma: {}", e);
        process::exit(1);
    });

    let walker_config = WalkerConfig {
        max_depth: args.level,
        hidden: if args.all {
            HiddenEntries::Include
        } else {
            HiddenEntries::Exclude
        },
        symlinks: args.symlinks.into(),
        ignore_patterns: args.ignore.clone(),
        dirs_only: args.dirs_only,
        max_entries: args.max_entries,
    };

    let graph = generate(&args.path, &walker_config).unwrap_or_else(|e| {
        eprintln!("hexamma: {}", e);
        process::exit(1);
    });

    let to_terminal = args.output.is_none() && format == OutputFormat::Tree;
    let output_config = OutputConfig {
        use_color: to_terminal && should_use_color(args.color),
        graph_name: args.graph_name.clone(),
    };

    let result = if to_terminal && output_config.use_color {
        TreeFormatter::new(output_config)
            .print(&graph)
            .and_then(|()| {
                if args.noreport {
                    Ok(())
                } else {
                    write!(io::stdout(), "{}", report(&graph))
                }
            })
    } else {
        let mut text = serialize_with(&graph, format, &output_config);
        if format == OutputFormat::Tree && !args.noreport {
            text.push_str(&report(&graph));
        }
        match &args.output {
            Some(path) => fs::write(path, text),
            None => io::stdout().write_all(text.as_bytes()),
        }
    };

    if let Err(e) = result {
        eprintln!("hexamma: error writing output: {}", e);
        process::exit(1);
    }
}
