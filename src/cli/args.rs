//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::Placement;

/// Structural merge for streamed snippets and cycle-safe tree reparenting
#[derive(Parser, Debug)]
#[command(name = "snipsplicer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory searched for a local .snipsplicer.toml (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub local_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge a snippet into a file through its language strategy
    Merge {
        /// Language tag selecting the merge strategy (e.g. css)
        language: String,

        /// File holding the current text
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Snippet file (stdin when omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        snippet: Option<PathBuf>,

        /// Write the merged text back into FILE instead of stdout
        #[arg(short, long)]
        write: bool,
    },

    /// Classify a pointer position against a target rectangle
    Classify {
        /// Pointer x, viewport coordinates
        #[arg(long)]
        x: f64,

        /// Pointer y, viewport coordinates
        #[arg(long)]
        y: f64,

        /// Target top edge
        #[arg(long)]
        top: f64,

        /// Target left edge
        #[arg(long)]
        left: f64,

        /// Target width
        #[arg(long)]
        width: f64,

        /// Target height
        #[arg(long)]
        height: f64,

        /// Edge fraction override (default: the configured drop fraction)
        #[arg(short, long)]
        fraction: Option<f64>,
    },

    /// Move a node relative to an anchor node in a snapshot
    Move {
        /// Snapshot file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,

        /// Node to move
        source: String,

        /// Anchor node
        target: String,

        /// Where the node lands relative to the anchor
        #[arg(value_enum)]
        placement: PlacementArg,
    },

    /// Add a node to a snapshot
    Add {
        /// Snapshot file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,

        /// Node id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Payload label
        #[arg(long)]
        label: Option<String>,

        /// Parent to append under (new node becomes a root when omitted)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Remove a node from a snapshot; its children become roots
    Remove {
        /// Snapshot file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,

        /// Node id to remove
        id: String,
    },

    /// Show a snapshot as a tree
    Show {
        /// Snapshot file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Ascii)]
        format: ShowFormat,
    },

    /// Print snippet-shape instructions for generative models
    Instructions {
        /// Language tag (all registered languages when omitted)
        language: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where a moved node lands relative to its anchor.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum PlacementArg {
    /// Insert as the previous sibling of the anchor
    Before,
    /// Insert as the next sibling of the anchor
    After,
    /// Append as the last child of the anchor
    Into,
}

impl From<PlacementArg> for Placement {
    fn from(arg: PlacementArg) -> Self {
        match arg {
            PlacementArg::Before => Placement::Before,
            PlacementArg::After => Placement::After,
            PlacementArg::Into => Placement::Into,
        }
    }
}

/// Output format for `show`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowFormat {
    /// Box-drawing tree
    Ascii,
    /// Markdown outline
    Markdown,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
