//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Browse design variables as a tree and move them between collections
#[derive(Parser, Debug)]
#[command(name = "vartree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Variable snapshot (overrides configured store_path)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    /// Project directory holding .vartree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List collections
    Collections,

    /// Show a collection's variables as a tree
    Tree {
        /// Collection id or name (default: configured or first)
        #[arg(short, long)]
        collection: Option<String>,
        /// Only show paths containing this text
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Move variables to another collection
    Swap {
        /// Source collection id or name
        #[arg(short, long)]
        collection: String,
        /// Target collection id or name
        #[arg(short, long)]
        to: String,
        /// Select a group or variable by path (repeatable)
        #[arg(long = "select", value_name = "PATH")]
        paths: Vec<String>,
        /// Variable ids to move
        ids: Vec<String>,
        /// Do not write the snapshot back
        #[arg(long)]
        dry_run: bool,
    },

    /// Answer JSON intents from stdin with JSON events on stdout
    Serve {
        /// Write the snapshot back on exit
        #[arg(long)]
        write: bool,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
