//! CLI parse: clap types for pinseed. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pinseed CLI - content-addressed directory seeding with recursive pinning
#[derive(Parser)]
#[command(name = "pinseed")]
#[command(about = "Seed asset bundles into a content-addressed store and keep them pinned")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Repository root (defaults to the platform data directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the bundled init documentation and directory index
    Init,
    /// Seed files as one pinned directory named by their base names
    Add {
        /// Files to seed
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the entries of a directory
    Ls {
        /// Directory ContentId (hex)
        id: String,
    },
    /// Print the raw bytes stored under an id
    Cat {
        /// ContentId (hex)
        id: String,
    },
    /// Manage pins
    Pin {
        #[command(subcommand)]
        command: PinCommands,
    },
}

#[derive(Subcommand)]
pub enum PinCommands {
    /// Pin an id (recursively unless --direct)
    Add {
        /// ContentId (hex)
        id: String,
        /// Protect only the id itself, not what it references
        #[arg(long)]
        direct: bool,
    },
    /// Remove a pin
    Rm {
        /// ContentId (hex)
        id: String,
    },
    /// List pins
    Ls {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List every id protected by the current pins
    Live,
}
