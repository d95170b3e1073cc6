//! CLI parse: clap types for Launchpad. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Launchpad - pipeline launcher
#[derive(Parser, Debug)]
#[command(name = "launchpad")]
#[command(about = "Browse a production hierarchy and launch applications in context")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run against the built-in demo studio
    #[arg(long)]
    pub demo: bool,

    /// Projects root (defaults to LAUNCHPAD_PROJECTS)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// JSON document store to browse instead of scanning the projects root
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

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

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive operator shell (default)
    Shell,
    /// Navigate along a path and print the listing and actions there
    Browse {
        /// Selections to push, from project down
        path: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Navigate along a path and run an action, waiting for it to finish
    Run {
        /// Action name
        action: String,
        /// Selections to push, from project down
        path: Vec<String>,
    },
    /// Validate the configuration
    Validate,
}
