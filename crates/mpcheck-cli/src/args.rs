//! Command-line argument definitions for the mpcheck CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the project to check, the components to
//! highlight, configuration and report paths, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the mini-program checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Project root, the directory holding the project manifest
    #[arg(help = "Path to the project root")]
    pub root: String,

    /// Logical path (or directory) whose hierarchy subtree is highlighted
    #[arg(long = "highlight", value_name = "LOGICAL_PATH")]
    pub highlights: Vec<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write hierarchy, graph and errors as JSON to this path
    #[arg(short, long)]
    pub report: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
