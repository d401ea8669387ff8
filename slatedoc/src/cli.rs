//! Command-line interface definitions for slatedoc

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the slatedoc application
#[derive(Parser)]
#[command(name = "slatedoc")]
#[command(version)]
#[command(about = "Slate-style API reference pages from Markdown", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for slatedoc
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new documentation directory
    Init {
        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Page title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Render a markdown source into a single HTML page
    Build {
        /// Main markdown file
        #[arg(value_name = "INPUT", default_value = "index.md")]
        input: PathBuf,

        /// Output HTML file
        #[arg(short, long, default_value = "index.html")]
        output: PathBuf,

        /// Configuration file (defaults to slate.toml next to the input)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the table of contents a build would produce
    Toc {
        /// Main markdown file
        #[arg(value_name = "INPUT", default_value = "index.md")]
        input: PathBuf,

        /// Configuration file (defaults to slate.toml next to the input)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
