//! CLI argument parsing

use crate::config::OutputFormat;
use crate::output::DiagramKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Derive Mermaid diagrams from C/C++ sources
#[derive(Parser, Debug)]
#[command(name = "surveyor")]
#[command(about = "Derive Mermaid diagrams from C/C++ sources")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Whether the chosen subcommand asked for verbose output
    pub fn verbose(&self) -> bool {
        matches!(self.command, Command::Analyze { verbose: true, .. })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze sources and write diagrams and reports
    Analyze {
        /// Files or directories to analyze
        #[arg(required_unless_present = "input_json")]
        paths: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (mermaid, json, markdown, html)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Function names to highlight in the module graph (can be repeated)
        #[arg(long)]
        highlight: Vec<String>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Read sources from a JSON array of {fileName, content} records
        #[arg(long)]
        input_json: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Function nodes shown per file in the module graph
        #[arg(long)]
        max_functions: Option<usize>,

        /// Skip diagram generation
        #[arg(long)]
        no_diagrams: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print a single diagram to stdout
    Diagram {
        /// flowchart, class, call-graph or module
        kind: DiagramKind,

        /// Files or directories to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Function names to highlight in the module graph (can be repeated)
        #[arg(long)]
        highlight: Vec<String>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}
