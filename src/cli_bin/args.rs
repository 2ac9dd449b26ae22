//! Command-line argument definitions and parsing
//!
//! Flags here only override fields of the loaded [`ExportConfig`]; the
//! command handlers turn them into library calls.

use clap::{Args, Parser, Subcommand, ValueEnum};
use llmsexport::{ExportConfig, LineEndings};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "llmsexport",
    version,
    about = "Export a Markdown documentation tree into llms.txt artifacts",
    long_about = "llmsexport reads an ordered Markdown content tree, renders an index \
                  (llms.txt) and a full concatenation (llms-full.txt), and rewrites \
                  Docusaurus admonitions into plain block quotes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./llmsexport.yaml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Render both artifacts and normalize them
    Build(BuildArgs),
    /// Normalize admonitions in existing artifacts
    Clean(CleanArgs),
    /// Show the final document order
    Order(OrderArgs),
    /// Show the landing-page video list and embed URL
    Video(VideoArgs),
}

/// Content tree options
#[derive(Args, Debug, Clone)]
pub struct SourceOptions {
    /// Root of the Markdown content tree
    #[arg(long, value_name = "DIR")]
    pub docs_dir: Option<PathBuf>,

    /// Exclude documents that match no ordering pattern
    #[arg(long)]
    pub drop_unmatched: bool,

    /// Include hidden files and directories (starting with .)
    #[arg(long)]
    pub include_hidden: bool,
}

impl SourceOptions {
    pub fn apply(&self, config: &mut ExportConfig) {
        if let Some(dir) = &self.docs_dir {
            config.docs_dir = dir.clone();
        }
        if self.drop_unmatched {
            config.include_unmatched_last = false;
        }
    }
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    /// Output directory for the artifacts
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Preview changes without modifying files (show diff)
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the admonition normalizer
    #[arg(long)]
    pub no_clean: bool,

    /// Write files directly instead of through a temp file
    #[arg(long)]
    pub no_atomic: bool,

    /// Line ending style
    #[arg(long, value_enum)]
    pub line_endings: Option<LineEndingStyle>,
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Directory holding the artifacts
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Files to clean instead of the two configured artifacts
    pub files: Vec<PathBuf>,
}

/// Arguments for the order command
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OrderFormat,
}

/// Arguments for the video command
#[derive(Args, Debug)]
pub struct VideoArgs {
    /// Video id to select
    #[arg(long, value_name = "ID")]
    pub select: Option<String>,
}

/// Line ending styles for output
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LineEndingStyle {
    /// Unix-style line endings (\n)
    Unix,
    /// Windows-style line endings (\r\n)
    Windows,
    /// Keep rendered line endings
    Preserve,
}

impl From<LineEndingStyle> for LineEndings {
    fn from(style: LineEndingStyle) -> Self {
        match style {
            LineEndingStyle::Unix => LineEndings::Unix,
            LineEndingStyle::Windows => LineEndings::Windows,
            LineEndingStyle::Preserve => LineEndings::Preserve,
        }
    }
}

/// Output formats for the order command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFormat {
    /// Numbered list
    Human,
    /// JSON document
    Json,
}
