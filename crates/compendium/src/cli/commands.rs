//! CLI subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// JSON array of records, as returned by the list endpoint
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Directory to write the archive to (defaults to `export.output_dir`)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Print the export report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Sketch command arguments.
#[derive(Debug, Args)]
pub struct SketchCommand {
    /// JSON sketch script to replay
    #[arg(short, long, value_name = "FILE")]
    pub script: PathBuf,

    /// File holding an artifact to seed the canvas with
    #[arg(long, value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Canvas width in pixels (defaults to `canvas.default_width`)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Where to write the resulting artifact text
    #[arg(short, long, value_name = "FILE")]
    pub out: PathBuf,

    /// Also write the decoded PNG here
    #[arg(long, value_name = "FILE")]
    pub png: Option<PathBuf>,
}

/// Preference store commands.
#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Print a stored value
    Get {
        /// Preference key
        key: String,
    },

    /// Store a value
    Set {
        /// Preference key
        key: String,
        /// New value
        value: String,
    },

    /// Delete a stored value
    Remove {
        /// Preference key
        key: String,
    },

    /// List every stored value
    List,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
