//! Command-line interface for compendium.
//!
//! This module provides the CLI structure for the `compendium` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, ExportCommand, PrefsCommand, SketchCommand};

/// compendium - Field-notes sketches and export bundles
///
/// Replays sketches onto the annotation canvas and bundles observation
/// records into a dated CSV + JSON + images archive.
#[derive(Debug, Parser)]
#[command(name = "compendium")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bundle a record dump into a zip archive
    Export(ExportCommand),

    /// Replay a sketch script and write the artifact
    Sketch(SketchCommand),

    /// Inspect or edit stored preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
