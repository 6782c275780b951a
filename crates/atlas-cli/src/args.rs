//! Command-line argument definitions for the Atlas CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the configuration file and logging
//! verbosity; the [`Command`] picks the direction of the round trip.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Atlas diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a diagram forest as a bounded text summary
    Summarize {
        /// Path to the forest JSON file (diagram id → diagram)
        forest: String,

        /// Diagram listed first in the summary
        #[arg(short, long)]
        root: Option<String>,

        /// Write the summary to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Normalize and arrange a generated graph description
    Ingest {
        /// Path to the generated graph (JSON, optionally in a Markdown code fence)
        raw: String,

        /// Path to the template catalog JSON file
        #[arg(short, long)]
        templates: Option<String>,

        /// Mint draft identifiers for new entities
        #[arg(long)]
        draft: bool,

        /// Write the ingested entities to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}
