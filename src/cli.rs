use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// modchange - order pending mod changes for review and installation
#[derive(Parser)]
#[command(name = "modchange")]
#[command(about = "Orders mod install/remove/update change sets into dependency-grouped plans")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sequence a change set and print it in review order
    Sequence {
        /// Path to the change set JSON file
        changes: PathBuf,

        /// Path to a sequencer configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to a JSON map of module identifier to advisory label
        #[arg(short, long)]
        alerts: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Report changes that would be omitted and reason cycles
    Check {
        /// Path to the change set JSON file
        changes: PathBuf,

        /// Path to a sequencer configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a sequencer configuration file
    ValidateConfig {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

/// How `sequence` prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One aligned row per actionable change
    Text,
    /// The full sequenced change list as JSON
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
