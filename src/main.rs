//! modchange - Main entry point
//!
//! Thin command-line front end over the library: load files, sequence,
//! print.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use modchange::cli::{Cli, Commands, OutputFormat};
use modchange::{AlertFile, ChangeReview, ChangeSetFile, NoAlerts, Sequencer, SequencerConfig};

/// Initialize the tracing subscriber; `RUST_LOG` overrides the default level
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Sequence {
            changes,
            config,
            alerts,
            format,
        } => run_sequence(&changes, config.as_deref(), alerts.as_deref(), format),
        Commands::Check { changes, config } => run_check(&changes, config.as_deref()),
        Commands::ValidateConfig { config } => {
            info!("Validating configuration file: {:?}", config);
            match SequencerConfig::load_from_file(&config).and_then(|c| c.validate()) {
                Ok(()) => {
                    println!("✓ Configuration file is valid: {}", config.display());
                    Ok(())
                }
                Err(e) => {
                    error!("Configuration validation failed: {:#}", e);
                    eprintln!("✗ Configuration validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Load and validate the sequencer config, falling back to defaults
fn load_sequencer(config: Option<&Path>) -> Result<Sequencer> {
    let config = match config {
        Some(path) => {
            let config = SequencerConfig::load_from_file(path)?;
            config
                .validate()
                .with_context(|| format!("Invalid configuration in {:?}", path))?;
            config
        }
        None => SequencerConfig::default(),
    };
    Ok(Sequencer::new(config.to_options()))
}

fn run_sequence(
    changes_path: &Path,
    config: Option<&Path>,
    alerts: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let sequencer = load_sequencer(config)?;
    let file = ChangeSetFile::load_from_file(changes_path)?;
    info!("Loaded {} changes from {:?}", file.changes.len(), changes_path);

    let mut review = ChangeReview::new(sequencer);
    review.update(Some(file.changes.as_slice()), None)?;

    match format {
        OutputFormat::Json => {
            let out = ChangeSetFile {
                changes: review.changes().to_vec(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let rows = match alerts {
                Some(path) => review.rows(&AlertFile::load_from_file(path)?),
                None => review.rows(&NoAlerts),
            };
            if rows.is_empty() {
                println!("No changes pending");
            }
            for row in rows {
                println!("{}", row);
            }
        }
    }

    Ok(())
}

fn run_check(changes_path: &Path, config: Option<&Path>) -> Result<()> {
    let sequencer = load_sequencer(config)?;
    let file = ChangeSetFile::load_from_file(changes_path)?;

    let orphans = sequencer.orphans(&file.changes);
    for orphan in &orphans {
        println!(
            "⚠ {} would be omitted: {}",
            orphan,
            orphan.reason.describe()
        );
    }

    match sequencer.sequence(&file.changes) {
        Ok(set) => {
            println!(
                "✓ {}",
                check_summary(file.changes.len(), set.len(), orphans.len())
            );
            Ok(())
        }
        Err(e) => {
            error!("Change set check failed: {}", e);
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

/// One-line outcome of `check`; every input entry is counted exactly once
fn check_summary(total: usize, sequenced: usize, unreachable: usize) -> String {
    let duplicates = total.saturating_sub(sequenced + unreachable);
    format!(
        "{} changes sequenced, {} unreachable, {} duplicate",
        sequenced, unreachable, duplicates
    )
}
