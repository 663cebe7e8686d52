//! geodrop CLI - Command-line interface
//!
//! Evaluates the geodrop engine against a post file so tier, ranking and
//! clustering decisions can be inspected without a map UI.

mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use geodrop::config::{config_file_path, EngineConfig, LoggingSettings};
use geodrop::logging::{init_logging, LoggingGuard};

use commands::config::ConfigCommands;
use commands::frame::FrameArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "geodrop")]
#[command(version = geodrop::VERSION)]
#[command(about = "Inspect what the map would draw for a viewport", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.geodrop/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which display tier a span falls in
    Classify {
        /// Visible latitude span in degrees
        span: f64,
    },

    /// Evaluate posts at a viewport and print the frame as JSON
    Frame(FrameArgs),

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);

    match cli.command {
        // Runs without loading the file so `config init --force` can repair it
        Commands::Config { command } => {
            let _logging_guard = start_logging(LoggingSettings::default(), cli.log_file)?;
            commands::config::run(command, &config_path)
        }
        Commands::Classify { span } => {
            let (config, _logging_guard) = load_config(&config_path, cli.log_file)?;
            commands::classify::run(span, &config)
        }
        Commands::Frame(args) => {
            let (config, _logging_guard) = load_config(&config_path, cli.log_file)?;
            commands::frame::run(args, config)
        }
    }
}

/// Load the configuration file and start logging with its settings.
fn load_config(
    path: &Path,
    log_file: Option<PathBuf>,
) -> Result<(EngineConfig, LoggingGuard), CliError> {
    let config = EngineConfig::load_from(path)?;
    let guard = start_logging(config.logging.clone(), log_file)?;
    tracing::debug!(config = %path.display(), "Configuration loaded");
    Ok((config, guard))
}

fn start_logging(
    mut settings: LoggingSettings,
    log_file: Option<PathBuf>,
) -> Result<LoggingGuard, CliError> {
    if let Some(log_file) = log_file {
        settings.file = Some(log_file);
    }
    init_logging(&settings).map_err(|e| CliError::LoggingInit(e.to_string()))
}
