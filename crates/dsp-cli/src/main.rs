//! # dspy CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dsp_cli::config::default_config_path;
use dsp_cli::convert::{run_convert, ConvertArgs};
use dsp_cli::dsp_dirs::{run_dirs, DirsArgs};
use dsp_cli::list::{run_list, ListArgs};

/// RoboMaster DSP file tool.
///
/// Converts between Python scripts and encrypted DSP project files, and
/// keeps track of the directories where DSP files live.
#[derive(Parser, Debug)]
#[command(name = "dspy", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the settings file (defaults to ~/.dspy_tool.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a .py file to .dsp, or a .dsp file to .py.
    Convert(ConvertArgs),

    /// Show, add or remove DSP directories.
    Dirs(DirsArgs),

    /// List the DSP files found in the DSP directories.
    List(ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("dspy CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Dirs(args) => resolve_config(cli.config.clone()).and_then(|p| run_dirs(args, &p)),
        Commands::List(args) => resolve_config(cli.config.clone()).and_then(|p| run_list(args, &p)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn resolve_config(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(default_config_path()?),
    }
}
