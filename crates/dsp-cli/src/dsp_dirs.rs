//! # Dirs CLI — Manage the DSP directory list.
//!
//! ```bash
//! dspy dirs                      # print the configured directories
//! dspy dirs add ~/robomaster     # add a directory (a file adds its parent)
//! dspy dirs remove ~/robomaster
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::FileManagerConfig;

/// Dirs subcommand arguments.
#[derive(Args, Debug)]
pub struct DirsArgs {
    #[command(subcommand)]
    pub command: Option<DirsCommand>,
}

/// Available dirs subcommands.
#[derive(Subcommand, Debug)]
pub enum DirsCommand {
    /// Add a DSP directory.
    Add {
        /// Directory, or a file inside it.
        path: PathBuf,
    },

    /// Remove a DSP directory.
    Remove {
        /// Directory, or a file inside it.
        path: PathBuf,
    },
}

/// Execute the dirs subcommand.
pub fn run_dirs(args: &DirsArgs, config_path: &Path) -> Result<u8> {
    let mut cfg = FileManagerConfig::load(config_path)
        .with_context(|| format!("failed to load settings from {}", config_path.display()))?;

    match &args.command {
        None => {
            println!("DSP File Directories:");
            for dir in &cfg.dsp_dirs {
                println!("{dir}");
            }
        }
        Some(DirsCommand::Add { path }) => {
            if cfg.add_dir(path) {
                cfg.save(config_path)?;
                println!("Added {} to the DSP directories.", path.display());
            } else {
                println!("{} is already in the DSP directories.", path.display());
            }
        }
        Some(DirsCommand::Remove { path }) => {
            if cfg.remove_dir(path) {
                cfg.save(config_path)?;
                println!("Removed {} from the DSP directories.", path.display());
            } else {
                println!("{} is not in the DSP directories.", path.display());
            }
        }
    }
    Ok(0)
}
