//! # List CLI — DSP File Discovery
//!
//! Scans every configured DSP directory recursively for `*.dsp` files and
//! prints them grouped by parent directory:
//!
//! ```text
//! C:/Users/me/Desktop
//!   Line Follower_0a1b2c3d4e5f60718293a4b5c6d7e8f9.dsp  Line Follower  0a1b2c3d…  python
//! ```
//!
//! A file that fails to decode is reported in place and the scan goes on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dsp_codec::DspFile;

use crate::config::FileManagerConfig;

const DSP_EXTENSION: &str = "dsp";

/// List subcommand arguments.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the decoded source text of each file.
    #[arg(long)]
    pub show_code: bool,

    /// Emit the listing as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One discovered file.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub path: PathBuf,
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Decode result for a discovered file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Decoded {
        title: String,
        guid: String,
        code_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_text: Option<String>,
    },
    Failed {
        error: String,
    },
}

/// Files grouped by parent directory, in sorted order.
pub type Listing = BTreeMap<String, Vec<Entry>>;

/// Execute the list subcommand.
pub fn run_list(args: &ListArgs, config_path: &Path) -> Result<u8> {
    let cfg = FileManagerConfig::load(config_path)
        .with_context(|| format!("failed to load settings from {}", config_path.display()))?;
    let listing = build_listing(&cfg.dsp_dirs, args.show_code);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(0);
    }

    if listing.is_empty() {
        println!("No DSP files found.");
        return Ok(0);
    }
    for (dir, entries) in &listing {
        println!("{dir}");
        for entry in entries {
            print_entry(entry);
        }
    }
    let total: usize = listing.values().map(Vec::len).sum();
    println!();
    println!("Total: {total} files");
    Ok(0)
}

fn print_entry(entry: &Entry) {
    match &entry.outcome {
        Outcome::Decoded {
            title,
            guid,
            code_type,
            source_text,
        } => {
            println!("  {}  {title}  {guid}  {code_type}", entry.file_name);
            if let Some(code) = source_text {
                if code.is_empty() {
                    println!("    (no python code)");
                }
                for line in code.lines() {
                    println!("    {line}");
                }
            }
        }
        Outcome::Failed { error } => {
            println!("  {}  <failed to decode: {error}>", entry.file_name);
        }
    }
}

/// Discover and decode every `.dsp` file under `dirs`.
///
/// Directories that do not exist are skipped with a warning.
pub fn build_listing(dirs: &[String], show_code: bool) -> Listing {
    let mut listing = Listing::new();
    for dir in dirs {
        let root = Path::new(dir);
        if !root.is_dir() {
            tracing::warn!(dir = %dir, "DSP directory does not exist");
            continue;
        }
        let mut files = Vec::new();
        if let Err(e) = collect_dsp_files(root, &mut files) {
            tracing::warn!(dir = %dir, error = %e, "failed to scan DSP directory");
        }
        files.sort();
        for path in files {
            let parent = path
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            listing
                .entry(parent)
                .or_default()
                .push(describe(path, show_code));
        }
    }
    listing
}

fn describe(path: PathBuf, show_code: bool) -> Entry {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let outcome = match DspFile::load_file(&path) {
        Ok(file) => {
            let attr = &file.document().attribute;
            Outcome::Decoded {
                title: file.logical_name().to_string(),
                guid: attr.guid().to_string(),
                code_type: attr.code_type().as_str().to_string(),
                source_text: show_code.then(|| file.source_text().to_string()),
            }
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "failed to decode DSP file");
            Outcome::Failed {
                error: e.to_string(),
            }
        }
    };
    Entry {
        path,
        file_name,
        outcome,
    }
}

/// Recursively collect `*.dsp` files under `dir`.
pub fn collect_dsp_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let ft = entry.file_type()?;
        if ft.is_dir() {
            collect_dsp_files(&path, out)?;
        } else if ft.is_file() && path.extension().and_then(|e| e.to_str()) == Some(DSP_EXTENSION)
        {
            out.push(path);
        }
    }
    Ok(())
}
