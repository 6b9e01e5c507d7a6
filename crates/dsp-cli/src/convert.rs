//! # Convert CLI — `.py` ⇄ `.dsp`
//!
//! ```bash
//! # Wrap a script into a DSP file in ./out:
//! dspy convert robot.py -o out -t "Line Follower" -c Alice
//!
//! # Extract the source of a DSP file:
//! dspy convert "Line Follower_0a1b2c3d4e5f60718293a4b5c6d7e8f9.dsp"
//!
//! # Inspect the plaintext markup without writing anything:
//! dspy convert robot.py --raw --std-out
//! ```
//!
//! Output names default to `<stem>_<YYYYmmddHHMMSS>.dsp` for scripts and
//! `<title>_<YYYYmmddHHMMSS>.py` for DSP files, where `<title>` is recovered
//! from the input file name.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Args;
use regex::Regex;

use dsp_codec::{DspFile, SaveOptions};

/// Timestamp appended to generated output names.
pub const OUTPUT_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Comment lines the block editor leaves in generated scripts.
const BLOCK_COMMENT_PATTERN: &str = r"\n *?#block.+?\n";

/// Convert subcommand arguments.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file (.py or .dsp).
    pub input: PathBuf,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Output file name (generated when omitted).
    #[arg(short, long)]
    pub file_name: Option<String>,

    /// Print the result instead of writing a file.
    #[arg(short, long)]
    pub std_out: bool,

    /// Emit the plaintext markup instead of an encrypted container.
    #[arg(short, long)]
    pub raw: bool,

    /// Remove block-editor comments from the source text.
    #[arg(short, long)]
    pub delete_comments: bool,

    /// Title of a new DSP file.
    #[arg(short, long, default_value = "Untitled")]
    pub title: String,

    /// Creator of a new DSP file.
    #[arg(short, long, default_value = "Anonymous")]
    pub creator: String,
}

/// What a conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converted {
    /// Text for standard output.
    Printed(String),
    /// A file written to disk.
    Written(PathBuf),
}

/// Execute the convert subcommand.
pub fn run_convert(args: &ConvertArgs) -> Result<u8> {
    match convert(args, Local::now().naive_local())? {
        Converted::Printed(text) => println!("{text}"),
        Converted::Written(path) => {
            tracing::info!(path = %path.display(), "wrote output file");
            println!("{}", path.display());
        }
    }
    Ok(0)
}

/// Convert `args.input`, stamping generated names with `now`.
pub fn convert(args: &ConvertArgs, now: NaiveDateTime) -> Result<Converted> {
    let input = &args.input;
    if !input.exists() {
        bail!("input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        bail!("input is not a file: {}", input.display());
    }
    let stamp = now.format(OUTPUT_STAMP_FORMAT).to_string();

    match input.extension().and_then(|e| e.to_str()) {
        Some("py") => convert_python(args, &stamp),
        Some("dsp") => convert_dsp(args, &stamp),
        _ => bail!(
            "unsupported input file (expected .py or .dsp): {}",
            input.display()
        ),
    }
}

fn convert_python(args: &ConvertArgs, stamp: &str) -> Result<Converted> {
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let name = match &args.file_name {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ => format!("{}_{stamp}", file_stem(&args.input)),
    };

    let mut file = DspFile::new(&args.creator, &args.title, &source, &name)
        .context("failed to create DSP document")?;
    if args.delete_comments {
        strip_comments(&mut file);
    }

    if args.raw {
        return emit_raw(args, &mut file, &name);
    }
    if args.std_out {
        let bytes = file.save(SaveOptions::default());
        return Ok(Converted::Printed(String::from_utf8_lossy(&bytes).into_owned()));
    }

    ensure_dir(&args.output)?;
    let path = file
        .save_to_dir(&args.output, Some(&with_suffix(&name, ".dsp", ".dsp")), SaveOptions::default())
        .with_context(|| format!("failed to write into {}", args.output.display()))?;
    Ok(Converted::Written(path))
}

fn convert_dsp(args: &ConvertArgs, stamp: &str) -> Result<Converted> {
    let mut file = DspFile::load_file(&args.input)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;
    let name = match &args.file_name {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ if !file.logical_name().is_empty() => file.logical_name().to_string(),
        _ => file_stem(&args.input),
    };
    if args.delete_comments {
        strip_comments(&mut file);
    }

    if args.raw {
        return emit_raw(args, &mut file, &name);
    }
    if args.std_out {
        return Ok(Converted::Printed(file.source_text().to_string()));
    }

    ensure_dir(&args.output)?;
    let path = args
        .output
        .join(with_suffix(&name, ".py", &format!("_{stamp}.py")));
    std::fs::write(&path, file.source_text())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Converted::Written(path))
}

fn emit_raw(args: &ConvertArgs, file: &mut DspFile, name: &str) -> Result<Converted> {
    let markup = file.raw_markup();
    if args.std_out {
        return Ok(Converted::Printed(markup));
    }
    ensure_dir(&args.output)?;
    let path = args.output.join(with_suffix(name, ".xml", "_raw.xml"));
    std::fs::write(&path, markup).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Converted::Written(path))
}

/// Remove block-editor comment lines from the document's source text.
pub fn strip_comments(file: &mut DspFile) {
    let stripped = delete_block_comments(file.source_text());
    file.document_mut().code.set_source_text(stripped);
}

/// Remove every `#block` comment line that sits between two newlines.
pub fn delete_block_comments(source: &str) -> String {
    match block_comment_regex() {
        Some(re) => re.replace_all(source, "\n").into_owned(),
        None => source.to_string(),
    }
}

fn block_comment_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BLOCK_COMMENT_PATTERN).ok())
        .as_ref()
}

/// `name` unchanged if it already ends with `extension`, else `name + suffix`.
fn with_suffix(name: &str, extension: &str, suffix: &str) -> String {
    if name.ends_with(extension) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}
