//! # dsp-cli — CLI Tool for RoboMaster DSP Files
//!
//! Provides the `dspy` command-line interface.
//!
//! ## Subcommands
//!
//! - `dspy convert` — `.py` to `.dsp` and back, or to raw markup.
//! - `dspy dirs` — show, add or remove DSP directories.
//! - `dspy list` — discover and describe `.dsp` files in those directories.
//!
//! ```bash
//! dspy convert robot.py -t "Line Follower" -c Alice -o out
//! dspy dirs add ~/Downloads
//! dspy list --show-code
//! ```
//!
//! Settings live in `~/.dspy_tool.toml`; see [`config`].

pub mod config;
pub mod convert;
pub mod dsp_dirs;
pub mod list;
