//! # Filename Normalizer — Title Recovery
//!
//! Recovers a human title from file names produced by this tool or by
//! users. From the end of the name it strips, at most once each:
//!
//! 1. an extension group: an optional `_raw`, `-raw` or `.raw` marker
//!    followed by `.dsp`, `.py` or `.xml`;
//! 2. a suffix joined by `_` or `-`: a 14-digit timestamp
//!    (`YYYYmmddHHMMSS`) or a 32-character alphanumeric id (a guid).
//!
//! What remains is the title. The heuristic never fails: a name matching
//! neither group comes back unchanged.

use std::sync::OnceLock;

use regex::Regex;

/// Separator between logical name and guid in generated file names.
pub const NAME_SEPARATOR: char = '_';

/// Extension of DSP container files.
pub const DSP_EXTENSION: &str = "dsp";

const TITLE_PATTERN: &str =
    r"^(?P<title>.*?)(?:[_-](?:[0-9]{14}|[a-zA-Z0-9]{32}))?(?:(?:[_.-]raw)?\.(?:dsp|py|xml))?$";

fn title_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TITLE_PATTERN).ok()).as_ref()
}

/// Recover the logical title from a file name (no directory part).
pub fn derive_title(raw_filename: &str) -> String {
    title_regex()
        .and_then(|re| re.captures(raw_filename))
        .and_then(|caps| caps.name("title"))
        .map_or_else(|| raw_filename.to_string(), |m| m.as_str().to_string())
}

/// The generated container name: `<logical_name>_<guid>.dsp`.
pub fn dsp_file_name(logical_name: &str, guid: &str) -> String {
    format!("{logical_name}{NAME_SEPARATOR}{guid}.{DSP_EXTENSION}")
}
