//! # Document Identity
//!
//! `Guid` is the per-document identifier written into the `guid` element.
//! Fresh identifiers are random UUIDs rendered as 32 lowercase hex digits
//! with the dashes removed, the form the target application writes.
//!
//! Identifiers read back from a file are kept verbatim, even when they do
//! not follow that shape: the guid is part of the signed content and of
//! generated output file names, so rewriting it would orphan the document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a DSP document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guid(String);

impl Guid {
    /// Generate a new random identifier (32 lowercase hex characters).
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an identifier read from a document payload.
    pub fn from_payload(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the identifier has the canonical 32-lowercase-hex shape.
    pub fn is_canonical(&self) -> bool {
        self.0.len() == 32
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
