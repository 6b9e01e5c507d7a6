//! # Firmware Version Dependency
//!
//! A three-part version tag rendered in the target application's padded
//! form: each part is left-justified and zero-filled to widths 2, 2 and 4.
//! `(0, 0, 0)` renders as `00.00.0000` and `(1, 2, 3)` as `10.20.3000`.
//!
//! This is not a conventional version string and must not be "fixed":
//! the rendered text is hashed into the document signature.

use serde::{Deserialize, Serialize};

use crate::error::DspError;

/// Three-part firmware version constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FirmwareVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The padded wire rendering, e.g. `00.00.0000`.
    pub fn value(&self) -> String {
        format!("{:0<2}.{:0<2}.{:0<4}", self.major, self.minor, self.patch)
    }

    /// Parse a dotted version of one to three unsigned parts.
    ///
    /// Missing trailing parts are zero. The parts are read as plain
    /// integers, so `10.00.0000` parses back to `(10, 0, 0)`.
    pub fn parse(s: &str) -> Result<Self, DspError> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(DspError::MalformedDocument(format!(
                "firmware_version_dependency must have 1 to 3 parts, got {s:?}"
            )));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.trim().parse().map_err(|e| {
                DspError::MalformedDocument(format!(
                    "invalid firmware_version_dependency {s:?}: {e}"
                ))
            })?;
        }
        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}
