//! # Code Type
//!
//! Which payload of a document is active: Python source or a Scratch
//! project description. Both payloads are always serialized; the tag only
//! tells the target application which one to open.
//!
//! The mapping to and from the wire tag is total and closed. Unknown tags
//! are rejected rather than carried through.

use serde::{Deserialize, Serialize};

use crate::error::DspError;

/// Active payload of a DSP document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeType {
    #[default]
    PythonCode,
    ScratchCode,
}

impl CodeType {
    /// The tag written into the `code_type` element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PythonCode => "python",
            Self::ScratchCode => "scratch",
        }
    }

    /// The name hashed into the document signature.
    ///
    /// The target application's signer uses the enum member name, not the
    /// wire tag, so this differs from [`CodeType::as_str`].
    pub fn signature_name(&self) -> &'static str {
        match self {
            Self::PythonCode => "python_code",
            Self::ScratchCode => "scratch_code",
        }
    }

    /// Map a wire tag back to its variant.
    pub fn from_tag(tag: &str) -> Result<Self, DspError> {
        match tag.trim() {
            "python" => Ok(Self::PythonCode),
            "scratch" => Ok(Self::ScratchCode),
            other => Err(DspError::UnsupportedCodeType(other.to_string())),
        }
    }
}

impl std::fmt::Display for CodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CodeType {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags() {
        assert_eq!(CodeType::PythonCode.as_str(), "python");
        assert_eq!(CodeType::ScratchCode.to_string(), "scratch");
    }

    #[test]
    fn tags_map_back() {
        for ty in [CodeType::PythonCode, CodeType::ScratchCode] {
            assert_eq!(CodeType::from_tag(ty.as_str()).unwrap(), ty);
        }
    }

    #[test]
    fn signature_names_are_member_names() {
        assert_eq!(CodeType::PythonCode.signature_name(), "python_code");
        assert_eq!(CodeType::ScratchCode.signature_name(), "scratch_code");
    }

    #[test]
    fn unknown_tag_rejected() {
        match CodeType::from_tag("Python") {
            Err(DspError::UnsupportedCodeType(tag)) => assert_eq!(tag, "Python"),
            other => panic!("expected UnsupportedCodeType, got {other:?}"),
        }
        assert!("python_code".parse::<CodeType>().is_err());
    }

    #[test]
    fn default_is_python() {
        assert_eq!(CodeType::default(), CodeType::PythonCode);
    }
}
