//! # Document Model
//!
//! In-memory form of a DSP document: an [`Attribute`] metadata block, a
//! [`Code`] payload block, and the logical name recovered from (or used to
//! build) the file name.
//!
//! ## Invariants
//!
//! - `guid` is assigned once, either freshly by [`Document::new`] or from
//!   the payload by the parser, and has no setter.
//! - `sign` is only written by [`Document::refresh_signature`]; it is never
//!   hand-edited and is not recomputed on field mutation.
//! - `creator` and `title` are trimmed and non-empty whenever they pass
//!   through a constructor or setter. Documents read from a file keep
//!   whatever the payload held, including empty strings.
//! - `logical_name` is never serialized into the payload.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::code_type::CodeType;
use crate::error::DspError;
use crate::firmware::FirmwareVersion;
use crate::identity::Guid;
use crate::temporal;

/// Metadata block of a DSP document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    creation_date: NaiveDate,
    sign: String,
    modify_time: NaiveDateTime,
    guid: Guid,
    creator: String,
    firmware_version_dependency: FirmwareVersion,
    title: String,
    code_type: CodeType,
    app_min_version: String,
    app_max_version: String,
}

/// Field values of an [`Attribute`] as read from a payload.
///
/// Used by the parser, which must accept whatever the file holds.
#[derive(Debug, Clone)]
pub(crate) struct AttributeParts {
    pub creation_date: NaiveDate,
    pub sign: String,
    pub modify_time: NaiveDateTime,
    pub guid: Guid,
    pub creator: String,
    pub firmware_version_dependency: FirmwareVersion,
    pub title: String,
    pub code_type: CodeType,
    pub app_min_version: String,
    pub app_max_version: String,
}

impl Attribute {
    /// Fresh metadata: new guid, both dates stamped to now, Python code,
    /// firmware `(0, 0, 0)`, empty signature and app version bounds.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `creator` or `title` is empty after trimming.
    pub fn new(creator: &str, title: &str) -> Result<Self, DspError> {
        let now = temporal::now();
        Ok(Self {
            creation_date: now.date(),
            sign: String::new(),
            modify_time: now,
            guid: Guid::new(),
            creator: require_non_empty("creator", creator)?,
            firmware_version_dependency: FirmwareVersion::default(),
            title: require_non_empty("title", title)?,
            code_type: CodeType::PythonCode,
            app_min_version: String::new(),
            app_max_version: String::new(),
        })
    }

    pub(crate) fn from_parts(parts: AttributeParts) -> Self {
        Self {
            creation_date: parts.creation_date,
            sign: parts.sign,
            modify_time: temporal::truncate_to_seconds(parts.modify_time),
            guid: parts.guid,
            creator: parts.creator,
            firmware_version_dependency: parts.firmware_version_dependency,
            title: parts.title,
            code_type: parts.code_type,
            app_min_version: parts.app_min_version,
            app_max_version: parts.app_max_version,
        }
    }

    pub fn creation_date(&self) -> NaiveDate {
        self.creation_date
    }

    /// The signature stored by the last [`Document::refresh_signature`],
    /// or whatever the loaded payload carried.
    pub fn sign(&self) -> &str {
        &self.sign
    }

    pub fn modify_time(&self) -> NaiveDateTime {
        self.modify_time
    }

    pub fn guid(&self) -> &Guid {
        &self.guid
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn firmware_version_dependency(&self) -> FirmwareVersion {
        self.firmware_version_dependency
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code_type(&self) -> CodeType {
        self.code_type
    }

    pub fn app_min_version(&self) -> &str {
        &self.app_min_version
    }

    pub fn app_max_version(&self) -> &str {
        &self.app_max_version
    }

    /// Replace the creator. Trimmed; must not be empty.
    pub fn set_creator(&mut self, creator: &str) -> Result<(), DspError> {
        self.creator = require_non_empty("creator", creator)?;
        Ok(())
    }

    /// Replace the title. Trimmed; must not be empty.
    pub fn set_title(&mut self, title: &str) -> Result<(), DspError> {
        self.title = require_non_empty("title", title)?;
        Ok(())
    }

    pub fn set_creation_date(&mut self, date: NaiveDate) {
        self.creation_date = date;
    }

    pub fn set_modify_time(&mut self, time: NaiveDateTime) {
        self.modify_time = temporal::truncate_to_seconds(time);
    }

    /// Stamp `modify_time` to the current local time.
    pub fn touch(&mut self) {
        self.modify_time = temporal::now();
    }

    pub fn set_firmware_version_dependency(&mut self, version: FirmwareVersion) {
        self.firmware_version_dependency = version;
    }

    pub fn set_code_type(&mut self, code_type: CodeType) {
        self.code_type = code_type;
    }

    pub fn set_app_min_version(&mut self, version: impl Into<String>) {
        self.app_min_version = version.into();
    }

    pub fn set_app_max_version(&mut self, version: impl Into<String>) {
        self.app_max_version = version.into();
    }

    pub(crate) fn set_sign(&mut self, sign: String) {
        self.sign = sign;
    }
}

/// Payload block of a DSP document.
///
/// Both fields are written as literal blocks and round-trip byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Code {
    source_text: String,
    scratch_description: String,
}

impl Code {
    pub fn new(source_text: impl Into<String>, scratch_description: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            scratch_description: scratch_description.into(),
        }
    }

    /// The program body (Python source for Python documents).
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn set_source_text(&mut self, source_text: impl Into<String>) {
        self.source_text = source_text.into();
    }

    /// The Scratch project description; opaque to this codec.
    pub fn scratch_description(&self) -> &str {
        &self.scratch_description
    }

    pub fn set_scratch_description(&mut self, description: impl Into<String>) {
        self.scratch_description = description.into();
    }
}

/// A complete DSP document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub attribute: Attribute,
    pub code: Code,
    /// Title recovered from, or used to build, the file name.
    pub logical_name: String,
}

impl Document {
    /// Create a fresh Python document.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `creator` or `title` is empty after trimming.
    pub fn new(
        creator: &str,
        title: &str,
        source_text: impl Into<String>,
        logical_name: impl Into<String>,
    ) -> Result<Self, DspError> {
        Ok(Self {
            attribute: Attribute::new(creator, title)?,
            code: Code::new(source_text, ""),
            logical_name: logical_name.into(),
        })
    }

    /// Assemble a document from already-validated blocks.
    pub fn from_blocks(attribute: Attribute, code: Code) -> Self {
        Self {
            attribute,
            code,
            logical_name: String::new(),
        }
    }

    pub fn guid(&self) -> &Guid {
        self.attribute.guid()
    }

    /// Set the logical name, returning the document.
    pub fn with_logical_name(mut self, name: impl Into<String>) -> Self {
        self.logical_name = name.into();
        self
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<String, DspError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DspError::InvalidArgument(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
