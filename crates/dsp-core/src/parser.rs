//! # Markup Parser — DSP Markup to Document
//!
//! Reads the markup written by [`crate::markup::serialize`] (or by the
//! target application) back into a [`Document`].
//!
//! ## Tolerance rules
//!
//! The parser is strict about markup well-formedness and tolerant about
//! content:
//!
//! - The root must contain an `attribute` and a `code` element; otherwise
//!   the document is `MalformedDocument`. The root's own name is not
//!   checked. Only the first occurrence of each element counts.
//! - Missing or blank `creation_date`, `modify_time` → now; `guid` → a fresh
//!   random id; `firmware_version_dependency` → `(0, 0, 0)`; `code_type` →
//!   Python. Every other missing scalar is the empty string.
//! - Missing code fields are the empty string. Literal blocks are read back
//!   verbatim, and adjacent sections concatenate.
//! - `sign` is carried as-is. It is never checked against a recomputed
//!   signature; the target application does not check it either.
//!
//! Field order inside `attribute` and `code` does not matter.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::code_type::CodeType;
use crate::document::{Attribute, AttributeParts, Code, Document};
use crate::error::DspError;
use crate::firmware::FirmwareVersion;
use crate::identity::Guid;
use crate::markup::{
    APP_MAX_VERSION, APP_MIN_VERSION, ATTRIBUTE, CODE, CODE_TYPE, CREATION_DATE, CREATOR,
    FIRMWARE_VERSION_DEPENDENCY, GUID, MODIFY_TIME, PYTHON_CODE, SCRATCH_DESCRIPTION, SIGN, TITLE,
};
use crate::temporal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Attribute,
    Code,
    Ignored,
}

/// Leaf text collected per section, first occurrence of each field only.
#[derive(Debug, Default)]
struct Collected {
    attribute: Option<HashMap<String, String>>,
    code: Option<HashMap<String, String>>,
}

impl Collected {
    fn section_mut(&mut self, section: Section) -> Option<&mut HashMap<String, String>> {
        match section {
            Section::Attribute => self.attribute.as_mut(),
            Section::Code => self.code.as_mut(),
            Section::Ignored => None,
        }
    }
}

/// Parse DSP markup into a document. The result has an empty logical name.
///
/// # Errors
///
/// - `MalformedDocument` for markup that is not well formed, lacks the
///   `attribute`/`code` sections, or holds an unreadable date or firmware
///   version.
/// - `UnsupportedCodeType` for a `code_type` tag other than `python` or
///   `scratch`.
pub fn parse(text: &str) -> Result<Document, DspError> {
    let collected = collect(text)?;

    let attribute = collected
        .attribute
        .ok_or_else(|| missing_section(ATTRIBUTE))?;
    let code = collected.code.ok_or_else(|| missing_section(CODE))?;

    Ok(Document::from_blocks(
        build_attribute(&attribute)?,
        build_code(&code),
    ))
}

/// Walk the event stream and gather the text of every field element.
fn collect(text: &str) -> Result<Collected, DspError> {
    let mut reader = Reader::from_str(text);
    let mut collected = Collected::default();

    // Element names from the root down to the current element.
    let mut stack: Vec<String> = Vec::new();
    let mut section = Section::Ignored;
    // The field whose text is being gathered, if any.
    let mut field: Option<String> = None;
    let mut roots = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(e.name().as_ref())?;
                match stack.len() {
                    0 => {
                        roots += 1;
                        if roots > 1 {
                            return Err(malformed("more than one root element"));
                        }
                    }
                    1 => section = enter_section(&mut collected, &name),
                    2 => field = enter_field(&mut collected, section, &name),
                    _ => field = None,
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = element_name(e.name().as_ref())?;
                match stack.len() {
                    0 => return Err(missing_section(ATTRIBUTE)),
                    1 => {
                        enter_section(&mut collected, &name);
                    }
                    2 => {
                        enter_field(&mut collected, section, &name);
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                stack.pop();
                match stack.len() {
                    1 => section = Section::Ignored,
                    2 => field = None,
                    _ => {}
                }
            }
            Event::Text(t) => {
                let value = t
                    .unescape()
                    .map_err(|e| malformed(&format!("bad text node: {e}")))?;
                if stack.is_empty() {
                    if !value.trim().is_empty() {
                        return Err(malformed("text outside the root element"));
                    }
                    continue;
                }
                append_field_text(&mut collected, section, field.as_deref(), stack.len(), &value);
            }
            Event::CData(c) => {
                let bytes = c.into_inner();
                let value = std::str::from_utf8(&bytes)
                    .map_err(|e| malformed(&format!("literal block is not UTF-8: {e}")))?;
                if stack.is_empty() {
                    return Err(malformed("literal block outside the root element"));
                }
                append_field_text(&mut collected, section, field.as_deref(), stack.len(), value);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed(&format!("unclosed element <{}>", stack.join("><"))));
    }
    if roots == 0 {
        return Err(malformed("no root element"));
    }
    Ok(collected)
}

fn enter_section(collected: &mut Collected, name: &str) -> Section {
    match name {
        ATTRIBUTE if collected.attribute.is_none() => {
            collected.attribute = Some(HashMap::new());
            Section::Attribute
        }
        CODE if collected.code.is_none() => {
            collected.code = Some(HashMap::new());
            Section::Code
        }
        _ => Section::Ignored,
    }
}

/// Register a field; returns its name if its text should be gathered.
fn enter_field(collected: &mut Collected, section: Section, name: &str) -> Option<String> {
    let fields = collected.section_mut(section)?;
    if fields.contains_key(name) {
        return None;
    }
    fields.insert(name.to_string(), String::new());
    Some(name.to_string())
}

fn append_field_text(
    collected: &mut Collected,
    section: Section,
    field: Option<&str>,
    depth: usize,
    text: &str,
) {
    // Text belongs to a field only when directly inside it (depth 3).
    if depth != 3 {
        return;
    }
    let (Some(field), Some(fields)) = (field, collected.section_mut(section)) else {
        return;
    };
    if let Some(value) = fields.get_mut(field) {
        value.push_str(text);
    }
}

fn build_attribute(fields: &HashMap<String, String>) -> Result<Attribute, DspError> {
    let creation_date = match non_blank(fields, CREATION_DATE) {
        Some(s) => temporal::parse_creation_date(s)?,
        None => temporal::today(),
    };
    let modify_time = match non_blank(fields, MODIFY_TIME) {
        Some(s) => temporal::parse_modify_time(s)?,
        None => temporal::now(),
    };
    let guid = match non_blank(fields, GUID) {
        Some(s) => Guid::from_payload(s.trim()),
        None => Guid::new(),
    };
    let firmware_version_dependency = match non_blank(fields, FIRMWARE_VERSION_DEPENDENCY) {
        Some(s) => FirmwareVersion::parse(s)?,
        None => FirmwareVersion::default(),
    };
    let code_type = match non_blank(fields, CODE_TYPE) {
        Some(s) => CodeType::from_tag(s)?,
        None => CodeType::PythonCode,
    };

    Ok(Attribute::from_parts(AttributeParts {
        creation_date,
        sign: text_or_empty(fields, SIGN),
        modify_time,
        guid,
        creator: text_or_empty(fields, CREATOR),
        firmware_version_dependency,
        title: text_or_empty(fields, TITLE),
        code_type,
        app_min_version: text_or_empty(fields, APP_MIN_VERSION),
        app_max_version: text_or_empty(fields, APP_MAX_VERSION),
    }))
}

fn build_code(fields: &HashMap<String, String>) -> Code {
    Code::new(
        text_or_empty(fields, PYTHON_CODE),
        text_or_empty(fields, SCRATCH_DESCRIPTION),
    )
}

fn non_blank<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn text_or_empty(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

fn element_name(raw: &[u8]) -> Result<String, DspError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| malformed(&format!("element name is not UTF-8: {e}")))
}

fn malformed(reason: &str) -> DspError {
    DspError::MalformedDocument(reason.to_string())
}

fn missing_section(name: &str) -> DspError {
    DspError::MalformedDocument(format!("missing <{name}> element"))
}
