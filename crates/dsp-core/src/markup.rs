//! # Markup Serializer — Document to DSP Markup
//!
//! Writes a [`Document`] as the markup tree the target application reads:
//!
//! ```text
//! <dji>
//!   <attribute> creation_date sign modify_time guid creator
//!               firmware_version_dependency title code_type
//!               app_min_version app_max_version </attribute>
//!   <code> python_code scratch_description </code>
//! </dji>
//! ```
//!
//! (shown indented; the real output has no whitespace between elements and
//! no XML declaration). Element order is fixed.
//!
//! ## Two writing modes
//!
//! [`MarkupWriter`] has a scalar mode, which escapes `&`, `<` and `>` in the
//! text node, and a literal mode, which wraps the text verbatim in a
//! `<![CDATA[...]]>` section with nothing injected around it. The two code
//! fields always go through literal mode: program source must reach the
//! target application untouched, and its parser is whitespace-sensitive
//! around these sections.
//!
//! The writer is an owned value built per call; nothing here touches
//! process-wide state.

use quick_xml::escape::partial_escape;

use crate::document::Document;
use crate::temporal;

pub(crate) const ROOT: &str = "dji";
pub(crate) const ATTRIBUTE: &str = "attribute";
pub(crate) const CODE: &str = "code";

pub(crate) const CREATION_DATE: &str = "creation_date";
pub(crate) const SIGN: &str = "sign";
pub(crate) const MODIFY_TIME: &str = "modify_time";
pub(crate) const GUID: &str = "guid";
pub(crate) const CREATOR: &str = "creator";
pub(crate) const FIRMWARE_VERSION_DEPENDENCY: &str = "firmware_version_dependency";
pub(crate) const TITLE: &str = "title";
pub(crate) const CODE_TYPE: &str = "code_type";
pub(crate) const APP_MIN_VERSION: &str = "app_min_version";
pub(crate) const APP_MAX_VERSION: &str = "app_max_version";

pub(crate) const PYTHON_CODE: &str = "python_code";
pub(crate) const SCRATCH_DESCRIPTION: &str = "scratch_description";

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
/// Ends the current section between `]]` and `>` and reopens a new one,
/// so a literal `]]>` survives inside a literal block.
const CDATA_SPLIT: &str = "]]]]><![CDATA[>";

/// Append-only writer for DSP markup.
#[derive(Debug, Default)]
pub struct MarkupWriter {
    out: String,
}

impl MarkupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `<name>`.
    pub fn open(&mut self, name: &str) -> &mut Self {
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self
    }

    /// Write `</name>`.
    pub fn close(&mut self, name: &str) -> &mut Self {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self
    }

    /// Write `<name>text</name>` with `&`, `<` and `>` escaped.
    ///
    /// Empty text still produces an open/close pair, never `<name/>`.
    pub fn scalar(&mut self, name: &str, text: &str) -> &mut Self {
        self.open(name);
        self.out.push_str(&partial_escape(text));
        self.close(name)
    }

    /// Write `<name><![CDATA[text]]></name>` with `text` copied verbatim.
    pub fn literal(&mut self, name: &str, text: &str) -> &mut Self {
        self.open(name);
        self.out.push_str(CDATA_OPEN);
        self.out.push_str(&text.replace(CDATA_CLOSE, CDATA_SPLIT));
        self.out.push_str(CDATA_CLOSE);
        self.close(name)
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Serialize a document to DSP markup.
///
/// Writes `sign` as currently stored; callers persisting the result must
/// refresh the signature first.
pub fn serialize(doc: &Document) -> String {
    let attr = &doc.attribute;
    let code = &doc.code;

    let mut w = MarkupWriter::new();
    w.open(ROOT);

    w.open(ATTRIBUTE)
        .scalar(CREATION_DATE, &temporal::format_creation_date(&attr.creation_date()))
        .scalar(SIGN, attr.sign())
        .scalar(MODIFY_TIME, &temporal::format_modify_time(&attr.modify_time()))
        .scalar(GUID, attr.guid().as_str())
        .scalar(CREATOR, attr.creator())
        .scalar(
            FIRMWARE_VERSION_DEPENDENCY,
            &attr.firmware_version_dependency().value(),
        )
        .scalar(TITLE, attr.title())
        .scalar(CODE_TYPE, attr.code_type().as_str())
        .scalar(APP_MIN_VERSION, attr.app_min_version())
        .scalar(APP_MAX_VERSION, attr.app_max_version())
        .close(ATTRIBUTE);

    w.open(CODE)
        .literal(PYTHON_CODE, code.source_text())
        .literal(SCRATCH_DESCRIPTION, code.scratch_description())
        .close(CODE);

    w.close(ROOT);
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Attribute, AttributeParts, Code};
    use crate::{CodeType, FirmwareVersion, Guid};
    use chrono::NaiveDate;

    fn fixture(source: &str) -> Document {
        let attribute = Attribute::from_parts(AttributeParts {
            creation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            sign: "0123456789abcdef".to_string(),
            modify_time: NaiveDate::from_ymd_opt(2024, 1, 16)
                .unwrap()
                .and_hms_opt(14, 5, 6)
                .unwrap(),
            guid: Guid::from_payload("3f9a2b1c4d5e6f708192a3b4c5d6e7f8"),
            creator: "Anonymous".to_string(),
            firmware_version_dependency: FirmwareVersion::default(),
            title: "Untitled".to_string(),
            code_type: CodeType::PythonCode,
            app_min_version: String::new(),
            app_max_version: String::new(),
        });
        Document::from_blocks(attribute, Code::new(source, ""))
    }

    #[test]
    fn exact_layout() {
        let xml = serialize(&fixture("print('hi')"));
        assert_eq!(
            xml,
            "<dji><attribute>\
             <creation_date>2024/01/15</creation_date>\
             <sign>0123456789abcdef</sign>\
             <modify_time>01/16/2024 02:05:06 PM</modify_time>\
             <guid>3f9a2b1c4d5e6f708192a3b4c5d6e7f8</guid>\
             <creator>Anonymous</creator>\
             <firmware_version_dependency>00.00.0000</firmware_version_dependency>\
             <title>Untitled</title>\
             <code_type>python</code_type>\
             <app_min_version></app_min_version>\
             <app_max_version></app_max_version>\
             </attribute><code>\
             <python_code><![CDATA[print('hi')]]></python_code>\
             <scratch_description><![CDATA[]]></scratch_description>\
             </code></dji>"
        );
    }

    #[test]
    fn literal_block_is_not_escaped() {
        let src = "if a < b && c > d:\n    s = \"x\" + 'y'\n";
        let xml = serialize(&fixture(src));
        assert!(xml.contains(&format!("<python_code><![CDATA[{src}]]></python_code>")));
    }

    #[test]
    fn literal_block_splits_cdata_terminator() {
        let mut w = MarkupWriter::new();
        w.literal("x", "a]]>b");
        assert_eq!(w.finish(), "<x><![CDATA[a]]]]><![CDATA[>b]]></x>");
    }

    #[test]
    fn scalar_is_escaped() {
        let mut w = MarkupWriter::new();
        w.scalar("title", "Tom & <Jerry>");
        assert_eq!(w.finish(), "<title>Tom &amp; &lt;Jerry&gt;</title>");
    }

    #[test]
    fn empty_scalar_is_not_self_closed() {
        let mut w = MarkupWriter::new();
        w.scalar("sign", "");
        assert_eq!(w.finish(), "<sign></sign>");
    }
}
