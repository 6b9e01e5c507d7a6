//! # Signature Engine — Document Content Signature
//!
//! Derives the 16-character `sign` value the target application stores in
//! every document. The signed blob is the concatenation, in this order, of:
//!
//! 1. the marker [`SIGNATURE_MARKER`],
//! 2. `creation_date` as `YYYY/MM/DD`,
//! 3. `title`, 4. `creator`,
//! 5. the padded firmware version (`00.00.0000`),
//! 6. `guid`,
//! 7. the source text, 8. the Scratch description,
//! 9. the code type's lowercase member name (`python_code`).
//!
//! The blob's UTF-8 bytes are hashed with MD5 and characters 7..23 of the
//! lowercase hex digest are kept.
//!
//! MD5 is what the target application uses; it is an interoperability
//! detail, not an integrity control. Signatures are never verified on load.

use crate::document::Document;
use crate::temporal;

/// Constant prefix of every signed blob.
pub const SIGNATURE_MARKER: &str = "wwxnMmF8";

/// Length of a signature in characters.
pub const SIGNATURE_LEN: usize = 16;

const DIGEST_OFFSET: usize = 7;

/// Build the exact text that is hashed for `doc`.
pub fn signature_source(doc: &Document) -> String {
    let attr = &doc.attribute;
    let code = &doc.code;
    let mut blob = String::with_capacity(
        64 + code.source_text().len() + code.scratch_description().len(),
    );
    blob.push_str(SIGNATURE_MARKER);
    blob.push_str(&temporal::format_creation_date(&attr.creation_date()));
    blob.push_str(attr.title());
    blob.push_str(attr.creator());
    blob.push_str(&attr.firmware_version_dependency().value());
    blob.push_str(attr.guid().as_str());
    blob.push_str(code.source_text());
    blob.push_str(code.scratch_description());
    blob.push_str(attr.code_type().signature_name());
    blob
}

/// Compute the 16-character signature of `doc`. Pure; does not store it.
pub fn signature(doc: &Document) -> String {
    let digest = md5::compute(signature_source(doc).as_bytes());
    let hex = format!("{digest:x}");
    hex[DIGEST_OFFSET..DIGEST_OFFSET + SIGNATURE_LEN].to_string()
}

impl Document {
    /// Recompute the signature and store it in `attribute.sign`.
    ///
    /// Must run immediately before any serialization that will be
    /// persisted.
    pub fn refresh_signature(&mut self) {
        let sign = signature(self);
        self.attribute.set_sign(sign);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Attribute, AttributeParts, Code};
    use crate::{CodeType, FirmwareVersion, Guid};
    use chrono::NaiveDate;

    fn fixture() -> Document {
        let attribute = Attribute::from_parts(AttributeParts {
            creation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            sign: String::new(),
            modify_time: NaiveDate::from_ymd_opt(2024, 1, 16)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            guid: Guid::from_payload("3f9a2b1c4d5e6f708192a3b4c5d6e7f8"),
            creator: "Anonymous".to_string(),
            firmware_version_dependency: FirmwareVersion::default(),
            title: "Untitled".to_string(),
            code_type: CodeType::PythonCode,
            app_min_version: String::new(),
            app_max_version: String::new(),
        });
        Document::from_blocks(attribute, Code::new("print('hi')", ""))
    }

    #[test]
    fn source_layout() {
        assert_eq!(
            signature_source(&fixture()),
            "wwxnMmF82024/01/15UntitledAnonymous00.00.0000\
             3f9a2b1c4d5e6f708192a3b4c5d6e7f8print('hi')python_code"
        );
    }

    #[test]
    fn signature_is_slice_of_md5_hex() {
        let doc = fixture();
        let full = format!("{:x}", md5::compute(signature_source(&doc).as_bytes()));
        let sign = signature(&doc);
        assert_eq!(sign.len(), SIGNATURE_LEN);
        assert_eq!(sign, &full[7..23]);
        assert!(sign.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn known_md5_vector() {
        // MD5("") = d41d8cd98f00b204e9800998ecf8427e
        let hex = format!("{:x}", md5::compute(b""));
        assert_eq!(&hex[7..23], "98f00b204e980099");
    }

    #[test]
    fn known_document_vector() {
        // hashlib.md5(blob.encode()).hexdigest()[7:23]
        assert_eq!(signature(&fixture()), "ed65d521eb0dd031");
    }

    #[test]
    fn deterministic_for_equal_documents() {
        assert_eq!(signature(&fixture()), signature(&fixture()));
    }

    #[test]
    fn every_signed_field_changes_signature() {
        let base = signature(&fixture());

        let mut d = fixture();
        d.attribute.set_title("Other").unwrap();
        assert_ne!(signature(&d), base);

        let mut d = fixture();
        d.attribute.set_creator("Someone").unwrap();
        assert_ne!(signature(&d), base);

        let mut d = fixture();
        d.attribute
            .set_creation_date(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert_ne!(signature(&d), base);

        let mut d = fixture();
        d.attribute
            .set_firmware_version_dependency(FirmwareVersion::new(1, 0, 0));
        assert_ne!(signature(&d), base);

        let mut d = fixture();
        d.code.set_source_text("print('hi') ");
        assert_ne!(signature(&d), base);

        let mut d = fixture();
        d.code.set_scratch_description("x");
        assert_ne!(signature(&d), base);

        let mut d = fixture();
        d.attribute.set_code_type(CodeType::ScratchCode);
        assert_ne!(signature(&d), base);
    }

    #[test]
    fn unsigned_fields_do_not_change_signature() {
        let base = signature(&fixture());
        let mut d = fixture();
        d.attribute.touch();
        d.attribute.set_app_min_version("1.0");
        d.logical_name = "renamed".to_string();
        assert_eq!(signature(&d), base);
    }

    #[test]
    fn refresh_stores_signature() {
        let mut d = fixture();
        assert_eq!(d.attribute.sign(), "");
        d.refresh_signature();
        assert_eq!(d.attribute.sign(), signature(&fixture()));
    }

    #[test]
    fn mutation_does_not_refresh() {
        let mut d = fixture();
        d.refresh_signature();
        let stored = d.attribute.sign().to_string();
        d.code.set_source_text("changed");
        assert_eq!(d.attribute.sign(), stored);
    }
}
