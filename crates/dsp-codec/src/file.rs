//! # DSP File — Load/Save Facade
//!
//! `DspFile` wraps a [`Document`] with the persistence pipeline:
//!
//! ```text
//! load: bytes → dsp_crypto::decode → UTF-8 → dsp_core::parse
//! save: touch modify_time → refresh_signature → dsp_core::serialize → dsp_crypto::encode
//! ```
//!
//! A failed `load` produces no value at all, so no caller-visible state is
//! ever half-updated.

use std::path::{Path, PathBuf};

use dsp_core::{derive_title, dsp_file_name, parse, serialize, Document, DspError};

/// Controls what `save` stamps before persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Re-stamp `modify_time` to now. On by default.
    pub touch_modify_time: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            touch_modify_time: true,
        }
    }
}

impl SaveOptions {
    /// Keep `modify_time` as loaded.
    pub fn preserve_modify_time() -> Self {
        Self {
            touch_modify_time: false,
        }
    }
}

/// A DSP document together with its persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DspFile {
    document: Document,
}

impl DspFile {
    /// Create a new Python document.
    ///
    /// `file_name` becomes the logical name; when blank the trimmed title
    /// is used instead.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `creator` or `title` is empty after trimming.
    pub fn new(
        creator: &str,
        title: &str,
        source_text: &str,
        file_name: &str,
    ) -> Result<Self, DspError> {
        let mut document = Document::new(creator, title, source_text, file_name)?;
        if document.logical_name.trim().is_empty() {
            document.logical_name = document.attribute.title().to_string();
        }
        tracing::debug!(guid = %document.guid(), "created new DSP document");
        Ok(Self { document })
    }

    /// Create a new document with no source text.
    pub fn empty(creator: &str, title: &str, file_name: &str) -> Result<Self, DspError> {
        Self::new(creator, title, "", file_name)
    }

    /// Wrap an existing document.
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    /// Decode container bytes. The logical name is left empty.
    ///
    /// # Errors
    ///
    /// Any transport error (`InvalidEncoding`, `CiphertextLength`,
    /// `InvalidPadding`), `MalformedDocument` (including non-UTF-8
    /// plaintext) or `UnsupportedCodeType`.
    pub fn load(bytes: &[u8]) -> Result<Self, DspError> {
        let plain = dsp_crypto::decode(bytes)?;
        let text = String::from_utf8(plain).map_err(|e| {
            DspError::MalformedDocument(format!("plaintext is not UTF-8: {e}"))
        })?;
        let document = parse(&text)?;
        tracing::debug!(
            guid = %document.guid(),
            container_bytes = bytes.len(),
            markup_bytes = text.len(),
            "loaded DSP document"
        );
        Ok(Self { document })
    }

    /// Decode container bytes and set the logical name from `file_name`.
    pub fn load_named(bytes: &[u8], file_name: &str) -> Result<Self, DspError> {
        let mut file = Self::load(bytes)?;
        file.document.logical_name = derive_title(file_name);
        Ok(file)
    }

    /// Read and decode a `.dsp` file. The logical name is recovered from
    /// the file name.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, DspError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::load_named(&bytes, &file_name)
    }

    /// Produce container bytes ready to be written to disk.
    ///
    /// Re-stamps `modify_time` unless suppressed, then refreshes the stored
    /// signature, so the document reflects exactly what was written.
    pub fn save(&mut self, options: SaveOptions) -> Vec<u8> {
        if options.touch_modify_time {
            self.document.attribute.touch();
        }
        let markup = self.raw_markup();
        let container = dsp_crypto::encode(markup.as_bytes());
        tracing::debug!(
            guid = %self.document.guid(),
            markup_bytes = markup.len(),
            container_bytes = container.len(),
            "saved DSP document"
        );
        container.into_bytes()
    }

    /// Save into `dir`, under `file_name` or the default generated name.
    /// Returns the path written.
    pub fn save_to_dir(
        &mut self,
        dir: impl AsRef<Path>,
        file_name: Option<&str>,
        options: SaveOptions,
    ) -> Result<PathBuf, DspError> {
        let name = match file_name {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.default_file_name(),
        };
        let path = dir.as_ref().join(name);
        let bytes = self.save(options);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Plaintext markup with a freshly computed signature, not encrypted.
    /// Does not touch `modify_time`.
    pub fn raw_markup(&mut self) -> String {
        self.document.refresh_signature();
        serialize(&self.document)
    }

    /// `<logical_name>_<guid>.dsp`
    pub fn default_file_name(&self) -> String {
        dsp_file_name(&self.document.logical_name, self.document.guid().as_str())
    }

    pub fn source_text(&self) -> &str {
        self.document.code.source_text()
    }

    /// Replace the source text, trimming surrounding whitespace.
    pub fn set_source_text(&mut self, source_text: &str) {
        self.document.code.set_source_text(source_text.trim());
    }

    pub fn logical_name(&self) -> &str {
        &self.document.logical_name
    }

    pub fn set_logical_name(&mut self, name: impl Into<String>) {
        self.document.logical_name = name.into();
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsp_core::CodeType;

    #[test]
    fn new_uses_title_when_file_name_blank() {
        let file = DspFile::new("Anonymous", " Untitled ", "print(1)", "  ").unwrap();
        assert_eq!(file.logical_name(), "Untitled");
        let file = DspFile::new("Anonymous", "Untitled", "", "demo_20240115103000").unwrap();
        assert_eq!(file.logical_name(), "demo_20240115103000");
    }

    #[test]
    fn new_rejects_empty_creator_and_title() {
        assert!(matches!(
            DspFile::new("", "Title", "", ""),
            Err(DspError::InvalidArgument(_))
        ));
        assert!(matches!(
            DspFile::new("Creator", "   ", "", ""),
            Err(DspError::InvalidArgument(_))
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut file = DspFile::new("Alice", "Demo", "a < b & c\n", "").unwrap();
        file.document_mut().code.set_scratch_description("<xml/>");
        let bytes = file.save(SaveOptions::default());
        let loaded = DspFile::load(&bytes).unwrap();

        let (a, b) = (file.document(), loaded.document());
        assert_eq!(a.attribute, b.attribute);
        assert_eq!(a.code, b.code);
        assert_eq!(b.attribute.code_type(), CodeType::PythonCode);
        assert_eq!(loaded.logical_name(), "");
    }

    #[test]
    fn save_refreshes_signature() {
        let mut file = DspFile::new("Alice", "Demo", "x = 1", "").unwrap();
        assert_eq!(file.document().attribute.sign(), "");
        file.save(SaveOptions::default());
        let expected = dsp_core::signature(file.document());
        assert_eq!(file.document().attribute.sign(), expected);

        file.set_source_text("x = 2");
        let bytes = file.save(SaveOptions::default());
        let loaded = DspFile::load(&bytes).unwrap();
        assert_eq!(loaded.document().attribute.sign(), dsp_core::signature(file.document()));
        assert_ne!(loaded.document().attribute.sign(), expected);
    }

    #[test]
    fn save_can_preserve_modify_time() {
        let mut file = DspFile::new("Alice", "Demo", "", "").unwrap();
        let stamp = chrono_stamp();
        file.document_mut().attribute.set_modify_time(stamp);
        file.save(SaveOptions::preserve_modify_time());
        assert_eq!(file.document().attribute.modify_time(), stamp);
        file.save(SaveOptions::default());
        assert_ne!(file.document().attribute.modify_time(), stamp);
    }

    fn chrono_stamp() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2001, 2, 3)
            .unwrap()
            .and_hms_opt(4, 5, 6)
            .unwrap()
    }

    #[test]
    fn set_source_text_trims() {
        let mut file = DspFile::new("a", "b", "", "").unwrap();
        file.set_source_text("\n\nprint(1)\n  ");
        assert_eq!(file.source_text(), "print(1)");
    }

    #[test]
    fn load_named_recovers_title() {
        let mut file = DspFile::new("a", "b", "", "Line Follower").unwrap();
        let name = file.default_file_name();
        let bytes = file.save(SaveOptions::default());
        let loaded = DspFile::load_named(&bytes, &name).unwrap();
        assert_eq!(loaded.logical_name(), "Line Follower");
        assert_eq!(loaded.document().guid(), file.document().guid());
    }

    #[test]
    fn raw_markup_is_signed_plaintext() {
        let mut file = DspFile::new("a", "b", "print('<hi>')", "").unwrap();
        let markup = file.raw_markup();
        assert!(markup.starts_with("<dji><attribute>"));
        assert!(markup.contains("<python_code><![CDATA[print('<hi>')]]></python_code>"));
        assert!(markup.contains(&format!("<sign>{}</sign>", file.document().attribute.sign())));
    }

    #[test]
    fn corrupt_input_errors() {
        assert!(matches!(
            DspFile::load(b"@@@"),
            Err(DspError::InvalidEncoding(_))
        ));
        let not_markup = dsp_crypto::encode(b"just text");
        assert!(matches!(
            DspFile::load(not_markup.as_bytes()),
            Err(DspError::MalformedDocument(_))
        ));
        let not_utf8 = dsp_crypto::encode(&[0xff, 0xfe, 0x00]);
        assert!(matches!(
            DspFile::load(not_utf8.as_bytes()),
            Err(DspError::MalformedDocument(_))
        ));
    }
}
