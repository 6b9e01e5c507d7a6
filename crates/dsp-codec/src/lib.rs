//! # dsp-codec — DSP File Facade
//!
//! Composes the codec layers into the operations callers need:
//!
//! - [`DspFile::new`] — fresh document with a new guid and "now" dates.
//! - [`DspFile::load`] — container bytes → decrypt → parse.
//! - [`DspFile::save`] — stamp `modify_time`, refresh the signature,
//!   serialize, encrypt → container bytes.
//! - [`derive_title`] — title recovery from file names.
//!
//! Plus file helpers ([`DspFile::load_file`], [`DspFile::save_to_dir`]) that
//! own the conventions of generated file names: `<title>_<guid>.dsp`.
//!
//! ## Crate Policy
//!
//! - No CLI or settings concerns here; those belong to `dsp-cli`.
//! - Errors are returned as `DspError`, never logged and dropped. Logging
//!   is limited to `debug!` traces of what was read and written.

pub mod file;

pub use dsp_core::{derive_title, CodeType, Document, DspError, FirmwareVersion, Guid};
pub use file::{DspFile, SaveOptions};
