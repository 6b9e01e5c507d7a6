//! # dsp-core — Foundational Types for DSP Files
//!
//! This crate is the leaf of the workspace. It defines the in-memory DSP
//! document and everything that operates on its plaintext form:
//!
//! - [`document`] — `Document`, `Attribute` and `Code`, with validated
//!   constructors and setters.
//! - [`markup`] — the two-mode serializer (escaped scalars, verbatim literal
//!   blocks) producing the target application's markup.
//! - [`parser`] — the tolerant parser reading that markup back.
//! - [`signature`] — the deterministic 16-character content signature.
//! - [`filename`] — title recovery from generated or user file names.
//!
//! Encryption lives in `dsp-crypto`; the `load`/`save` facade in
//! `dsp-codec`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dsp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Nothing here logs. Every failure is returned as a [`DspError`].

pub mod code_type;
pub mod document;
pub mod error;
pub mod filename;
pub mod firmware;
pub mod identity;
pub mod markup;
pub mod parser;
pub mod signature;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use code_type::CodeType;
pub use document::{Attribute, Code, Document};
pub use error::DspError;
pub use filename::{derive_title, dsp_file_name};
pub use firmware::FirmwareVersion;
pub use identity::Guid;
pub use markup::{serialize, MarkupWriter};
pub use parser::parse;
pub use signature::signature;
