//! # Error Types — DSP Codec Failures
//!
//! Defines the single error type returned by every layer of the codec.
//! All variants use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every failure is a deterministic data-integrity failure. Nothing here
//!   is transient, so callers never retry.
//! - The codec never logs or swallows an error; it returns it to the
//!   immediate caller, which decides how to surface it.
//! - Transport failures (`InvalidEncoding`, `CiphertextLength`,
//!   `InvalidPadding`) all mean "this is not a DSP container we can open",
//!   typically a corrupt file or one produced under a different key.

use thiserror::Error;

/// Top-level error type for DSP encoding and decoding.
#[derive(Error, Debug)]
pub enum DspError {
    /// The container text is not valid standard base64.
    #[error("invalid base64 container: {0}")]
    InvalidEncoding(String),

    /// The decoded ciphertext is not a whole number of cipher blocks.
    #[error("ciphertext length {0} is not a multiple of the 16-byte block size")]
    CiphertextLength(usize),

    /// PKCS#7 padding check failed after decryption.
    #[error("invalid PKCS#7 padding")]
    InvalidPadding,

    /// The plaintext does not parse as a DSP markup document, or a
    /// required structural element is absent.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A constructor or setter argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The `code_type` element carries a tag that is neither `python`
    /// nor `scratch`.
    #[error("unsupported code type: {0:?}")]
    UnsupportedCodeType(String),

    /// IO error (file helpers of the facade).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for DspError {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ciphertext_length_display() {
        let msg = DspError::CiphertextLength(17).to_string();
        assert!(msg.contains("17"));
        assert!(msg.contains("16-byte"));
    }

    #[test]
    fn unsupported_code_type_quotes_tag() {
        let msg = DspError::UnsupportedCodeType("lua".to_string()).to_string();
        assert_eq!(msg, "unsupported code type: \"lua\"");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DspError = io.into();
        assert!(matches!(err, DspError::Io(_)));
    }
}
