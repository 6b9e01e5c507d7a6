//! # dsp-crypto — DSP Container Transport
//!
//! Turns plaintext markup into the text stored in a `.dsp` file and back:
//!
//! ```text
//! encode: plaintext → PKCS#7 pad → AES-128-CBC encrypt → base64
//! decode: base64 → AES-128-CBC decrypt → PKCS#7 unpad → plaintext
//! ```
//!
//! The key and IV are fixed interoperability constants taken from the
//! target application. They protect nothing; reproducing them exactly is
//! what lets the application open files written here.
//!
//! ## Crate Policy
//!
//! - Depends only on `dsp-core` internally, for [`dsp_core::DspError`].
//! - Pure, stateless functions over in-memory buffers. No streaming.
//! - No mocking in tests: every test runs the real cipher.

pub mod padding;
pub mod transport;

pub use padding::{pkcs7_pad, pkcs7_unpad, BLOCK_SIZE};
pub use transport::{decode, encode, DSP_IV, DSP_KEY};
