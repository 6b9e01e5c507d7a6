//! # Crypto Transport — AES-128-CBC + base64
//!
//! The container text of a `.dsp` file is standard base64 (padded, no line
//! wrapping) of the AES-128-CBC ciphertext of the PKCS#7-padded plaintext,
//! under [`DSP_KEY`] and [`DSP_IV`].

use aes::Aes128;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use dsp_core::DspError;

use crate::padding::{pkcs7_pad, pkcs7_unpad, BLOCK_SIZE};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// AES key extracted from the RoboMaster application.
pub const DSP_KEY: [u8; 16] = *b"TRoP4GWuc30k6WUp";

/// CBC initialization vector extracted from the RoboMaster application.
pub const DSP_IV: [u8; 16] = *b"bP3crVEO6wABzOc0";

/// Encrypt plaintext bytes into container text.
pub fn encode(plaintext: &[u8]) -> String {
    STANDARD.encode(encrypt(plaintext))
}

/// Decrypt container text into plaintext bytes.
///
/// Leading and trailing ASCII whitespace (a trailing newline left by an
/// editor, say) is ignored.
///
/// # Errors
///
/// - `InvalidEncoding` if the text is not standard base64.
/// - `CiphertextLength` if the ciphertext is not block-aligned.
/// - `InvalidPadding` if the decrypted padding is inconsistent, which is
///   what a corrupt file or a foreign key produces.
pub fn decode(container: impl AsRef<[u8]>) -> Result<Vec<u8>, DspError> {
    let text = container.as_ref().trim_ascii();
    let ciphertext = STANDARD
        .decode(text)
        .map_err(|e| DspError::InvalidEncoding(e.to_string()))?;
    decrypt(&ciphertext)
}

/// Pad and encrypt under the fixed key and IV.
pub fn encrypt(plaintext: &[u8]) -> Vec<u8> {
    let padded = pkcs7_pad(plaintext);
    Aes128CbcEnc::new(&DSP_KEY.into(), &DSP_IV.into()).encrypt_padded_vec_mut::<NoPadding>(&padded)
}

/// Decrypt under the fixed key and IV and strip the padding.
pub fn decrypt(ciphertext: &[u8]) -> Result<Vec<u8>, DspError> {
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(DspError::CiphertextLength(ciphertext.len()));
    }
    let padded = Aes128CbcDec::new(&DSP_KEY.into(), &DSP_IV.into())
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| DspError::InvalidPadding)?;
    Ok(pkcs7_unpad(&padded)?.to_vec())
}
