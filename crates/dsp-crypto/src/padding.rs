//! # PKCS#7 Padding
//!
//! Applied outside the cipher. Every inconsistent tail on unpad is
//! reported as `InvalidPadding`.

use dsp_core::DspError;

/// Cipher block size in bytes (AES).
pub const BLOCK_SIZE: usize = 16;

/// Pad `data` to a multiple of [`BLOCK_SIZE`].
///
/// Always adds between 1 and 16 bytes, each equal to the pad length; an
/// input that is already block-aligned gains a full block.
pub fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    // pad is in 1..=16, so it fits in a byte.
    out.resize(data.len() + pad, pad as u8);
    out
}

/// Strip PKCS#7 padding.
///
/// # Errors
///
/// `InvalidPadding` if `data` is empty, the last byte `p` is 0 or larger
/// than the block size or the input, or the last `p` bytes are not all `p`.
pub fn pkcs7_unpad(data: &[u8]) -> Result<&[u8], DspError> {
    let &last = data.last().ok_or(DspError::InvalidPadding)?;
    let pad = usize::from(last);
    if pad == 0 || pad > BLOCK_SIZE || pad > data.len() {
        return Err(DspError::InvalidPadding);
    }
    let (body, tail) = data.split_at(data.len() - pad);
    if tail.iter().any(|&b| b != last) {
        return Err(DspError::InvalidPadding);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gains_full_block() {
        assert_eq!(pkcs7_pad(b""), vec![16u8; 16]);
    }

    #[test]
    fn aligned_input_gains_full_block() {
        let padded = pkcs7_pad(&[7u8; 16]);
        assert_eq!(padded.len(), 32);
        assert_eq!(&padded[16..], &[16u8; 16]);
    }

    #[test]
    fn short_input() {
        assert_eq!(pkcs7_pad(b"abc").len(), 16);
        assert_eq!(pkcs7_pad(b"abc")[15], 13);
    }

    #[test]
    fn unpad_reverses_pad() {
        assert_eq!(pkcs7_unpad(&pkcs7_pad(b"hello")).unwrap(), b"hello");
        assert_eq!(pkcs7_unpad(&pkcs7_pad(b"")).unwrap(), b"");
    }

    #[test]
    fn zero_pad_rejected() {
        let mut block = vec![1u8; 16];
        block[15] = 0;
        assert!(matches!(pkcs7_unpad(&block), Err(DspError::InvalidPadding)));
    }

    #[test]
    fn oversized_pad_rejected() {
        let mut block = vec![17u8; 32];
        block[31] = 17;
        assert!(matches!(pkcs7_unpad(&block), Err(DspError::InvalidPadding)));
    }

    #[test]
    fn inconsistent_pad_rejected() {
        let mut block = pkcs7_pad(b"0123456789");
        block[11] ^= 0xff;
        assert!(matches!(pkcs7_unpad(&block), Err(DspError::InvalidPadding)));
    }

    #[test]
    fn empty_and_too_short_rejected() {
        assert!(matches!(pkcs7_unpad(b""), Err(DspError::InvalidPadding)));
        assert!(matches!(pkcs7_unpad(&[4, 4, 4]), Err(DspError::InvalidPadding)));
    }
}
