//! Checksummed envelope for persisted records.
//!
//! Format: `MAGIC (4) || blake3(payload) (32) || payload`
//!
//! The codec alone cannot tell a truncated file from a short valid one, and
//! some bit flips still decode. The digest makes both detectable, so a damaged
//! record is skipped at load instead of surfacing as a wrong value.

use crate::error::{CoreError, Result};

/// Leading bytes of every sealed record.
pub const FRAME_MAGIC: [u8; 4] = *b"KSR1";

const DIGEST_LEN: usize = 32;
const HEADER_LEN: usize = FRAME_MAGIC.len() + DIGEST_LEN;

/// Wrap a payload in a frame.
pub fn seal(payload: &[u8]) -> Vec<u8> {
    let digest = blake3::hash(payload);
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&FRAME_MAGIC);
    buf.extend_from_slice(digest.as_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Verify a frame and borrow its payload.
pub fn open(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.len() < HEADER_LEN {
        return Err(CoreError::corrupt(format!(
            "frame too short: {} bytes, need at least {}",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let (magic, rest) = bytes.split_at(FRAME_MAGIC.len());
    if magic != FRAME_MAGIC {
        return Err(CoreError::corrupt(format!(
            "bad frame magic: {}",
            hex::encode(magic)
        )));
    }

    let (expected, payload) = rest.split_at(DIGEST_LEN);
    let actual = blake3::hash(payload);
    if actual.as_bytes().as_slice() != expected {
        return Err(CoreError::corrupt(format!(
            "checksum mismatch: expected {}, got {}",
            &hex::encode(expected)[..16],
            &actual.to_hex()[..16]
        )));
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_then_open() {
        let framed = seal(b"scan of /dev/sdb");
        assert_eq!(&framed[..4], b"KSR1");
        assert_eq!(open(&framed).unwrap(), b"scan of /dev/sdb");
    }

    #[test]
    fn test_empty_payload() {
        let framed = seal(&[]);
        assert_eq!(framed.len(), HEADER_LEN);
        assert!(open(&framed).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let framed = seal(b"payload");
        let result = open(&framed[..framed.len() - 1]);
        assert!(matches!(result, Err(CoreError::Corrupt(msg)) if msg.contains("checksum")));

        let result = open(&framed[..10]);
        assert!(matches!(result, Err(CoreError::Corrupt(msg)) if msg.contains("too short")));
    }

    #[test]
    fn test_flipped_bit_rejected() {
        let mut framed = seal(b"payload");
        let last = framed.len() - 1;
        framed[last] ^= 0x01;
        assert!(open(&framed).is_err());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut framed = seal(b"payload");
        framed[0] = b'X';
        let result = open(&framed);
        assert!(matches!(result, Err(CoreError::Corrupt(msg)) if msg.contains("magic")));
    }
}
