// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Container header packing and parsing.
//!
//! The container is the binary envelope that wraps the encrypted payload
//! before its bits are written into pixel channels:
//!
//! ```text
//! [4 bytes ] magic "STG1"
//! [1 byte  ] flags (bit 0 = encrypted, bit 1 = archived)
//! [4 bytes ] ciphertext length (big-endian u32)
//! [16 bytes] KDF salt (random per encode)
//! [N bytes ] ciphertext token
//! ```
//!
//! There is no checksum field: the authentication tag inside the ciphertext
//! token is the integrity gate for everything that matters, and the magic
//! plus length checks catch images that never held a container at all.

use crate::stego::crypto::SALT_LEN;
use crate::stego::error::StegoError;

/// Format identifier, first four embedded bytes.
pub const MAGIC: [u8; 4] = *b"STG1";

/// Flag bit 0: the ciphertext region is an authenticated-encryption token.
/// Always set by this encoder; a clear bit is rejected on decode.
pub const FLAG_ENCRYPTED: u8 = 0x01;

/// Flag bit 1: the plaintext behind the token is an archive blob that must
/// be opened with the passphrase. Decoders branch on this bit.
pub const FLAG_ARCHIVED: u8 = 0x02;

/// Header size: magic(4) + flags(1) + length(4) = 9 bytes.
pub const HEADER_LEN: usize = 9;

/// Fixed container overhead before the ciphertext: header(9) + salt(16).
pub const CONTAINER_OVERHEAD: usize = HEADER_LEN + SALT_LEN; // 25

/// Pack the fixed 9-byte container header. Deterministic, no failure mode.
pub fn pack_header(flags: u8, ciphertext_len: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(&MAGIC);
    header[4] = flags;
    header[5..9].copy_from_slice(&ciphertext_len.to_be_bytes());
    header
}

/// Unpack a container header, returning `(flags, ciphertext_len)`.
///
/// # Errors
/// [`StegoError::InvalidContainer`] if the input is shorter than
/// [`HEADER_LEN`] or the magic does not match. Flag validation is the
/// caller's job; this only reads the layout.
pub fn unpack_header(data: &[u8]) -> Result<(u8, u32), StegoError> {
    if data.len() < HEADER_LEN {
        return Err(StegoError::InvalidContainer("header truncated"));
    }
    if data[..4] != MAGIC {
        return Err(StegoError::InvalidContainer("magic mismatch"));
    }
    let flags = data[4];
    let ciphertext_len = u32::from_be_bytes([data[5], data[6], data[7], data[8]]);
    Ok((flags, ciphertext_len))
}

/// Assemble a complete container: `header ++ salt ++ ciphertext`.
///
/// The ciphertext length field is taken from `ciphertext.len()`, which the
/// caller has already bounded to `u32` via the capacity check.
pub fn build_container(flags: u8, salt: &[u8; SALT_LEN], ciphertext: &[u8]) -> Vec<u8> {
    let mut container = Vec::with_capacity(CONTAINER_OVERHEAD + ciphertext.len());
    container.extend_from_slice(&pack_header(flags, ciphertext.len() as u32));
    container.extend_from_slice(salt);
    container.extend_from_slice(ciphertext);
    container
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        for (flags, len) in [(0x00, 0u32), (0x01, 1), (0x03, 0xDEAD_BEEF), (0xFF, u32::MAX)] {
            let header = pack_header(flags, len);
            let (f, l) = unpack_header(&header).unwrap();
            assert_eq!((f, l), (flags, len), "failed for flags={flags:#04x} len={len}");
        }
    }

    #[test]
    fn header_layout_is_bit_exact() {
        let header = pack_header(FLAG_ENCRYPTED | FLAG_ARCHIVED, 0x0102_0304);
        assert_eq!(&header[..4], b"STG1");
        assert_eq!(header[4], 0x03);
        assert_eq!(&header[5..9], &[0x01, 0x02, 0x03, 0x04], "length must be big-endian");
    }

    #[test]
    fn bad_magic_rejected() {
        let mut header = pack_header(FLAG_ENCRYPTED, 5);
        header[0] = b'X';
        assert!(matches!(
            unpack_header(&header),
            Err(StegoError::InvalidContainer("magic mismatch"))
        ));
    }

    #[test]
    fn truncated_header_rejected() {
        let header = pack_header(FLAG_ENCRYPTED, 5);
        assert!(matches!(
            unpack_header(&header[..8]),
            Err(StegoError::InvalidContainer("header truncated"))
        ));
        assert!(matches!(unpack_header(&[]), Err(StegoError::InvalidContainer(_))));
    }

    #[test]
    fn container_layout() {
        let salt = [0xABu8; SALT_LEN];
        let ciphertext = [0x11u8, 0x22, 0x33];
        let container = build_container(FLAG_ENCRYPTED | FLAG_ARCHIVED, &salt, &ciphertext);

        assert_eq!(container.len(), CONTAINER_OVERHEAD + 3);
        assert_eq!(&container[..4], b"STG1");
        assert_eq!(container[4], 0x03);
        assert_eq!(&container[5..9], &[0, 0, 0, 3]);
        assert_eq!(&container[9..25], &salt);
        assert_eq!(&container[25..], &ciphertext);
    }

    #[test]
    fn empty_ciphertext_container() {
        let salt = [0u8; SALT_LEN];
        let container = build_container(FLAG_ENCRYPTED, &salt, &[]);
        assert_eq!(container.len(), CONTAINER_OVERHEAD);
        let (flags, len) = unpack_header(&container).unwrap();
        assert_eq!(flags, FLAG_ENCRYPTED);
        assert_eq!(len, 0);
    }
}
