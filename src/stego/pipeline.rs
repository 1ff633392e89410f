// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Layered encode/decode pipeline.
//!
//! Encode runs the payload through both protection layers, frames the
//! result, and writes the frame bits into a working copy of the channel
//! array:
//! 1. Archive layer seals the payload (compress + password-encrypt)
//! 2. Authenticated cipher encrypts the blob under a key derived from a
//!    fresh random salt
//! 3. Container codec frames header + salt + ciphertext token
//! 4. Bit engine writes the frame into channel LSBs
//!
//! Decode is the exact mirror, each stage validating before the next runs.
//! The first failing stage aborts the whole operation; the caller's image
//! is never mutated and no partial plaintext is ever returned.

use crate::cover::CoverImage;
use crate::stego::archive::{Archiver, ZipArchiver};
use crate::stego::bits::{self, BitStream};
use crate::stego::container::{self, FLAG_ARCHIVED, FLAG_ENCRYPTED};
use crate::stego::crypto::{self, AuthenticatedCipher, GcmSivCipher};
use crate::stego::error::StegoError;

/// Embed a payload into a cover image using the default primitives
/// (AES-256 ZIP archiver, AES-256-GCM-SIV cipher).
///
/// # Arguments
/// - `cover`: The cover image; left untouched, a modified copy is returned.
/// - `payload`: Arbitrary bytes to hide. Zero-length is valid.
/// - `passphrase`: Keys both protection layers. Must be non-empty.
///
/// # Errors
/// - [`StegoError::EmptyPassphrase`] if `passphrase` is empty.
/// - [`StegoError::CapacityExceeded`] if the framed container does not fit
///   the image. Raised before any channel is written.
/// - [`StegoError::ArchiveFailed`] if the archive layer cannot seal.
pub fn embed(
    cover: &CoverImage,
    payload: &[u8],
    passphrase: &str,
) -> Result<CoverImage, StegoError> {
    embed_with(cover, payload, passphrase, &ZipArchiver, &GcmSivCipher)
}

/// Extract a payload from a stego image using the default primitives.
///
/// # Errors
/// - [`StegoError::EmptyPassphrase`] if `passphrase` is empty.
/// - [`StegoError::InvalidContainer`] if the image holds no container
///   (magic mismatch, truncation, unsupported flags, impossible length).
///   Raised before any key derivation.
/// - [`StegoError::AuthenticationFailed`] on a wrong passphrase or a
///   tampered ciphertext region.
/// - [`StegoError::ArchiveFailed`] if the archive blob cannot be opened.
pub fn extract(stego: &CoverImage, passphrase: &str) -> Result<Vec<u8>, StegoError> {
    extract_with(stego, passphrase, &ZipArchiver, &GcmSivCipher)
}

/// [`embed`] with caller-supplied archive and cipher primitives.
pub fn embed_with(
    cover: &CoverImage,
    payload: &[u8],
    passphrase: &str,
    archiver: &dyn Archiver,
    cipher: &dyn AuthenticatedCipher,
) -> Result<CoverImage, StegoError> {
    if passphrase.is_empty() {
        return Err(StegoError::EmptyPassphrase);
    }

    // 1. Seal the payload into the archive layer.
    let archived = archiver.seal(passphrase, payload)?;

    // 2. Encrypt the blob under a key derived from a fresh salt.
    let salt = crypto::generate_salt();
    let key = crypto::derive_key(passphrase, &salt);
    let token = cipher.encrypt(&key, &archived);

    // 3. Check capacity before touching any pixel. The length field is a
    //    u32, so a token beyond that cannot be framed either.
    let needed = container::CONTAINER_OVERHEAD + token.len();
    let available = cover.capacity();
    if needed > available || token.len() > u32::MAX as usize {
        return Err(StegoError::CapacityExceeded { needed, available });
    }

    tracing::debug!(
        payload_len = payload.len(),
        token_len = token.len(),
        available,
        "container framed"
    );

    // 4. Frame and write the bits into a working copy of the channels.
    let frame = container::build_container(FLAG_ENCRYPTED | FLAG_ARCHIVED, &salt, &token);
    let mut channels = cover.channels().to_vec();
    bits::embed_bits(&mut channels, BitStream::new(&frame))?;

    Ok(CoverImage::from_channels(cover.width(), cover.height(), channels))
}

/// [`extract`] with caller-supplied archive and cipher primitives.
pub fn extract_with(
    stego: &CoverImage,
    passphrase: &str,
    archiver: &dyn Archiver,
    cipher: &dyn AuthenticatedCipher,
) -> Result<Vec<u8>, StegoError> {
    if passphrase.is_empty() {
        return Err(StegoError::EmptyPassphrase);
    }

    let channels = stego.channels();

    // 1. Read and validate the fixed header before anything expensive.
    if channels.len() < container::HEADER_LEN * 8 {
        return Err(StegoError::InvalidContainer("image too small for a header"));
    }
    let header = bits::bits_to_bytes(bits::extract_bits(channels, container::HEADER_LEN * 8));
    let (flags, ciphertext_len) = container::unpack_header(&header)?;

    if flags & FLAG_ENCRYPTED == 0 {
        return Err(StegoError::InvalidContainer("encrypted flag not set"));
    }
    if flags & !(FLAG_ENCRYPTED | FLAG_ARCHIVED) != 0 {
        return Err(StegoError::InvalidContainer("unknown flag bits set"));
    }

    // 2. The declared length must fit what the image can actually hold.
    //    The claim can be up to u32::MAX bytes, more bits than a 32-bit
    //    usize can count, so the gate runs in u64.
    let declared_bits = (container::CONTAINER_OVERHEAD as u64 + u64::from(ciphertext_len)) * 8;
    if declared_bits > channels.len() as u64 {
        return Err(StegoError::InvalidContainer("declared length exceeds image capacity"));
    }
    let ciphertext_len = ciphertext_len as usize;
    let body_len = crypto::SALT_LEN + ciphertext_len;

    tracing::debug!(flags, ciphertext_len, "container header accepted");

    // 3. Read salt and ciphertext token from the bits after the header.
    let body = bits::bits_to_bytes(bits::extract_bits(
        &channels[container::HEADER_LEN * 8..],
        body_len * 8,
    ));
    let mut salt = [0u8; crypto::SALT_LEN];
    salt.copy_from_slice(&body[..crypto::SALT_LEN]);
    let token = &body[crypto::SALT_LEN..];

    // 4. Derive the key and verify-then-decrypt.
    let key = crypto::derive_key(passphrase, &salt);
    let plaintext = cipher.decrypt(&key, token)?;

    // 5. Open the archive only when the container says one is there.
    if flags & FLAG_ARCHIVED != 0 {
        archiver.open(passphrase, &plaintext)
    } else {
        Ok(plaintext)
    }
}
