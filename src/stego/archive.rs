// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Archive layer: the second, independently keyed protection layer.
//!
//! Before encryption the payload is sealed into a password-protected ZIP
//! archive with a single DEFLATE-compressed entry. The ZIP layer runs its
//! own key derivation, so an attacker who somehow beats the outer cipher
//! still faces a separately keyed AES-256 archive.
//!
//! The pipeline depends on the [`Archiver`] trait, not on the ZIP
//! implementation, so tests can substitute mock primitives.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{AesMode, CompressionMethod, ZipArchive, ZipWriter};

use crate::stego::error::StegoError;

/// Name of the single archive entry holding the payload.
pub const ARCHIVE_ENTRY_NAME: &str = "payload.bin";

/// Compressing, password-protecting archive primitive.
pub trait Archiver {
    /// Compress and encrypt `payload` under `passphrase` into an archive blob.
    fn seal(&self, passphrase: &str, payload: &[u8]) -> Result<Vec<u8>, StegoError>;

    /// Decrypt and decompress a blob produced by [`seal`](Self::seal).
    ///
    /// # Errors
    /// [`StegoError::ArchiveFailed`] on a wrong passphrase, a corrupted or
    /// truncated blob, or a missing payload entry. Never returns garbage.
    fn open(&self, passphrase: &str, blob: &[u8]) -> Result<Vec<u8>, StegoError>;
}

/// Default archiver: AES-256 encrypted ZIP, one DEFLATE-compressed entry.
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn seal(&self, passphrase: &str, payload: &[u8]) -> Result<Vec<u8>, StegoError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .with_aes_encryption(AesMode::Aes256, passphrase);

        writer
            .start_file(ARCHIVE_ENTRY_NAME, options)
            .map_err(|_| StegoError::ArchiveFailed)?;
        writer.write_all(payload).map_err(|_| StegoError::ArchiveFailed)?;

        let cursor = writer.finish().map_err(|_| StegoError::ArchiveFailed)?;
        Ok(cursor.into_inner())
    }

    fn open(&self, passphrase: &str, blob: &[u8]) -> Result<Vec<u8>, StegoError> {
        let mut archive =
            ZipArchive::new(Cursor::new(blob)).map_err(|_| StegoError::ArchiveFailed)?;
        let mut entry = archive
            .by_name_decrypt(ARCHIVE_ENTRY_NAME, passphrase.as_bytes())
            .map_err(|_| StegoError::ArchiveFailed)?;

        let mut payload = Vec::new();
        entry
            .read_to_end(&mut payload)
            .map_err(|_| StegoError::ArchiveFailed)?;
        Ok(payload)
    }
}
