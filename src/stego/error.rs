// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from cover-image decoding through
//! container parsing, decryption, and archive extraction. Every pipeline
//! stage aborts on its first error; no partial output is ever produced.

use core::fmt;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug)]
pub enum StegoError {
    /// The cover image bytes could not be decoded.
    InvalidImage(image::ImageError),
    /// The passphrase is empty. Rejected before any cryptographic work.
    EmptyPassphrase,
    /// The framed container does not fit the cover image.
    /// Both counts are in bytes.
    CapacityExceeded { needed: usize, available: usize },
    /// The extracted bytes are not a container this system produced
    /// (bad magic, truncation, or unsupported flags).
    InvalidContainer(&'static str),
    /// Ciphertext authentication failed (wrong passphrase or tampered data).
    AuthenticationFailed,
    /// The archive layer rejected the blob (wrong passphrase or corruption).
    ArchiveFailed,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImage(e) => write!(f, "invalid cover image: {e}"),
            Self::EmptyPassphrase => write!(f, "passphrase must not be empty"),
            Self::CapacityExceeded { needed, available } => {
                write!(f, "payload needs {needed} bytes but the image holds at most {available}")
            }
            Self::InvalidContainer(reason) => write!(f, "invalid container: {reason}"),
            Self::AuthenticationFailed => {
                write!(f, "decryption failed (wrong passphrase or tampered image?)")
            }
            Self::ArchiveFailed => write!(f, "archive layer failed (wrong passphrase or corrupted blob)"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidImage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for StegoError {
    fn from(e: image::ImageError) -> Self {
        Self::InvalidImage(e)
    }
}
