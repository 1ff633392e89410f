// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Steganographic encoding and decoding.
//!
//! The payload passes through two independent protection layers before its
//! bits ever touch a pixel:
//!
//! - **Archive layer** ([`archive`]): password-protected compressed ZIP,
//!   keyed by the ZIP format's own derivation.
//! - **Encryption layer** ([`crypto`]): AES-256-GCM-SIV under a
//!   PBKDF2-derived key, salt stored in the container.
//!
//! The framed result ([`container`]) is written one bit per channel LSB
//! ([`bits`]). [`embed`] and [`extract`] wire the default primitives;
//! [`embed_with`] and [`extract_with`] accept substitutes.

pub mod archive;
pub mod bits;
pub mod capacity;
pub mod container;
pub mod crypto;
pub mod error;
mod pipeline;

pub use archive::{Archiver, ZipArchiver};
pub use capacity::capacity_bytes;
pub use crypto::{AuthenticatedCipher, GcmSivCipher};
pub use error::StegoError;
pub use pipeline::{embed, embed_with, extract, extract_with};
