// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! # stratagem
//!
//! Layered LSB steganography for raster images. A payload is sealed into a
//! password-protected compressed archive, encrypted with AES-256-GCM-SIV
//! under a PBKDF2-derived key, framed in a self-describing binary
//! container, and written one bit per RGB channel into the cover image's
//! least-significant bits. Recovery needs both the image and the
//! passphrase; every layer fails closed.
//!
//! The cover provider (`cover` module) normalizes any decodable image to
//! RGB and re-encodes losslessly as PNG. The engine (`stego` module) is
//! pure in-memory byte work; file I/O lives in the CLI binary.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use stratagem::{embed, extract, CoverImage};
//!
//! let cover = CoverImage::from_bytes(&std::fs::read("photo.png").unwrap()).unwrap();
//! let stego = embed(&cover, b"meet at noon", "passphrase").unwrap();
//! std::fs::write("out.png", stego.to_png_bytes().unwrap()).unwrap();
//!
//! let payload = extract(&stego, "passphrase").unwrap();
//! assert_eq!(payload, b"meet at noon");
//! ```

pub mod cover;
pub mod stego;

pub use cover::CoverImage;
pub use stego::{capacity_bytes, embed, embed_with, extract, extract_with, StegoError};
pub use stego::{Archiver, AuthenticatedCipher, GcmSivCipher, ZipArchiver};
