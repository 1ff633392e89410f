// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Embedding capacity calculation.
//!
//! One bit goes into each RGB channel byte, so a cover image offers
//! `width × height × 3` embeddable bits. Capacity is reported in whole
//! bytes; up to 7 remainder bits are unusable and never written.
//!
//! The reported capacity covers the entire container, including its fixed
//! 25-byte overhead (header + salt). Callers comparing a payload against
//! capacity must add [`CONTAINER_OVERHEAD`](crate::stego::container::CONTAINER_OVERHEAD)
//! and the ciphertext expansion first.

use crate::cover::CHANNELS_PER_PIXEL;

/// Maximum number of container bytes embeddable in a cover image.
///
/// `floor(width × height × 3 / 8)`. Pure; zero-area images yield 0.
pub fn capacity_bytes(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS_PER_PIXEL / 8
}
