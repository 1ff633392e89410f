// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Cover image boundary: decoding, RGB normalization, lossless re-encoding.
//!
//! [`CoverImage`] owns the flat channel buffer the embedding engine works
//! on: one byte per color channel, pixels in row-major order, channels in
//! R, G, B order. Any decodable source (RGBA, grayscale, palette) is
//! normalized to RGB on load. Output is always PNG; a lossy format would
//! destroy the embedded LSBs.
//!
//! All operations are in-memory. File reads and writes live in the CLI.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::stego::capacity::capacity_bytes;
use crate::stego::error::StegoError;

/// Channels per pixel in the normalized representation.
pub const CHANNELS_PER_PIXEL: usize = 3;

/// A cover image as the embedding engine sees it.
#[derive(Debug)]
pub struct CoverImage {
    width: u32,
    height: u32,
    channels: Vec<u8>,
}

impl CoverImage {
    /// Decode an image from its encoded bytes and normalize it to RGB.
    ///
    /// # Errors
    /// [`StegoError::InvalidImage`] if the bytes are not a decodable image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self {
            width,
            height,
            channels: rgb.into_raw(),
        })
    }

    /// Build a cover image directly from a channel buffer.
    ///
    /// # Panics
    /// If `channels.len() != width × height × 3`. That is a caller bug, not
    /// a runtime condition.
    pub fn from_channels(width: u32, height: u32, channels: Vec<u8>) -> Self {
        assert_eq!(
            channels.len(),
            width as usize * height as usize * CHANNELS_PER_PIXEL,
            "channel buffer does not match dimensions"
        );
        Self { width, height, channels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major R,G,B channel bytes.
    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    /// Maximum container bytes this image can hold.
    pub fn capacity(&self) -> usize {
        capacity_bytes(self.width, self.height)
    }

    /// Re-encode the channel buffer as PNG bytes.
    ///
    /// PNG is lossless for 8-bit RGB, so a decode of the result returns the
    /// exact same channel values in the exact same order.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let buffer = RgbImage::from_raw(self.width, self.height, self.channels.clone())
            .expect("channel buffer matches dimensions");
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(buffer).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
