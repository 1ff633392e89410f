// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Bit-level codec between container bytes and pixel-channel LSBs.
//!
//! Bytes are serialized most-significant bit first, then written one bit
//! per channel byte into that byte's least-significant bit, starting at
//! channel index 0. Extraction reads the same positions in the same order.
//!
//! [`BitStream`] is a finite, single-pass iterator: once a bit is consumed
//! it is gone, and `len()` reports exactly how many remain. The codec does
//! not self-delimit; callers request exact bit counts.

use crate::stego::error::StegoError;

/// Iterator over the bits of a byte slice, MSB-first within each byte.
pub struct BitStream<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitStream<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Iterator for BitStream<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.pos >= self.bytes.len() * 8 {
            return None;
        }
        let byte = self.bytes[self.pos / 8];
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() * 8 - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitStream<'_> {}

/// Regroup a bit stream (MSB-first) into bytes.
///
/// Consumes bits in groups of exactly 8; trailing bits that do not fill a
/// byte are discarded. Callers are expected to feed exact multiples of 8.
pub fn bits_to_bytes(bits: impl Iterator<Item = u8>) -> Vec<u8> {
    let (low, _) = bits.size_hint();
    let mut bytes = Vec::with_capacity(low / 8);
    let mut acc = 0u8;
    let mut filled = 0u8;
    for bit in bits {
        acc = (acc << 1) | (bit & 1);
        filled += 1;
        if filled == 8 {
            bytes.push(acc);
            acc = 0;
            filled = 0;
        }
    }
    bytes
}

/// Write a bit stream into the LSBs of `channels`, starting at index 0.
///
/// Each channel byte keeps its upper 7 bits. The length check happens
/// before any write: on [`StegoError::CapacityExceeded`] the channel array
/// is untouched. The error carries whole-byte counts (needed rounded up,
/// available rounded down).
pub fn embed_bits<I>(channels: &mut [u8], bits: I) -> Result<(), StegoError>
where
    I: ExactSizeIterator<Item = u8>,
{
    let needed_bits = bits.len();
    if needed_bits > channels.len() {
        return Err(StegoError::CapacityExceeded {
            needed: (needed_bits + 7) / 8,
            available: channels.len() / 8,
        });
    }
    for (channel, bit) in channels.iter_mut().zip(bits) {
        *channel = (*channel & 0xFE) | (bit & 1);
    }
    Ok(())
}

/// Read the LSBs of the first `count` channel bytes, in embed order.
///
/// Yields fewer than `count` bits if the channel array is shorter; callers
/// validate counts against the array length beforehand.
pub fn extract_bits(channels: &[u8], count: usize) -> impl Iterator<Item = u8> + '_ {
    channels.iter().take(count).map(|&ch| ch & 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitstream_is_msb_first() {
        let bits: Vec<u8> = BitStream::new(&[0b1010_0101]).collect();
        assert_eq!(bits, vec![1, 0, 1, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn bitstream_reports_exact_len() {
        let data = [0xFFu8, 0x00, 0x42];
        let mut stream = BitStream::new(&data);
        assert_eq!(stream.len(), 24);
        stream.next();
        stream.next();
        assert_eq!(stream.len(), 22);
        assert_eq!(stream.count(), 22);
    }

    #[test]
    fn empty_slice_yields_no_bits() {
        let mut stream = BitStream::new(&[]);
        assert_eq!(stream.len(), 0);
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn bytes_bits_roundtrip() {
        let original = [0xDEu8, 0xAD, 0xBE, 0xEF];
        let recovered = bits_to_bytes(BitStream::new(&original));
        assert_eq!(recovered, original);
    }

    #[test]
    fn trailing_bits_discarded() {
        // 12 bits: one full byte, 4 leftover bits that must be dropped.
        let bits = [1u8, 0, 1, 0, 0, 1, 0, 1, 1, 1, 1, 1];
        let bytes = bits_to_bytes(bits.into_iter());
        assert_eq!(bytes, vec![0b1010_0101]);

        // Fewer than 8 bits total produce no bytes at all.
        assert!(bits_to_bytes([1u8, 1, 0].into_iter()).is_empty());
    }

    #[test]
    fn embed_replaces_only_lsbs() {
        let mut channels = [0x80u8, 0x81, 0xFE, 0xFF, 0x00, 0x01, 0x7E, 0x7F];
        embed_bits(&mut channels, BitStream::new(&[0b1010_0101])).unwrap();
        assert_eq!(channels, [0x81, 0x80, 0xFF, 0xFE, 0x00, 0x01, 0x7E, 0x7F]);
    }

    #[test]
    fn embed_extract_roundtrip() {
        let mut channels = vec![0x40u8; 32];
        let payload = [0x53u8, 0x54, 0x47, 0x31];
        embed_bits(&mut channels, BitStream::new(&payload)).unwrap();
        let recovered = bits_to_bytes(extract_bits(&channels, 32));
        assert_eq!(recovered, payload);
    }

    #[test]
    fn oversized_payload_leaves_channels_untouched() {
        let mut channels = [0xAAu8; 7];
        let before = channels;
        let err = embed_bits(&mut channels, BitStream::new(&[0xFF])).unwrap_err();
        assert!(matches!(err, StegoError::CapacityExceeded { needed: 1, available: 0 }));
        assert_eq!(channels, before, "failed embed must not modify any channel");
    }

    #[test]
    fn extract_caps_at_channel_count() {
        let channels = [0x01u8, 0x00, 0x01];
        let bits: Vec<u8> = extract_bits(&channels, 100).collect();
        assert_eq!(bits, vec![1, 0, 1]);
    }
}
