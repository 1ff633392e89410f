// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! End-to-end embed/extract round-trip tests over synthetic covers.

use stratagem::{capacity_bytes, embed, extract, CoverImage, StegoError};

/// Deterministic RGB gradient cover. The LSB pattern it produces never
/// starts with the container magic, so decode attempts on a fresh cover
/// fail deterministically.
fn gradient_cover(width: u32, height: u32) -> CoverImage {
    let mut channels = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            for c in 0..3u32 {
                channels.push(((x * 7 + y * 13 + c * 31) % 256) as u8);
            }
        }
    }
    CoverImage::from_channels(width, height, channels)
}

#[test]
fn roundtrip_basic() {
    let cover = gradient_cover(100, 100);
    assert_eq!(capacity_bytes(100, 100), 3750);
    assert_eq!(cover.capacity(), 3750);

    let stego = embed(&cover, b"hello", "pw1").unwrap();
    assert_eq!(stego.width(), 100);
    assert_eq!(stego.height(), 100);

    let payload = extract(&stego, "pw1").unwrap();
    assert_eq!(payload, b"hello");
}

#[test]
fn wrong_passphrase_never_returns_bytes() {
    let cover = gradient_cover(100, 100);
    let stego = embed(&cover, b"hello", "pw1").unwrap();

    let result = extract(&stego, "pw2");
    assert!(
        matches!(result, Err(StegoError::AuthenticationFailed)),
        "wrong passphrase must fail authentication, got {result:?}"
    );
}

#[test]
fn roundtrip_binary_payload() {
    let cover = gradient_cover(80, 80);
    let payload: Vec<u8> = (0..1000u32).map(|i| (i * 31 % 256) as u8).collect();

    let stego = embed(&cover, &payload, "binary-pass").unwrap();
    assert_eq!(extract(&stego, "binary-pass").unwrap(), payload);
}

#[test]
fn roundtrip_empty_payload() {
    let cover = gradient_cover(60, 60);
    let stego = embed(&cover, b"", "pass").unwrap();
    assert_eq!(extract(&stego, "pass").unwrap(), b"");
}

#[test]
fn roundtrip_various_lengths() {
    let cover = gradient_cover(100, 100);
    for len in [1usize, 64, 1024] {
        let payload: Vec<u8> = (0..len).map(|i| (b'A' + (i % 26) as u8)).collect();
        let stego = embed(&cover, &payload, "multi-test").unwrap();
        assert_eq!(extract(&stego, "multi-test").unwrap(), payload, "failed for length {len}");
    }
}

#[test]
fn stego_only_touches_lsbs() {
    let cover = gradient_cover(50, 50);
    let stego = embed(&cover, b"subliminal", "pw").unwrap();
    for (i, (a, b)) in cover.channels().iter().zip(stego.channels()).enumerate() {
        assert_eq!(a & 0xFE, b & 0xFE, "upper bits changed at channel {i}");
    }
}

#[test]
fn tampered_ciphertext_fails_authentication() {
    let cover = gradient_cover(100, 100);
    let stego = embed(&cover, b"hello", "pw1").unwrap();

    // Header + salt occupy the first 200 bits; channel 300 is inside the
    // ciphertext region.
    let mut channels = stego.channels().to_vec();
    channels[300] ^= 0x01;
    let tampered = CoverImage::from_channels(100, 100, channels);

    let result = extract(&tampered, "pw1");
    assert!(
        matches!(result, Err(StegoError::AuthenticationFailed)),
        "single-bit tamper must fail closed, got {result:?}"
    );
}

#[test]
fn plain_cover_is_not_a_container() {
    let cover = gradient_cover(50, 50);
    let result = extract(&cover, "pw");
    assert!(matches!(result, Err(StegoError::InvalidContainer(_))));
}

#[test]
fn capacity_boundary_is_exact() {
    // Provoke a capacity failure to learn the framed size of this payload.
    let tiny = gradient_cover(4, 4);
    let err = embed(&tiny, b"hi", "pw").unwrap_err();
    let needed = match err {
        StegoError::CapacityExceeded { needed, available } => {
            assert_eq!(available, 6);
            assert!(needed > available);
            needed
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    };

    // A cover with exactly `needed` bytes of capacity fits the payload.
    let exact_width = ((8 * needed + 2) / 3) as u32;
    let exact = gradient_cover(exact_width, 1);
    assert_eq!(exact.capacity(), needed);
    let stego = embed(&exact, b"hi", "pw").unwrap();
    assert_eq!(extract(&stego, "pw").unwrap(), b"hi");

    // One byte less and the same payload is rejected.
    let under_width = ((8 * (needed - 1) + 2) / 3) as u32;
    let under = gradient_cover(under_width, 1);
    assert_eq!(under.capacity(), needed - 1);
    assert!(matches!(
        embed(&under, b"hi", "pw"),
        Err(StegoError::CapacityExceeded { .. })
    ));
}

#[test]
fn stego_survives_png_roundtrip() {
    let cover = gradient_cover(64, 48);
    let stego = embed(&cover, b"across the wire", "pw").unwrap();

    let png = stego.to_png_bytes().unwrap();
    let reloaded = CoverImage::from_bytes(&png).unwrap();

    assert_eq!(reloaded.channels(), stego.channels());
    assert_eq!(extract(&reloaded, "pw").unwrap(), b"across the wire");
}

#[test]
fn embeds_are_salted_differently() {
    // Same cover, payload, and passphrase twice: the random salt and nonce
    // must make the embedded bits differ.
    let cover = gradient_cover(40, 40);
    let a = embed(&cover, b"same", "pw").unwrap();
    let b = embed(&cover, b"same", "pw").unwrap();
    assert_ne!(a.channels(), b.channels());
}
