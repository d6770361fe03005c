/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Lossless round-trip coverage across every frame variant

use nanorand::Rng;

use isogfx::isogfx_core::options::DecoderOptions;
use isogfx::{
    decode_frame, encode_frame, Frame, FrameType, MaskedDecoder, MaskedEncoder, Pixel,
    SpriteDecoder, SpriteEncoder, TileFrameDecoder, TileFrameEncoder
};

/// A reproducible frame of the given size with roughly one third of
/// its pixels transparent
fn random_frame(width: usize, height: usize, seed: u64) -> Frame {
    let mut rng = nanorand::WyRand::new_seed(seed);

    let rows = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| {
                    if rng.generate::<u8>() % 3 == 0 {
                        Pixel::transparent()
                    } else {
                        Pixel::opaque(rng.generate::<u8>())
                    }
                })
                .collect()
        })
        .collect();
    Frame::new(rows, FrameType::Regular, false)
}

/// The canonical 32×32 grid of a diagonal shape
fn tile_frame(frame_type: FrameType) -> Frame {
    let transparent = |x: usize, y: usize| -> bool {
        match frame_type {
            FrameType::LeftTriangle => {
                if y >= 16 {
                    x + 32 < 2 * y
                } else {
                    x < 32 - 2 * y
                }
            }
            FrameType::RightTriangle => {
                if y >= 16 {
                    x >= 64 - 2 * y
                } else {
                    x >= 2 * y
                }
            }
            FrameType::LeftTrapezoid => y >= 16 && x + 32 < 2 * y,
            FrameType::RightTrapezoid => y >= 16 && x >= 64 - 2 * y,
            _ => false
        }
    };

    let rows = (0..32)
        .map(|y| {
            (0..32)
                .map(|x| {
                    if transparent(x, y) {
                        Pixel::transparent()
                    } else {
                        Pixel::opaque((x * 7 + y) as u8)
                    }
                })
                .collect()
        })
        .collect();
    Frame::new(rows, frame_type, false)
}

#[test]
fn regular_sprites_round_trip() {
    for (width, height, seed) in [(1, 1, 1), (13, 7, 2), (64, 96, 3), (128, 40, 4)] {
        let frame = random_frame(width, height, seed);
        let encoded = SpriteEncoder::new(&frame).encode().unwrap();

        let mut decoder = SpriteDecoder::new(&encoded);
        decoder.set_width(width);
        let decoded = decoder.decode().unwrap();

        assert_eq!(decoded, frame, "{width}x{height}");
        assert_eq!(SpriteEncoder::new(&decoded).encode().unwrap(), encoded);
    }
}

#[test]
fn clipped_sprites_decode_without_any_hint() {
    // tall enough that the header's block offsets carry the width
    let mut frame = random_frame(24, 80, 5);
    frame.set_clipped(true);

    let encoded = SpriteEncoder::new(&frame).encode().unwrap();
    let decoded = SpriteDecoder::new(&encoded).decode().unwrap();

    assert_eq!(decoded, frame);
}

#[test]
fn header_width_and_explicit_width_agree() {
    let mut frame = random_frame(31, 70, 6);
    frame.set_clipped(true);

    let encoded = SpriteEncoder::new(&frame).encode().unwrap();

    let from_header = SpriteDecoder::new(&encoded).decode().unwrap();
    let mut decoder = SpriteDecoder::new(&encoded);
    decoder.set_width(31);
    let from_hint = decoder.decode().unwrap();

    assert_eq!(from_header, from_hint);
}

#[test]
fn masked_sprites_round_trip() {
    for (width, height, seed) in [(8, 40, 7), (51, 33, 8), (160, 64, 9)] {
        let mut frame = random_frame(width, height, seed);
        frame.set_clipped(true);

        let encoded = MaskedEncoder::new(&frame).encode().unwrap();
        let decoded = MaskedDecoder::new(&encoded).decode().unwrap();

        assert_eq!(decoded, frame, "{width}x{height}");
        assert_eq!(MaskedEncoder::new(&decoded).encode().unwrap(), encoded);
    }
}

#[test]
fn short_masked_sprites_need_the_width_hint() {
    let mut frame = random_frame(10, 4, 10);
    frame.set_clipped(true);

    let encoded = MaskedEncoder::new(&frame).encode().unwrap();

    let mut decoder = MaskedDecoder::new(&encoded);
    decoder.set_width(10);
    assert_eq!(decoder.decode().unwrap(), frame);
}

#[test]
fn every_tile_shape_round_trips_through_the_dispatcher() {
    let mut opaque_rng = nanorand::WyRand::new_seed(11);
    let square = Frame::new(
        (0..32)
            .map(|_| (0..32).map(|_| Pixel::opaque(opaque_rng.generate::<u8>())).collect())
            .collect(),
        FrameType::Square,
        false
    );
    let transparent_square = {
        let mut frame = random_frame(32, 32, 12);
        frame.set_frame_type(FrameType::TransparentSquare);
        frame
    };
    let empty = Frame::filled(32, 32, Pixel::transparent(), FrameType::Empty);

    let frames = [
        square,
        transparent_square,
        empty,
        tile_frame(FrameType::LeftTriangle),
        tile_frame(FrameType::RightTriangle),
        tile_frame(FrameType::LeftTrapezoid),
        tile_frame(FrameType::RightTrapezoid)
    ];

    for frame in &frames {
        let encoded = encode_frame(frame).unwrap();
        let decoded = decode_frame(
            &encoded,
            frame.frame_type(),
            None,
            DecoderOptions::default()
        )
        .unwrap();

        assert_eq!(&decoded, frame, "{:?}", frame.frame_type());
    }
}

#[test]
fn tile_and_level_wire_formats_are_interchangeable() {
    // the bytes of a left trapezoid tile are also a valid level
    // frame and classify as the matching level type
    let encoded = TileFrameEncoder::new(&tile_frame(FrameType::LeftTrapezoid))
        .encode()
        .unwrap();

    let level = decode_frame(
        &encoded,
        FrameType::LevelType4,
        None,
        DecoderOptions::default()
    )
    .unwrap();
    assert_eq!(level.frame_type(), FrameType::LevelType4);

    let tile = TileFrameDecoder::new(&encoded, FrameType::LeftTrapezoid)
        .decode()
        .unwrap();

    // identical pixels, different tags
    assert_eq!(level.rows(), tile.rows());
    assert_eq!(encode_frame(&level).unwrap(), encoded);
}

#[test]
fn zero_length_input_errors_everywhere() {
    assert!(SpriteDecoder::new(&[]).decode().is_err());
    assert!(MaskedDecoder::new(&[]).decode().is_err());
    assert!(decode_frame(&[], FrameType::LevelType0, None, DecoderOptions::default()).is_err());
    assert!(decode_frame(&[], FrameType::Square, None, DecoderOptions::default()).is_err());
}
