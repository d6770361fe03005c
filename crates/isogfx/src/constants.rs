/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Wire-format constants shared by the codec modules
//!
//! The level-frame bit patterns live here as plain data so they stay
//! auditable against the format documentation: one boolean per
//! two-pixel cell, 16 cells per scanline, scanlines in wire order
//! (bottom-to-top). A `true` cell reads two literal palette bytes,
//! a `false` cell is implicitly transparent. Each mask is paired with
//! the byte offsets of its zero padding pairs, which are skipped on
//! decode and re-inserted on encode.

/// Value of the leading u16 marking the optional 10-byte frame header
pub(crate) const FRAME_HEADER_SIGNATURE: u16 = 0x000A;

/// Size of the optional frame header, five little-endian u16 words
pub(crate) const FRAME_HEADER_SIZE: usize = 10;

/// Number of wire scanlines covered by one header block
pub(crate) const HEADER_BLOCK_LINES: usize = 32;

/// Tileset and level frames are always this size
pub(crate) const TILE_WIDTH: usize = 32;
pub(crate) const TILE_HEIGHT: usize = 32;

/// Byte size of the triangle level/tileset frames
pub(crate) const TRIANGLE_FRAME_SIZE: usize = 0x220;

/// Byte size of the trapezoid level/tileset frames
pub(crate) const TRAPEZOID_FRAME_SIZE: usize = 0x320;

/// Byte size of the fully opaque square frames
pub(crate) const SQUARE_FRAME_SIZE: usize = 0x400;

/// Byte offset where the top half of a triangle or trapezoid frame
/// starts, the bottom 16 scanlines plus their padding always occupy
/// exactly this much
pub(crate) const TOP_HALF_OFFSET: usize = 288;

/// Entries per level-frame mask, one per two-pixel cell of the
/// 32×32 canvas
pub(crate) const MASK_ENTRIES: usize = 512;

/// Cell pattern of the 0x220-byte left triangle frames
///
/// Scanline widths grow 2, 4, .., 32 through the bottom half and
/// shrink 30, 28, .., 0 through the top half, opaque cells hug the
/// right edge.
pub(crate) const LEFT_TRIANGLE_MASK: [bool; MASK_ENTRIES] = [
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, false,
];

/// Cell pattern of the 0x220-byte right triangle frames, the
/// mirror of [`LEFT_TRIANGLE_MASK`]
pub(crate) const RIGHT_TRIANGLE_MASK: [bool; MASK_ENTRIES] = [
    true , false, false, false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , false, false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , false, false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , false, false, false, false, false, false, false, false, false, false, false, false, false, false, false,
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, false,
];

/// Cell pattern of the 0x320-byte left trapezoid frames, the
/// left triangle bottom half under a fully opaque top half
pub(crate) const LEFT_TRAPEZOID_MASK: [bool; MASK_ENTRIES] = [
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, false, true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, false, true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, false, true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, false, true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, false, true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, false, true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, false, true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, false, true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, false, true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, false, true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, false, true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, false, true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, false, true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    false, true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
];

/// Cell pattern of the 0x320-byte right trapezoid frames, the
/// right triangle bottom half under a fully opaque top half
pub(crate) const RIGHT_TRAPEZOID_MASK: [bool; MASK_ENTRIES] = [
    true , false, false, false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , false, false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , false, false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , false, false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , false, false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , false, false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , false, false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , false, false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , false, false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , false, false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , false, false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , false, false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , false, false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , false, false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , false,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
    true , true , true , true , true , true , true , true , true , true , true , true , true , true , true , true ,
];

/// Byte offsets of the zero padding in left triangle frames
///
/// A pair precedes every scanline whose width is ≡ 2 (mod 4).
pub(crate) const LEFT_TRIANGLE_ZEROED_BYTES: [usize; 32] = [
    0, 1, 8, 9, 24, 25, 48, 49,
    80, 81, 120, 121, 168, 169, 224, 225,
    288, 289, 348, 349, 400, 401, 444, 445,
    480, 481, 508, 509, 528, 529, 540, 541,
];

/// Byte offsets of the zero padding in right triangle frames
///
/// A pair follows every scanline whose width is ≡ 2 (mod 4).
pub(crate) const RIGHT_TRIANGLE_ZEROED_BYTES: [usize; 32] = [
    2, 3, 14, 15, 34, 35, 62, 63,
    98, 99, 142, 143, 194, 195, 254, 255,
    318, 319, 374, 375, 422, 423, 462, 463,
    494, 495, 518, 519, 534, 535, 542, 543,
];

/// Byte offsets of the zero padding in left trapezoid frames,
/// the bottom half of [`LEFT_TRIANGLE_ZEROED_BYTES`]
pub(crate) const LEFT_TRAPEZOID_ZEROED_BYTES: [usize; 16] = [
    0, 1, 8, 9, 24, 25, 48, 49,
    80, 81, 120, 121, 168, 169, 224, 225,
];

/// Byte offsets of the zero padding in right trapezoid frames,
/// the bottom half of [`RIGHT_TRIANGLE_ZEROED_BYTES`]
pub(crate) const RIGHT_TRAPEZOID_ZEROED_BYTES: [usize; 16] = [
    2, 3, 14, 15, 34, 35, 62, 63,
    98, 99, 142, 143, 194, 195, 254, 255,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_bytes(mask: &[bool; MASK_ENTRIES], zeroed: &[usize]) -> usize {
        mask.iter().filter(|cell| **cell).count() * 2 + zeroed.len()
    }

    #[test]
    fn tables_add_up_to_the_frame_sizes() {
        assert_eq!(
            mask_bytes(&LEFT_TRIANGLE_MASK, &LEFT_TRIANGLE_ZEROED_BYTES),
            TRIANGLE_FRAME_SIZE
        );
        assert_eq!(
            mask_bytes(&RIGHT_TRIANGLE_MASK, &RIGHT_TRIANGLE_ZEROED_BYTES),
            TRIANGLE_FRAME_SIZE
        );
        assert_eq!(
            mask_bytes(&LEFT_TRAPEZOID_MASK, &LEFT_TRAPEZOID_ZEROED_BYTES),
            TRAPEZOID_FRAME_SIZE
        );
        assert_eq!(
            mask_bytes(&RIGHT_TRAPEZOID_MASK, &RIGHT_TRAPEZOID_ZEROED_BYTES),
            TRAPEZOID_FRAME_SIZE
        );
    }

    #[test]
    fn zeroed_offsets_come_in_ascending_pairs() {
        for table in [
            &LEFT_TRIANGLE_ZEROED_BYTES[..],
            &RIGHT_TRIANGLE_ZEROED_BYTES[..],
            &LEFT_TRAPEZOID_ZEROED_BYTES[..],
            &RIGHT_TRAPEZOID_ZEROED_BYTES[..]
        ] {
            assert!(table.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(table.chunks_exact(2).all(|pair| pair[0] + 1 == pair[1]));
        }
    }

    #[test]
    fn trapezoid_top_half_is_fully_opaque() {
        for mask in [&LEFT_TRAPEZOID_MASK, &RIGHT_TRAPEZOID_MASK] {
            assert!(mask[MASK_ENTRIES / 2..].iter().all(|cell| *cell));
        }
    }
}
