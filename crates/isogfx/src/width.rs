/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Frame width recovery
//!
//! Sprite containers do not store frame dimensions anywhere, so when
//! the caller has no width either the decoder has to recover it from
//! the frame bytes themselves. Two independent strategies exist:
//! replaying the control-byte scan over the 32-line blocks delimited
//! by the optional frame header, and, for the regular encoding only,
//! structural inference from the run lengths.

use alloc::vec::Vec;

use isogfx_core::bytestream::ByteReader;

use crate::constants::{FRAME_HEADER_SIGNATURE, FRAME_HEADER_SIZE, HEADER_BLOCK_LINES};

/// The two control-byte schemes a header replay can encounter
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum RleScheme {
    /// Regular encoding, `b > 0x7F` transparent run, otherwise
    /// literal run
    Sprite,
    /// Masked encoding with the three-band control bytes
    Masked
}

/// Outcome of the header-based width strategy
///
/// The caller maps these differently: the regular codec falls back to
/// data inference on anything but `Width`, the masked codec has no
/// fallback and reports mismatches as hard errors.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum HeaderWidth {
    Width(usize),
    /// The header has no non-zero block offsets to replay
    NoBlocks,
    /// Two blocks derived different widths
    Mismatch(usize, usize)
}

/// Return true if `data` starts with the 10-byte frame header
/// signature
pub(crate) fn has_frame_header(data: &[u8]) -> bool {
    data.len() >= FRAME_HEADER_SIZE
        && ByteReader::new(data).get_u16_le() == FRAME_HEADER_SIGNATURE
}

/// Count the pixels described by the control bytes of
/// `data[start..end]`
///
/// Counts run lengths as declared even when the trailing literal
/// payload is truncated; the decode proper reports such corruption,
/// inference only needs the totals.
fn count_pixels(data: &[u8], scheme: RleScheme) -> usize {
    let mut stream = ByteReader::new(data);
    let mut pixels = 0;

    while !stream.eof() {
        let control = stream.get_u8();

        match scheme {
            RleScheme::Sprite => {
                if control > 0x7F {
                    pixels += 256 - usize::from(control);
                } else {
                    pixels += usize::from(control);
                    stream.skip(usize::from(control));
                }
            }
            RleScheme::Masked => {
                if control == 0 {
                    // reserved, carries no pixels
                } else if control < 0x80 {
                    pixels += usize::from(control);
                } else if control < 0xBF {
                    pixels += 0xBF - usize::from(control);
                    stream.skip(1);
                } else {
                    pixels += 256 - usize::from(control);
                    stream.skip(256 - usize::from(control));
                }
            }
        }
    }
    pixels
}

/// Derive the frame width from the five u16 header words
///
/// Each non-zero pair of consecutive words delimits a block of 32
/// wire scanlines; replaying the control-byte scan over a block and
/// dividing the pixel count by 32 yields a width candidate. All
/// blocks must agree exactly for the header to be trusted.
pub(crate) fn width_from_header(data: &[u8], scheme: RleScheme) -> HeaderWidth {
    if !has_frame_header(data) {
        return HeaderWidth::NoBlocks;
    }
    let mut stream = ByteReader::new(data);
    let mut header = [0_usize; 5];

    for word in &mut header {
        *word = usize::from(stream.get_u16_le());
    }

    let mut frame_width = 0;

    for i in 0..4 {
        if header[i + 1] == 0 {
            break;
        }
        let start = header[i].min(data.len());
        let end = header[i + 1].min(data.len());

        if start >= end {
            break;
        }
        let width = count_pixels(&data[start..end], scheme) / HEADER_BLOCK_LINES;

        // The calculated width has to be the same for all blocks
        if frame_width != 0 && frame_width != width {
            return HeaderWidth::Mismatch(frame_width, width);
        }
        frame_width = width;
    }

    if frame_width == 0 {
        HeaderWidth::NoBlocks
    } else {
        HeaderWidth::Width(frame_width)
    }
}

/// Infer the frame width structurally from the run lengths of a
/// regular-RLE frame
///
/// Builds one `(transparent, pixel count)` group per control byte.
/// Runs never cross scanlines, so two consecutive groups of the same
/// transparency class signal a wrap: the encoder had to split there
/// because a new line started. The cumulative pixel count between
/// wraps is a width candidate and the smallest one wins. Returns 0
/// when no strategy produces a usable width.
pub(crate) fn width_from_data(data: &[u8]) -> usize {
    let mut stream = ByteReader::new(data);
    let mut groups: Vec<(bool, usize)> = Vec::new();

    while !stream.eof() {
        let control = stream.get_u8();

        if control > 0x7F {
            groups.push((true, 256 - usize::from(control)));
        } else if control > 0 {
            stream.skip(usize::from(control));
            groups.push((false, usize::from(control)));
        }
        // a zero control byte describes no pixels and would confuse
        // the wrap detection below, drop it
    }

    let total: usize = groups.iter().map(|(_, count)| count).sum();

    if total == 0 {
        return 0;
    }

    // Walk the groups looking for scanline wraps
    let mut width = 0;
    let mut pixel_count = 0;

    for i in 1..groups.len() {
        pixel_count += groups[i - 1].1;

        if groups[i].0 == groups[i - 1].0 {
            if width == 0 || pixel_count < width {
                width = pixel_count;
            }
            pixel_count = 0;
        }
    }

    // No wrap at all: a single-line frame, its width is the last two
    // groups combined
    if width == 0 && groups.len() >= 2 {
        width = groups[groups.len() - 1].1 + groups[groups.len() - 2].1;
    }

    if width != 0 && total % width == 0 {
        return width;
    }

    // The candidate does not divide the frame evenly, fall back to
    // the smallest cumulative group prefix that does and that is at
    // least as wide as the largest single group
    let largest = groups.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let mut cumulative = 0;

    for (_, count) in &groups {
        cumulative += count;

        if cumulative >= largest && total % cumulative == 0 {
            return cumulative;
        }
    }
    0
}
