/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The fixed-size level frame encodings
//!
//! Level containers store three special frame sizes: 0x400-byte fully
//! opaque squares and 0x220/0x320-byte frames whose transparency
//! follows one of four static bit patterns (left/right triangle,
//! left/right trapezoid). The patterns live in [`constants`] as plain
//! 512-entry cell masks paired with the offsets of their zero padding
//! pairs.
//!
//! Classification has to run before decoding since it picks the mask:
//! a frame is a given variant iff every byte at that variant's
//! padding offsets is zero.
//!
//! [`constants`]: crate::constants

use alloc::vec::Vec;

use isogfx_core::bytestream::{ByteReader, ByteWriter};
use isogfx_core::log::trace;
use isogfx_core::options::DecoderOptions;

use crate::constants::{
    LEFT_TRAPEZOID_MASK, LEFT_TRAPEZOID_ZEROED_BYTES, LEFT_TRIANGLE_MASK,
    LEFT_TRIANGLE_ZEROED_BYTES, MASK_ENTRIES, RIGHT_TRAPEZOID_MASK, RIGHT_TRAPEZOID_ZEROED_BYTES,
    RIGHT_TRIANGLE_MASK, RIGHT_TRIANGLE_ZEROED_BYTES, SQUARE_FRAME_SIZE, TILE_HEIGHT, TILE_WIDTH,
    TRAPEZOID_FRAME_SIZE, TRIANGLE_FRAME_SIZE
};
use crate::errors::{GfxDecodeErrors, GfxEncodeErrors};
use crate::frame::{Frame, FrameType, Pixel};

/// The mask and padding offsets of one bit-pattern variant
fn variant_tables(frame_type: FrameType) -> Option<(&'static [bool; MASK_ENTRIES], &'static [usize])> {
    match frame_type {
        FrameType::LevelType2 => Some((&LEFT_TRIANGLE_MASK, &LEFT_TRIANGLE_ZEROED_BYTES)),
        FrameType::LevelType3 => Some((&RIGHT_TRIANGLE_MASK, &RIGHT_TRIANGLE_ZEROED_BYTES)),
        FrameType::LevelType4 => Some((&LEFT_TRAPEZOID_MASK, &LEFT_TRAPEZOID_ZEROED_BYTES)),
        FrameType::LevelType5 => Some((&RIGHT_TRAPEZOID_MASK, &RIGHT_TRAPEZOID_ZEROED_BYTES)),
        _ => None
    }
}

/// Return true if every byte of `data` at the given offsets is zero
fn padding_is_zero(data: &[u8], zeroed: &[usize]) -> bool {
    zeroed.iter().all(|offset| data[*offset] == 0)
}

/// A decoder for the fixed-size level frame encodings
pub struct LevelFrameDecoder<'a> {
    data:    &'a [u8],
    options: DecoderOptions
}

impl<'a> LevelFrameDecoder<'a> {
    /// Create a new level frame decoder
    ///
    /// # Arguments
    /// - `data`: The raw bytes of one frame
    pub fn new(data: &'a [u8]) -> LevelFrameDecoder<'a> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> LevelFrameDecoder<'a> {
        LevelFrameDecoder { data, options }
    }

    /// Classify a level frame by size and padding bytes
    ///
    /// For the two masked sizes the left variant is probed first;
    /// 0x400-byte frames are always the fully opaque square. Sizes
    /// that match nothing classify as [`FrameType::Unknown`], the
    /// caller usually falls back to the regular sprite decoder then.
    pub fn classify(data: &[u8]) -> FrameType {
        match data.len() {
            TRIANGLE_FRAME_SIZE => {
                if padding_is_zero(data, &LEFT_TRIANGLE_ZEROED_BYTES) {
                    FrameType::LevelType2
                } else if padding_is_zero(data, &RIGHT_TRIANGLE_ZEROED_BYTES) {
                    FrameType::LevelType3
                } else {
                    FrameType::Unknown
                }
            }
            TRAPEZOID_FRAME_SIZE => {
                if padding_is_zero(data, &LEFT_TRAPEZOID_ZEROED_BYTES) {
                    FrameType::LevelType4
                } else if padding_is_zero(data, &RIGHT_TRAPEZOID_ZEROED_BYTES) {
                    FrameType::LevelType5
                } else {
                    FrameType::Unknown
                }
            }
            SQUARE_FRAME_SIZE => FrameType::LevelType0,
            _ => FrameType::Unknown
        }
    }

    /// Classify and decode the frame
    pub fn decode(&mut self) -> Result<Frame, GfxDecodeErrors> {
        if self.data.is_empty() {
            return Err(GfxDecodeErrors::EmptyInput);
        }
        if TILE_WIDTH > self.options.max_width() || TILE_HEIGHT > self.options.max_height() {
            return Err(GfxDecodeErrors::LargeDimensions(
                self.options.max_width().min(self.options.max_height()),
                TILE_WIDTH
            ));
        }

        let frame_type = Self::classify(self.data);
        trace!("Level frame type: {:?}", frame_type);

        match frame_type {
            FrameType::LevelType0 => self.decode_opaque_square(),
            _ => match variant_tables(frame_type) {
                Some((mask, zeroed)) => self.decode_with_mask(frame_type, mask, zeroed),
                None => Err(GfxDecodeErrors::InvalidFrameSize(self.data.len()))
            }
        }
    }

    /// 0x400 bytes, one palette index per pixel, scanlines
    /// bottom-to-top
    fn decode_opaque_square(&self) -> Result<Frame, GfxDecodeErrors> {
        let mut stream = ByteReader::new(self.data);
        let mut rows: Vec<Vec<Pixel>> = Vec::with_capacity(TILE_HEIGHT);

        for _ in 0..TILE_HEIGHT {
            let literals = stream.get_slice(TILE_WIDTH)?;
            rows.push(literals.iter().map(|index| Pixel::opaque(*index)).collect());
        }

        rows.reverse();
        Ok(Frame::new(rows, FrameType::LevelType0, false))
    }

    /// Walk the 512-entry cell mask, skipping the zero padding pairs
    /// as their offsets come up
    fn decode_with_mask(
        &self, frame_type: FrameType, mask: &[bool; MASK_ENTRIES], zeroed: &[usize]
    ) -> Result<Frame, GfxDecodeErrors> {
        let mut stream = ByteReader::new(self.data);
        let mut zero_cursor = 0;
        let mut rows: Vec<Vec<Pixel>> = Vec::with_capacity(TILE_HEIGHT);
        let mut line: Vec<Pixel> = Vec::with_capacity(TILE_WIDTH);

        for cell in mask {
            if *cell {
                while zero_cursor < zeroed.len() && stream.position() == zeroed[zero_cursor] {
                    stream.skip(1);
                    zero_cursor += 1;
                }
                let pair = stream.get_fixed_bytes_or_err::<2>()?;
                line.push(Pixel::opaque(pair[0]));
                line.push(Pixel::opaque(pair[1]));
            } else {
                line.push(Pixel::transparent());
                line.push(Pixel::transparent());
            }

            if line.len() == TILE_WIDTH {
                rows.push(core::mem::replace(&mut line, Vec::with_capacity(TILE_WIDTH)));
            }
        }

        rows.reverse();
        Ok(Frame::new(rows, frame_type, false))
    }
}

/// An encoder for the fixed-size level frame encodings
///
/// The frame's type selects the bit pattern; its pixels must follow
/// that pattern exactly since the wire format cannot represent
/// anything else.
pub struct LevelFrameEncoder<'a> {
    frame: &'a Frame
}

impl<'a> LevelFrameEncoder<'a> {
    pub const fn new(frame: &'a Frame) -> LevelFrameEncoder<'a> {
        LevelFrameEncoder { frame }
    }

    pub fn encode(&self) -> Result<Vec<u8>, GfxEncodeErrors> {
        let (width, height) = self.frame.dimensions();

        if width != TILE_WIDTH || height != TILE_HEIGHT {
            return Err(GfxEncodeErrors::InvalidDimensions(width, height));
        }

        match self.frame.frame_type() {
            FrameType::LevelType0 => self.encode_opaque_square(),
            frame_type => match variant_tables(frame_type) {
                Some((mask, zeroed)) => self.encode_with_mask(mask, zeroed),
                None => Err(GfxEncodeErrors::UnsupportedFrameType(frame_type))
            }
        }
    }

    fn encode_opaque_square(&self) -> Result<Vec<u8>, GfxEncodeErrors> {
        let mut writer = ByteWriter::with_capacity(SQUARE_FRAME_SIZE);

        for row in self.frame.rows().iter().rev() {
            for pixel in row {
                if pixel.is_transparent() {
                    return Err(GfxEncodeErrors::ShapeMismatch(FrameType::LevelType0));
                }
                writer.write_u8(pixel.index());
            }
        }
        Ok(writer.into_inner())
    }

    fn encode_with_mask(
        &self, mask: &[bool; MASK_ENTRIES], zeroed: &[usize]
    ) -> Result<Vec<u8>, GfxEncodeErrors> {
        let frame_type = self.frame.frame_type();
        let mut writer = ByteWriter::with_capacity(mask.len() * 2 + zeroed.len());
        let mut zero_cursor = 0;

        for (entry, cell) in mask.iter().enumerate() {
            // wire scanlines run bottom-to-top, 16 cells each
            let row = &self.frame.rows()[TILE_HEIGHT - 1 - entry / 16];
            let x = (entry % 16) * 2;
            let pair = [row[x], row[x + 1]];

            if *cell {
                while zero_cursor < zeroed.len() && writer.bytes_written() == zeroed[zero_cursor] {
                    writer.write_u8(0);
                    zero_cursor += 1;
                }
                if pair[0].is_transparent() || pair[1].is_transparent() {
                    return Err(GfxEncodeErrors::ShapeMismatch(frame_type));
                }
                writer.write_u8(pair[0].index());
                writer.write_u8(pair[1].index());
            } else if !pair[0].is_transparent() || !pair[1].is_transparent() {
                return Err(GfxEncodeErrors::ShapeMismatch(frame_type));
            }
        }

        // trailing padding, e.g the right triangle pattern ends on one
        while zero_cursor < zeroed.len() {
            writer.write_u8(0);
            zero_cursor += 1;
        }

        Ok(writer.into_inner())
    }
}
