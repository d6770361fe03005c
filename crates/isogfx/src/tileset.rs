/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The tileset micro-tile encodings
//!
//! Tileset frames are always 32×32 and come in six canonical shapes:
//! a fully opaque square, a run-length square with arbitrary
//! transparency, two triangle orientations and two trapezoid
//! orientations. The diagonal shapes are built from two passes: a
//! bottom half whose scanline widths grow 2, 4, .., 32 along the
//! hypotenuse, and a top half starting at byte offset 288 that either
//! mirrors the triangle or is a full opaque half-square.
//!
//! [`detect_shape`] classifies arbitrary pixel data against the six
//! shape predicates; it is a pure function over the pixels and
//! independent of the decode paths.

use alloc::vec::Vec;

use isogfx_core::bytestream::{ByteReader, ByteWriter};
use isogfx_core::log::warn;
use isogfx_core::options::DecoderOptions;

use crate::constants::{
    SQUARE_FRAME_SIZE, TILE_HEIGHT, TILE_WIDTH, TOP_HALF_OFFSET, TRAPEZOID_FRAME_SIZE,
    TRIANGLE_FRAME_SIZE
};
use crate::errors::{GfxDecodeErrors, GfxEncodeErrors};
use crate::frame::{Frame, FrameType, Pixel};

/// Scanline width of wire row `row` (bottom-to-top) for the diagonal
/// shapes
///
/// The bottom half grows toward the middle, the top half of a
/// triangle shrinks toward the apex and the top half of a trapezoid
/// is full.
fn diagonal_row_width(row: usize, trapezoid: bool) -> usize {
    if row < 16 {
        2 * (row + 1)
    } else if trapezoid {
        TILE_WIDTH
    } else {
        2 * (31 - row)
    }
}

/// A decoder for tileset micro-tile frames
///
/// The shape is container metadata, so unlike the level frame
/// decoder this one is told the frame type up front.
pub struct TileFrameDecoder<'a> {
    data:       &'a [u8],
    frame_type: FrameType,
    options:    DecoderOptions
}

impl<'a> TileFrameDecoder<'a> {
    /// Create a new tile frame decoder for a frame of the given
    /// shape
    ///
    /// # Arguments
    /// - `data`: The raw bytes of one frame
    /// - `frame_type`: The shape recorded by the container
    pub fn new(data: &'a [u8], frame_type: FrameType) -> TileFrameDecoder<'a> {
        Self::new_with_options(data, frame_type, DecoderOptions::default())
    }

    pub fn new_with_options(
        data: &'a [u8], frame_type: FrameType, options: DecoderOptions
    ) -> TileFrameDecoder<'a> {
        TileFrameDecoder {
            data,
            frame_type,
            options
        }
    }

    /// Decode the frame according to its shape
    pub fn decode(&mut self) -> Result<Frame, GfxDecodeErrors> {
        // an Empty tile has no bytes at all, everything else must
        // bring some
        if self.frame_type == FrameType::Empty {
            return Ok(Frame::filled(
                TILE_WIDTH,
                TILE_HEIGHT,
                Pixel::transparent(),
                FrameType::Empty
            ));
        }
        if self.data.is_empty() {
            return Err(GfxDecodeErrors::EmptyInput);
        }
        if TILE_WIDTH > self.options.max_width() || TILE_HEIGHT > self.options.max_height() {
            return Err(GfxDecodeErrors::LargeDimensions(
                self.options.max_width().min(self.options.max_height()),
                TILE_WIDTH
            ));
        }

        match self.frame_type {
            FrameType::Square => self.decode_square(),
            FrameType::TransparentSquare => self.decode_transparent_square(),
            FrameType::LeftTriangle | FrameType::RightTriangle => self.decode_diagonal(false),
            FrameType::LeftTrapezoid | FrameType::RightTrapezoid => self.decode_diagonal(true),
            _ => Err(GfxDecodeErrors::Generic("not a tileset frame type"))
        }
    }

    fn decode_square(&self) -> Result<Frame, GfxDecodeErrors> {
        if self.data.len() != SQUARE_FRAME_SIZE {
            return Err(GfxDecodeErrors::InvalidFrameSize(self.data.len()));
        }
        let mut stream = ByteReader::new(self.data);
        let mut rows: Vec<Vec<Pixel>> = Vec::with_capacity(TILE_HEIGHT);

        for _ in 0..TILE_HEIGHT {
            let literals = stream.get_slice(TILE_WIDTH)?;
            rows.push(literals.iter().map(|index| Pixel::opaque(*index)).collect());
        }

        rows.reverse();
        Ok(Frame::new(rows, FrameType::Square, false))
    }

    /// Signed-length runs per scanline: a byte with the high bit set
    /// is `|b|` transparent pixels, a positive byte prefixes that
    /// many literal bytes
    fn decode_transparent_square(&self) -> Result<Frame, GfxDecodeErrors> {
        let mut stream = ByteReader::new(self.data);
        let mut rows: Vec<Vec<Pixel>> = Vec::with_capacity(TILE_HEIGHT);
        let mut line: Vec<Pixel> = Vec::with_capacity(TILE_WIDTH);

        while rows.len() < TILE_HEIGHT {
            let control = stream.get_u8_err()? as i8;

            if control == 0 {
                // no progress is encodable with a zero byte, so this
                // cannot be valid data
                return Err(GfxDecodeErrors::MalformedControlByte(stream.position() - 1));
            }

            let run = usize::from(control.unsigned_abs());

            if line.len() + run > TILE_WIDTH {
                return Err(GfxDecodeErrors::LineOverflow(rows.len(), TILE_WIDTH));
            }

            if control < 0 {
                line.resize(line.len() + run, Pixel::transparent());
            } else {
                let literals = stream.get_slice(run)?;
                line.extend(literals.iter().map(|index| Pixel::opaque(*index)));
            }

            if line.len() == TILE_WIDTH {
                rows.push(core::mem::replace(&mut line, Vec::with_capacity(TILE_WIDTH)));
            }
        }

        if !stream.eof() {
            warn!(
                "{} trailing bytes after a transparent square frame",
                stream.remaining()
            );
        }

        rows.reverse();
        Ok(Frame::new(rows, FrameType::TransparentSquare, false))
    }

    fn decode_diagonal(&self, trapezoid: bool) -> Result<Frame, GfxDecodeErrors> {
        let expected = if trapezoid {
            TRAPEZOID_FRAME_SIZE
        } else {
            TRIANGLE_FRAME_SIZE
        };
        if self.data.len() != expected {
            return Err(GfxDecodeErrors::InvalidFrameSize(self.data.len()));
        }

        let left = matches!(
            self.frame_type,
            FrameType::LeftTriangle | FrameType::LeftTrapezoid
        );
        let mut stream = ByteReader::new(self.data);
        let mut rows: Vec<Vec<Pixel>> = Vec::with_capacity(TILE_HEIGHT);

        for row in 0..16 {
            rows.push(read_partial_row(
                &mut stream,
                diagonal_row_width(row, trapezoid),
                left
            )?);
        }

        debug_assert_eq!(stream.position(), TOP_HALF_OFFSET);

        for row in 16..TILE_HEIGHT {
            let width = diagonal_row_width(row, trapezoid);

            if width == TILE_WIDTH {
                // trapezoid top half, full rows with no padding
                let literals = stream.get_slice(TILE_WIDTH)?;
                rows.push(literals.iter().map(|index| Pixel::opaque(*index)).collect());
            } else {
                rows.push(read_partial_row(&mut stream, width, left)?);
            }
        }

        rows.reverse();
        Ok(Frame::new(rows, self.frame_type, false))
    }
}

/// Read one hypotenuse-aligned scanline of `width` opaque pixels
///
/// Left shapes align pixels to the right edge and carry their 2-byte
/// alignment pair before the row, right shapes mirror both.
/// The pair accompanies exactly the rows whose width is ≡ 2 (mod 4).
fn read_partial_row(
    stream: &mut ByteReader, width: usize, left: bool
) -> Result<Vec<Pixel>, GfxDecodeErrors> {
    let padded = width % 4 == 2;
    let mut line: Vec<Pixel> = Vec::with_capacity(TILE_WIDTH);

    if left && padded {
        stream.skip(2);
    }

    let literals = stream.get_slice(width)?;

    if left {
        line.resize(TILE_WIDTH - width, Pixel::transparent());
        line.extend(literals.iter().map(|index| Pixel::opaque(*index)));
    } else {
        line.extend(literals.iter().map(|index| Pixel::opaque(*index)));
        line.resize(TILE_WIDTH, Pixel::transparent());
    }

    if !left && padded {
        stream.skip(2);
    }

    Ok(line)
}

/// An encoder for tileset micro-tile frames
///
/// The frame's pixels must follow its declared shape exactly; the
/// wire formats of the five constrained shapes cannot represent
/// anything else.
pub struct TileFrameEncoder<'a> {
    frame: &'a Frame
}

impl<'a> TileFrameEncoder<'a> {
    pub const fn new(frame: &'a Frame) -> TileFrameEncoder<'a> {
        TileFrameEncoder { frame }
    }

    pub fn encode(&self) -> Result<Vec<u8>, GfxEncodeErrors> {
        let (width, height) = self.frame.dimensions();

        if width != TILE_WIDTH || height != TILE_HEIGHT {
            return Err(GfxEncodeErrors::InvalidDimensions(width, height));
        }

        match self.frame.frame_type() {
            FrameType::Square => self.encode_square(),
            FrameType::TransparentSquare => Ok(self.encode_transparent_square()),
            FrameType::LeftTriangle | FrameType::RightTriangle => self.encode_diagonal(false),
            FrameType::LeftTrapezoid | FrameType::RightTrapezoid => self.encode_diagonal(true),
            FrameType::Empty => self.encode_empty(),
            frame_type => Err(GfxEncodeErrors::UnsupportedFrameType(frame_type))
        }
    }

    fn encode_empty(&self) -> Result<Vec<u8>, GfxEncodeErrors> {
        if !all_transparent(self.frame) {
            return Err(GfxEncodeErrors::ShapeMismatch(FrameType::Empty));
        }
        Ok(Vec::new())
    }

    fn encode_square(&self) -> Result<Vec<u8>, GfxEncodeErrors> {
        let mut writer = ByteWriter::with_capacity(SQUARE_FRAME_SIZE);

        for row in self.frame.rows().iter().rev() {
            for pixel in row {
                if pixel.is_transparent() {
                    return Err(GfxEncodeErrors::ShapeMismatch(FrameType::Square));
                }
                writer.write_u8(pixel.index());
            }
        }
        Ok(writer.into_inner())
    }

    fn encode_transparent_square(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        for row in self.frame.rows().iter().rev() {
            let mut position = 0;

            while position < row.len() {
                if row[position].is_transparent() {
                    let mut run = row[position..]
                        .iter()
                        .take_while(|pixel| pixel.is_transparent())
                        .count();
                    position += run;

                    while run > 0 {
                        let chunk = run.min(128);
                        writer.write_u8((256 - chunk) as u8);
                        run -= chunk;
                    }
                } else {
                    let run = row[position..]
                        .iter()
                        .take_while(|pixel| !pixel.is_transparent())
                        .count();

                    for chunk in row[position..position + run].chunks(127) {
                        writer.write_u8(chunk.len() as u8);
                        for pixel in chunk {
                            writer.write_u8(pixel.index());
                        }
                    }
                    position += run;
                }
            }
        }
        writer.into_inner()
    }

    fn encode_diagonal(&self, trapezoid: bool) -> Result<Vec<u8>, GfxEncodeErrors> {
        let frame_type = self.frame.frame_type();
        let left = matches!(
            frame_type,
            FrameType::LeftTriangle | FrameType::LeftTrapezoid
        );
        let capacity = if trapezoid {
            TRAPEZOID_FRAME_SIZE
        } else {
            TRIANGLE_FRAME_SIZE
        };
        let mut writer = ByteWriter::with_capacity(capacity);

        for row in 0..TILE_HEIGHT {
            let width = diagonal_row_width(row, trapezoid);
            let pixels = &self.frame.rows()[TILE_HEIGHT - 1 - row];
            let opaque = if left {
                &pixels[TILE_WIDTH - width..]
            } else {
                &pixels[..width]
            };
            let transparent = if left {
                &pixels[..TILE_WIDTH - width]
            } else {
                &pixels[width..]
            };

            if transparent.iter().any(|pixel| !pixel.is_transparent())
                || opaque.iter().any(Pixel::is_transparent)
            {
                return Err(GfxEncodeErrors::ShapeMismatch(frame_type));
            }

            let padded = width % 4 == 2;

            if left && padded {
                writer.write_u8(0);
                writer.write_u8(0);
            }
            for pixel in opaque {
                writer.write_u8(pixel.index());
            }
            if !left && padded {
                writer.write_u8(0);
                writer.write_u8(0);
            }
        }

        Ok(writer.into_inner())
    }
}

fn all_transparent(frame: &Frame) -> bool {
    frame
        .rows()
        .iter()
        .all(|row| row.iter().all(Pixel::is_transparent))
}

/// Whether a pixel of shape `frame_type` at `(x, y)` (top-to-bottom
/// coordinates) must be transparent
///
/// For the diagonal shapes the bottom half boundary is the line
/// `x = 2y - 32` and its mirror; triangles additionally shrink
/// toward the apex through the top half.
fn expected_transparent(frame_type: FrameType, x: usize, y: usize) -> bool {
    match frame_type {
        FrameType::Square => false,
        FrameType::Empty => true,
        FrameType::LeftTriangle => {
            if y >= 16 {
                // left of the diagonal x = 2y - 32
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
}

/// Count how far `is_transparent` deviates from the transparency
/// pattern of `frame_type`, giving up once the count exceeds `limit`
///
/// The accessor takes `(x, y)` with `y` counting from the top. Pure
/// so it can serve both strict validation (limit 0) and lenient
/// migration-time classification.
pub fn shape_violations<F>(is_transparent: &F, frame_type: FrameType, limit: usize) -> usize
where
    F: Fn(usize, usize) -> bool
{
    let mut violations = 0;

    for y in 0..TILE_HEIGHT {
        for x in 0..TILE_WIDTH {
            if is_transparent(x, y) != expected_transparent(frame_type, x, y) {
                violations += 1;

                if violations > limit {
                    return violations;
                }
            }
        }
    }
    violations
}

/// Classify a frame's pixels as one of the six tile shapes
///
/// Probes the shapes in preference order and returns the first whose
/// violation count stays within `limit`; `TransparentSquare` can
/// represent anything and is the fallback. Frames that are not 32×32
/// are [`FrameType::Unknown`].
pub fn detect_shape(frame: &Frame, limit: usize) -> FrameType {
    if frame.dimensions() != (TILE_WIDTH, TILE_HEIGHT) {
        return FrameType::Unknown;
    }

    let is_transparent =
        |x: usize, y: usize| frame.pixel(x, y).is_some_and(|pixel| pixel.is_transparent());

    const PREFERENCE: [FrameType; 6] = [
        FrameType::Square,
        FrameType::LeftTriangle,
        FrameType::RightTriangle,
        FrameType::LeftTrapezoid,
        FrameType::RightTrapezoid,
        FrameType::Empty
    ];

    for frame_type in PREFERENCE {
        if shape_violations(&is_transparent, frame_type, limit) <= limit {
            return frame_type;
        }
    }
    FrameType::TransparentSquare
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{detect_shape, expected_transparent, TileFrameDecoder, TileFrameEncoder};
    use crate::constants::{TRAPEZOID_FRAME_SIZE, TRIANGLE_FRAME_SIZE};
    use crate::errors::{GfxDecodeErrors, GfxEncodeErrors};
    use crate::frame::{Frame, FrameType, Pixel};

    /// The canonical pixel grid of a shape, opaque pixels numbered
    fn shape_frame(frame_type: FrameType) -> Frame {
        let rows: Vec<Vec<Pixel>> = (0..32)
            .map(|y| {
                (0..32)
                    .map(|x| {
                        if expected_transparent(frame_type, x, y) {
                            Pixel::transparent()
                        } else {
                            Pixel::opaque((x ^ y) as u8)
                        }
                    })
                    .collect()
            })
            .collect();
        Frame::new(rows, frame_type, false)
    }

    #[test]
    fn empty_input_is_rejected_for_data_shapes() {
        for frame_type in [
            FrameType::Square,
            FrameType::TransparentSquare,
            FrameType::LeftTriangle,
            FrameType::RightTrapezoid
        ] {
            assert!(matches!(
                TileFrameDecoder::new(&[], frame_type).decode(),
                Err(GfxDecodeErrors::EmptyInput)
            ));
        }
    }

    #[test]
    fn empty_tiles_need_no_bytes() {
        let frame = TileFrameDecoder::new(&[], FrameType::Empty).decode().unwrap();
        assert_eq!(frame.dimensions(), (32, 32));
        assert!(super::all_transparent(&frame));
        assert_eq!(TileFrameEncoder::new(&frame).encode().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn square_round_trips() {
        let data: Vec<u8> = (0..0x400).map(|i| (i % 255) as u8).collect();
        let frame = TileFrameDecoder::new(&data, FrameType::Square).decode().unwrap();

        assert_eq!(frame.frame_type(), FrameType::Square);
        assert_eq!(TileFrameEncoder::new(&frame).encode().unwrap(), data);
    }

    #[test]
    fn transparent_square_round_trips() {
        // each wire line: 8 transparent, 20 literals, 4 transparent
        let mut data = Vec::new();
        for line in 0..32_u8 {
            data.push(0xF8); // -8
            data.push(20);
            data.extend((0..20).map(|x| x ^ line));
            data.push(0xFC); // -4
        }
        let frame = TileFrameDecoder::new(&data, FrameType::TransparentSquare)
            .decode()
            .unwrap();

        assert_eq!(frame.frame_type(), FrameType::TransparentSquare);
        assert!(frame.pixel(7, 0).unwrap().is_transparent());
        assert!(!frame.pixel(8, 0).unwrap().is_transparent());
        assert_eq!(TileFrameEncoder::new(&frame).encode().unwrap(), data);
    }

    #[test]
    fn transparent_square_rejects_the_zero_byte() {
        let data = [0x00, 0xFF];
        assert!(matches!(
            TileFrameDecoder::new(&data, FrameType::TransparentSquare).decode(),
            Err(GfxDecodeErrors::MalformedControlByte(0))
        ));
    }

    #[test]
    fn diagonal_shapes_round_trip() {
        for (frame_type, expected_size) in [
            (FrameType::LeftTriangle, TRIANGLE_FRAME_SIZE),
            (FrameType::RightTriangle, TRIANGLE_FRAME_SIZE),
            (FrameType::LeftTrapezoid, TRAPEZOID_FRAME_SIZE),
            (FrameType::RightTrapezoid, TRAPEZOID_FRAME_SIZE)
        ] {
            let frame = shape_frame(frame_type);
            let encoded = TileFrameEncoder::new(&frame).encode().unwrap();
            assert_eq!(encoded.len(), expected_size, "{frame_type:?}");

            let decoded = TileFrameDecoder::new(&encoded, frame_type).decode().unwrap();
            assert_eq!(decoded, frame, "{frame_type:?}");
        }
    }

    #[test]
    fn alignment_pairs_sit_where_the_level_tables_say() {
        let left = TileFrameEncoder::new(&shape_frame(FrameType::LeftTriangle))
            .encode()
            .unwrap();
        for offset in crate::constants::LEFT_TRIANGLE_ZEROED_BYTES {
            assert_eq!(left[offset], 0);
        }

        let right = TileFrameEncoder::new(&shape_frame(FrameType::RightTriangle))
            .encode()
            .unwrap();
        for offset in crate::constants::RIGHT_TRIANGLE_ZEROED_BYTES {
            assert_eq!(right[offset], 0);
        }
    }

    #[test]
    fn misshapen_frames_do_not_encode() {
        let mut frame = shape_frame(FrameType::LeftTriangle);
        frame.set_frame_type(FrameType::RightTriangle);

        assert!(matches!(
            TileFrameEncoder::new(&frame).encode(),
            Err(GfxEncodeErrors::ShapeMismatch(FrameType::RightTriangle))
        ));
    }

    #[test]
    fn trapezoid_canvas_detects_with_zero_violations() {
        // bottom half opaque right of the diagonal x = 2y - 32,
        // top half fully opaque
        let frame = shape_frame(FrameType::LeftTrapezoid);

        assert_eq!(detect_shape(&frame, 0), FrameType::LeftTrapezoid);
        assert_eq!(
            super::shape_violations(
                &|x, y| frame.pixel(x, y).unwrap().is_transparent(),
                FrameType::LeftTrapezoid,
                0
            ),
            0
        );
    }

    #[test]
    fn detection_follows_the_preference_order() {
        assert_eq!(
            detect_shape(&shape_frame(FrameType::Square), 0),
            FrameType::Square
        );
        assert_eq!(
            detect_shape(&shape_frame(FrameType::RightTriangle), 0),
            FrameType::RightTriangle
        );
        assert_eq!(
            detect_shape(&shape_frame(FrameType::Empty), 0),
            FrameType::Empty
        );

        // an irregular canvas only fits the unconstrained shape
        let mut rows = shape_frame(FrameType::Square).rows().to_vec();
        rows[10][3] = Pixel::transparent();
        rows[20][30] = Pixel::transparent();
        let noisy = Frame::new(rows, FrameType::Unknown, false);

        assert_eq!(detect_shape(&noisy, 0), FrameType::TransparentSquare);
        // a small tolerance lets it pass as the square again
        assert_eq!(detect_shape(&noisy, 2), FrameType::Square);
    }

    #[test]
    fn small_frames_detect_as_unknown() {
        let frame = Frame::filled(16, 16, Pixel::opaque(1), FrameType::Unknown);
        assert_eq!(detect_shape(&frame, 0), FrameType::Unknown);
    }
}
