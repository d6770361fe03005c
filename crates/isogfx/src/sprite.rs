/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The regular run-length sprite encoding
//!
//! One control byte per run: values above `0x7F` emit `256 - b`
//! transparent pixels, values up to `0x7F` prefix that many literal
//! palette bytes. Scanlines are stored bottom-to-top and runs never
//! cross a scanline, which is what makes headerless width recovery
//! possible at all.

use alloc::vec::Vec;

use isogfx_core::bytestream::{ByteReader, ByteWriter};
use isogfx_core::log::{trace, warn};
use isogfx_core::options::DecoderOptions;

use crate::constants::{FRAME_HEADER_SIGNATURE, FRAME_HEADER_SIZE, HEADER_BLOCK_LINES};
use crate::errors::{GfxDecodeErrors, GfxEncodeErrors};
use crate::frame::{Frame, FrameType, Pixel};
use crate::width::{has_frame_header, width_from_data, width_from_header, HeaderWidth, RleScheme};

/// A decoder for regular-RLE sprite frames
///
/// Construct one per frame byte range, optionally seed it with an
/// authoritative width via [`set_width`], and call [`decode`].
///
/// [`set_width`]: SpriteDecoder::set_width
/// [`decode`]: SpriteDecoder::decode
pub struct SpriteDecoder<'a> {
    data:    &'a [u8],
    width:   usize,
    options: DecoderOptions
}

impl<'a> SpriteDecoder<'a> {
    /// Create a new sprite frame decoder with the default options
    ///
    /// # Arguments
    /// - `data`: The raw bytes of one frame
    pub fn new(data: &'a [u8]) -> SpriteDecoder<'a> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new sprite frame decoder that obeys specified
    /// restrictions, e.g maximum allowed dimensions
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> SpriteDecoder<'a> {
        SpriteDecoder {
            data,
            width: 0,
            options
        }
    }

    /// Supply the frame width
    ///
    /// An explicit width is authoritative and skips inference
    /// entirely; pass the width here when the container knows it.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Decode the frame
    ///
    /// # Returns
    /// - `Ok(Frame)`: The decoded frame, rows top-to-bottom
    /// - `Err`: Why the bytes cannot be a regular-RLE frame
    pub fn decode(&mut self) -> Result<Frame, GfxDecodeErrors> {
        if self.data.is_empty() {
            return Err(GfxDecodeErrors::EmptyInput);
        }
        let clipped = has_frame_header(self.data);
        let pixel_data = if clipped {
            &self.data[FRAME_HEADER_SIZE..]
        } else {
            self.data
        };

        let width = self.resolve_width(clipped, pixel_data)?;

        if width > self.options.max_width() {
            return Err(GfxDecodeErrors::LargeDimensions(
                self.options.max_width(),
                width
            ));
        }

        let rows = decode_rle_rows(pixel_data, width)?;

        if rows.len() > self.options.max_height() {
            return Err(GfxDecodeErrors::LargeDimensions(
                self.options.max_height(),
                rows.len()
            ));
        }

        trace!("Frame width: {}", width);
        trace!("Frame height: {}", rows.len());
        trace!("Frame clipped: {}", clipped);

        Ok(Frame::new(rows, FrameType::Regular, clipped))
    }

    /// Pick the frame width: explicit beats header beats inference
    fn resolve_width(&self, clipped: bool, pixel_data: &[u8]) -> Result<usize, GfxDecodeErrors> {
        if self.width != 0 {
            return Ok(self.width);
        }

        if clipped {
            match width_from_header(self.data, RleScheme::Sprite) {
                HeaderWidth::Width(width) => {
                    if self.options.infer_missing_width() {
                        let inferred = width_from_data(pixel_data);

                        if inferred != 0 && inferred != width {
                            warn!(
                                "Header width {} disagrees with inferred width {}, trusting the header",
                                width, inferred
                            );
                        }
                    }
                    return Ok(width);
                }
                HeaderWidth::Mismatch(first, second) => {
                    warn!(
                        "Header blocks disagree on the width ({} vs {}), falling back to inference",
                        first, second
                    );
                }
                HeaderWidth::NoBlocks => {}
            }
        }

        if !self.options.infer_missing_width() {
            return Err(GfxDecodeErrors::UnsupportedWidth);
        }

        match width_from_data(pixel_data) {
            0 => Err(GfxDecodeErrors::UnsupportedWidth),
            width => Ok(width)
        }
    }
}

/// Run the regular-RLE scan over `data` producing scanlines of
/// exactly `width` pixels, already reordered top-to-bottom
pub(crate) fn decode_rle_rows(
    data: &[u8], width: usize
) -> Result<Vec<Vec<Pixel>>, GfxDecodeErrors> {
    let mut stream = ByteReader::new(data);
    let mut rows: Vec<Vec<Pixel>> = Vec::new();
    let mut line: Vec<Pixel> = Vec::with_capacity(width);

    while !stream.eof() {
        let control = stream.get_u8();

        if control > 0x7F {
            let run = 256 - usize::from(control);

            if line.len() + run > width {
                return Err(GfxDecodeErrors::LineOverflow(rows.len(), width));
            }
            line.resize(line.len() + run, Pixel::transparent());
        } else {
            let run = usize::from(control);

            if line.len() + run > width {
                return Err(GfxDecodeErrors::LineOverflow(rows.len(), width));
            }
            let literals = stream.get_slice(run)?;
            line.extend(literals.iter().map(|index| Pixel::opaque(*index)));
        }

        if line.len() == width {
            rows.push(core::mem::replace(&mut line, Vec::with_capacity(width)));
        }
    }

    if !line.is_empty() {
        return Err(GfxDecodeErrors::Generic("frame data stops mid-scanline"));
    }

    // scanlines are stored bottom-to-top on the wire
    rows.reverse();
    Ok(rows)
}

/// An encoder for regular-RLE sprite frames
///
/// Encoding is the exact inverse of decoding; re-encoding a decoded
/// frame reproduces the original bytes.
pub struct SpriteEncoder<'a> {
    frame: &'a Frame
}

impl<'a> SpriteEncoder<'a> {
    pub const fn new(frame: &'a Frame) -> SpriteEncoder<'a> {
        SpriteEncoder { frame }
    }

    /// Encode the frame into a fresh byte buffer
    ///
    /// Clipped frames get the 10-byte header with block offsets to
    /// wire scanlines 32, 64, 96 and 128 where present.
    pub fn encode(&self) -> Result<Vec<u8>, GfxEncodeErrors> {
        let (width, height) = self.frame.dimensions();

        if width == 0 || height == 0 {
            return Err(GfxEncodeErrors::InvalidDimensions(width, height));
        }

        let mut writer = ByteWriter::with_capacity(width * height / 2 + FRAME_HEADER_SIZE);
        let clipped = self.frame.is_clipped();

        if clipped {
            writer.write_u16_le(FRAME_HEADER_SIGNATURE);
            for _ in 0..4 {
                writer.write_u16_le(0);
            }
        }

        let mut block_offsets = [0_usize; 4];

        // wire order is bottom-to-top
        for (line, row) in self.frame.rows().iter().rev().enumerate() {
            if line > 0 && line % HEADER_BLOCK_LINES == 0 && line / HEADER_BLOCK_LINES <= 4 {
                block_offsets[line / HEADER_BLOCK_LINES - 1] = writer.bytes_written();
            }
            encode_rle_row(&mut writer, row);
        }

        if clipped {
            for (i, offset) in block_offsets.iter().enumerate() {
                if *offset > usize::from(u16::MAX) {
                    return Err(GfxEncodeErrors::TooLargeDimensions(*offset));
                }
                if *offset != 0 {
                    writer.overwrite_u16_le(2 + i * 2, *offset as u16);
                }
            }
        }

        Ok(writer.into_inner())
    }
}

/// Encode one scanline, transparent runs split above 128 pixels and
/// literal runs above 127
fn encode_rle_row(writer: &mut ByteWriter, row: &[Pixel]) {
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

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{SpriteDecoder, SpriteEncoder};
    use crate::errors::GfxDecodeErrors;
    use crate::frame::{Frame, FrameType, Pixel};

    #[test]
    fn known_width_decodes_one_line() {
        // 2 literals then 2 transparent pixels complete a 4-pixel line
        let data = [0x02, 0x11, 0x22, 0xFE];
        let mut decoder = SpriteDecoder::new(&data);
        decoder.set_width(4);

        let frame = decoder.decode().unwrap();

        assert_eq!(frame.dimensions(), (4, 1));
        assert_eq!(frame.pixel(0, 0), Some(Pixel::opaque(0x11)));
        assert_eq!(frame.pixel(1, 0), Some(Pixel::opaque(0x22)));
        assert_eq!(frame.pixel(2, 0), Some(Pixel::transparent()));
        assert_eq!(frame.pixel(3, 0), Some(Pixel::transparent()));

        // and re-encoding is byte identical
        let encoded = SpriteEncoder::new(&frame).encode().unwrap();
        assert_eq!(encoded, data);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            SpriteDecoder::new(&[]).decode(),
            Err(GfxDecodeErrors::EmptyInput)
        ));
    }

    #[test]
    fn overlong_runs_overflow_the_line() {
        // width 4 but a 6-pixel transparent run
        let data = [0xFA];
        let mut decoder = SpriteDecoder::new(&data);
        decoder.set_width(4);

        assert!(matches!(
            decoder.decode(),
            Err(GfxDecodeErrors::LineOverflow(0, 4))
        ));
    }

    #[test]
    fn rows_come_out_top_to_bottom() {
        // wire stores the bottom line first: bottom is opaque 1,
        // top is opaque 2
        let data = [0x01, 1, 0x01, 2];
        let mut decoder = SpriteDecoder::new(&data);
        decoder.set_width(1);

        let frame = decoder.decode().unwrap();
        assert_eq!(frame.pixel(0, 0), Some(Pixel::opaque(2)));
        assert_eq!(frame.pixel(0, 1), Some(Pixel::opaque(1)));
    }

    #[test]
    fn transparent_run_of_200_splits_into_two_control_bytes() {
        let row: Vec<Pixel> = (0..200).map(|_| Pixel::transparent()).collect();
        let frame = Frame::new(alloc::vec![row], FrameType::Regular, false);

        let encoded = SpriteEncoder::new(&frame).encode().unwrap();
        assert_eq!(encoded, alloc::vec![0x80, 0xB8]);
    }

    #[test]
    fn full_width_opaque_line_is_one_literal_block() {
        let row: Vec<Pixel> = (0..100).map(|i| Pixel::opaque(i as u8)).collect();
        let frame = Frame::new(alloc::vec![row], FrameType::Regular, false);

        let encoded = SpriteEncoder::new(&frame).encode().unwrap();
        assert_eq!(encoded.len(), 101);
        assert_eq!(encoded[0], 100);
    }

    #[test]
    fn headerless_width_is_inferred() {
        // three 4-pixel lines, each [2 opaque, 2 transparent]; no
        // wrap is ever detected so the last-two-groups fallback
        // supplies the width
        let data = [
            0x02, 1, 2, 0xFE, //
            0x02, 3, 4, 0xFE, //
            0x02, 5, 6, 0xFE,
        ];
        let frame = SpriteDecoder::new(&data).decode().unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
    }

    #[test]
    fn clipped_frames_round_trip_with_their_header() {
        // 64 wire lines of width 2, all opaque, behind a header
        let rows: Vec<Vec<Pixel>> = (0..64_usize)
            .map(|y| alloc::vec![Pixel::opaque(y as u8), Pixel::opaque(1)])
            .collect();
        let mut frame = Frame::new(rows, FrameType::Regular, false);
        frame.set_clipped(true);

        let encoded = SpriteEncoder::new(&frame).encode().unwrap();

        // signature, then the offset of wire line 32:
        // 10 header bytes + 32 lines * 3 bytes each
        assert_eq!(encoded[..4], [0x0A, 0x00, 106, 0x00]);
        // blocks 2..4 don't exist for a 64-line frame
        assert_eq!(encoded[4..10], [0, 0, 0, 0, 0, 0]);

        let decoded = SpriteDecoder::new(&encoded).decode().unwrap();
        assert_eq!(decoded, frame);
        assert!(decoded.is_clipped());

        let reencoded = SpriteEncoder::new(&decoded).encode().unwrap();
        assert_eq!(reencoded, encoded);
    }
}
