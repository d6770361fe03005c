/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The masked run-length sprite encoding
//!
//! The second, newer sprite format. Control bytes come in three bands
//! instead of two: `(0, 0x80)` is a transparent run, `[0x80, 0xBF)`
//! repeats one following palette byte `0xBF - b` times and
//! `[0xBF, 0xFF]` prefixes `256 - b` literal bytes. The zero byte is
//! reserved; observed decoders treat it as a no-op, we log it and, in
//! strict mode, reject it, since the intended semantics are unknown.
//!
//! Frames of this format always carry the 10-byte header; there is no
//! structural width fallback.

use alloc::vec::Vec;

use isogfx_core::bytestream::{ByteReader, ByteWriter};
use isogfx_core::log::{trace, warn};
use isogfx_core::options::DecoderOptions;

use crate::constants::{FRAME_HEADER_SIGNATURE, FRAME_HEADER_SIZE, HEADER_BLOCK_LINES};
use crate::errors::{GfxDecodeErrors, GfxEncodeErrors};
use crate::frame::{Frame, FrameType, Pixel};
use crate::width::{has_frame_header, width_from_header, HeaderWidth, RleScheme};

/// A decoder for masked-RLE sprite frames
pub struct MaskedDecoder<'a> {
    data:    &'a [u8],
    width:   usize,
    options: DecoderOptions
}

impl<'a> MaskedDecoder<'a> {
    /// Create a new masked frame decoder with the default options
    ///
    /// # Arguments
    /// - `data`: The raw bytes of one frame
    pub fn new(data: &'a [u8]) -> MaskedDecoder<'a> {
        Self::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new masked frame decoder that obeys specified
    /// restrictions
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> MaskedDecoder<'a> {
        MaskedDecoder {
            data,
            width: 0,
            options
        }
    }

    /// Supply the frame width, skipping the header computation
    ///
    /// Needed for frames too short to populate any header block
    /// offset.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Decode the frame
    pub fn decode(&mut self) -> Result<Frame, GfxDecodeErrors> {
        if self.data.is_empty() {
            return Err(GfxDecodeErrors::EmptyInput);
        }
        if !has_frame_header(self.data) {
            return Err(GfxDecodeErrors::MissingHeader);
        }

        let width = if self.width != 0 {
            self.width
        } else {
            match width_from_header(self.data, RleScheme::Masked) {
                HeaderWidth::Width(width) => width,
                HeaderWidth::NoBlocks => return Err(GfxDecodeErrors::UnsupportedWidth),
                HeaderWidth::Mismatch(first, second) => {
                    return Err(GfxDecodeErrors::InconsistentHeader(first, second))
                }
            }
        };

        if width > self.options.max_width() {
            return Err(GfxDecodeErrors::LargeDimensions(
                self.options.max_width(),
                width
            ));
        }

        let rows = self.decode_rows(&self.data[FRAME_HEADER_SIZE..], width)?;

        if rows.len() > self.options.max_height() {
            return Err(GfxDecodeErrors::LargeDimensions(
                self.options.max_height(),
                rows.len()
            ));
        }

        trace!("Frame width: {}", width);
        trace!("Frame height: {}", rows.len());

        Ok(Frame::new(rows, FrameType::Regular, true))
    }

    fn decode_rows(
        &self, data: &[u8], width: usize
    ) -> Result<Vec<Vec<Pixel>>, GfxDecodeErrors> {
        let mut stream = ByteReader::new(data);
        let mut rows: Vec<Vec<Pixel>> = Vec::new();
        let mut line: Vec<Pixel> = Vec::with_capacity(width);

        while !stream.eof() {
            let control = stream.get_u8();

            if control == 0 {
                // reserved; possibly dead encoder output, possibly a
                // latent bug upstream. Observed behavior is to ignore
                // it, strict mode refuses instead
                let position = FRAME_HEADER_SIZE + stream.position() - 1;

                if self.options.strict_mode() {
                    return Err(GfxDecodeErrors::MalformedControlByte(position));
                }
                warn!("Ignoring reserved control byte 0x00 at frame offset {position}");
                continue;
            }

            let run;

            if control < 0x80 {
                run = usize::from(control);

                if line.len() + run > width {
                    return Err(GfxDecodeErrors::LineOverflow(rows.len(), width));
                }
                line.resize(line.len() + run, Pixel::transparent());
            } else if control < 0xBF {
                // one palette byte repeated
                run = 0xBF - usize::from(control);

                if line.len() + run > width {
                    return Err(GfxDecodeErrors::LineOverflow(rows.len(), width));
                }
                let index = stream.get_u8_err()?;
                line.resize(line.len() + run, Pixel::opaque(index));
            } else {
                run = 256 - usize::from(control);

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

        rows.reverse();
        Ok(rows)
    }
}

/// An encoder for masked-RLE sprite frames
///
/// The repeated-color band is used for identical runs of up to 16
/// pixels where it is not longer than the literal encoding; ties go
/// to literals.
pub struct MaskedEncoder<'a> {
    frame: &'a Frame
}

impl<'a> MaskedEncoder<'a> {
    pub const fn new(frame: &'a Frame) -> MaskedEncoder<'a> {
        MaskedEncoder { frame }
    }

    /// Encode the frame, header included
    pub fn encode(&self) -> Result<Vec<u8>, GfxEncodeErrors> {
        let (width, height) = self.frame.dimensions();

        if width == 0 || height == 0 {
            return Err(GfxEncodeErrors::InvalidDimensions(width, height));
        }

        let mut writer = ByteWriter::with_capacity(width * height / 2 + FRAME_HEADER_SIZE);

        writer.write_u16_le(FRAME_HEADER_SIGNATURE);
        for _ in 0..4 {
            writer.write_u16_le(0);
        }

        let mut block_offsets = [0_usize; 4];

        for (line, row) in self.frame.rows().iter().rev().enumerate() {
            if line > 0 && line % HEADER_BLOCK_LINES == 0 && line / HEADER_BLOCK_LINES <= 4 {
                block_offsets[line / HEADER_BLOCK_LINES - 1] = writer.bytes_written();
            }
            encode_masked_row(&mut writer, row);
        }

        for (i, offset) in block_offsets.iter().enumerate() {
            if *offset > usize::from(u16::MAX) {
                return Err(GfxEncodeErrors::TooLargeDimensions(*offset));
            }
            if *offset != 0 {
                writer.overwrite_u16_le(2 + i * 2, *offset as u16);
            }
        }

        Ok(writer.into_inner())
    }
}

/// Encode one scanline with the three-band scheme
fn encode_masked_row(writer: &mut ByteWriter, row: &[Pixel]) {
    let mut position = 0;

    while position < row.len() {
        if row[position].is_transparent() {
            let mut run = row[position..]
                .iter()
                .take_while(|pixel| pixel.is_transparent())
                .count();
            position += run;

            while run > 0 {
                let chunk = run.min(0x7F);
                writer.write_u8(chunk as u8);
                run -= chunk;
            }
        } else {
            let stretch = row[position..]
                .iter()
                .take_while(|pixel| !pixel.is_transparent())
                .count();
            encode_opaque_stretch(writer, &row[position..position + stretch]);
            position += stretch;
        }
    }
}

/// Encode a maximal opaque stretch, picking the repeated-color band
/// where it beats literals
fn encode_opaque_stretch(writer: &mut ByteWriter, stretch: &[Pixel]) {
    let mut literal_start = 0;
    let mut position = 0;

    while position < stretch.len() {
        let repeat = stretch[position..]
            .iter()
            .take_while(|pixel| pixel.index() == stretch[position].index())
            .take(16)
            .count();

        // a run of two only pays off when no literal block is open,
        // otherwise it ties the literal encoding and ties go to
        // literals
        if repeat > 2 || (repeat == 2 && literal_start == position) {
            flush_literals(writer, &stretch[literal_start..position]);

            writer.write_u8((0xBF - repeat) as u8);
            writer.write_u8(stretch[position].index());

            position += repeat;
            literal_start = position;
        } else {
            position += 1;
        }
    }
    flush_literals(writer, &stretch[literal_start..]);
}

/// Write pending literal pixels, split above 65 (the widest literal
/// band run)
fn flush_literals(writer: &mut ByteWriter, literals: &[Pixel]) {
    for chunk in literals.chunks(256 - 0xBF) {
        writer.write_u8((256 - chunk.len()) as u8);
        for pixel in chunk {
            writer.write_u8(pixel.index());
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{MaskedDecoder, MaskedEncoder};
    use crate::errors::GfxDecodeErrors;
    use crate::frame::{Frame, FrameType, Pixel};
    use isogfx_core::options::DecoderOptions;

    fn frame_from_rows(rows: Vec<Vec<Pixel>>) -> Frame {
        let mut frame = Frame::new(rows, FrameType::Regular, false);
        frame.set_clipped(true);
        frame
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            MaskedDecoder::new(&[]).decode(),
            Err(GfxDecodeErrors::EmptyInput)
        ));
    }

    #[test]
    fn missing_header_is_a_hard_failure() {
        assert!(matches!(
            MaskedDecoder::new(&[0x01, 0x02, 0x03]).decode(),
            Err(GfxDecodeErrors::MissingHeader)
        ));
    }

    #[test]
    fn three_bands_decode() {
        // width 6 via hint: 2 transparent, 3 repeats of 0x55,
        // 1 literal 0x66
        let data = [
            0x0A, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, // header
            0x02, 0xBC, 0x55, 0xFF, 0x66,
        ];
        let mut decoder = MaskedDecoder::new(&data);
        decoder.set_width(6);

        let frame = decoder.decode().unwrap();
        assert_eq!(frame.dimensions(), (6, 1));
        assert_eq!(frame.pixel(0, 0), Some(Pixel::transparent()));
        assert_eq!(frame.pixel(2, 0), Some(Pixel::opaque(0x55)));
        assert_eq!(frame.pixel(4, 0), Some(Pixel::opaque(0x55)));
        assert_eq!(frame.pixel(5, 0), Some(Pixel::opaque(0x66)));
    }

    #[test]
    fn reserved_byte_is_ignored_unless_strict() {
        let data = [
            0x0A, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, // header
            0x00, 0x02, 0xBD, 0x55, // zero, 2 transparent, 2x 0x55
        ];
        let mut decoder = MaskedDecoder::new(&data);
        decoder.set_width(4);
        assert_eq!(decoder.decode().unwrap().dimensions(), (4, 1));

        let strict = DecoderOptions::default().set_strict_mode(true);
        let mut decoder = MaskedDecoder::new_with_options(&data, strict);
        decoder.set_width(4);
        assert!(matches!(
            decoder.decode(),
            Err(GfxDecodeErrors::MalformedControlByte(10))
        ));
    }

    #[test]
    fn repeated_runs_prefer_the_repeat_band() {
        // 5 identical pixels encode as one repeat block
        let frame = frame_from_rows(alloc::vec![alloc::vec![Pixel::opaque(9); 5]]);
        let encoded = MaskedEncoder::new(&frame).encode().unwrap();
        assert_eq!(encoded[10..], [0xBA, 9]);
    }

    #[test]
    fn short_repeats_inside_literals_stay_literal() {
        // 1, 2, 2, 3: the middle pair would tie as a repeat block,
        // so everything stays one literal run
        let row = alloc::vec![
            Pixel::opaque(1),
            Pixel::opaque(2),
            Pixel::opaque(2),
            Pixel::opaque(3)
        ];
        let frame = frame_from_rows(alloc::vec![row]);
        let encoded = MaskedEncoder::new(&frame).encode().unwrap();
        assert_eq!(encoded[10..], [0xFC, 1, 2, 2, 3]);
    }

    #[test]
    fn leading_pairs_use_the_repeat_band() {
        // 2, 2, 7: the pair opens the stretch, repeat is strictly
        // shorter than opening a literal block
        let row = alloc::vec![Pixel::opaque(2), Pixel::opaque(2), Pixel::opaque(7)];
        let frame = frame_from_rows(alloc::vec![row]);
        let encoded = MaskedEncoder::new(&frame).encode().unwrap();
        assert_eq!(encoded[10..], [0xBD, 2, 0xFF, 7]);
    }

    #[test]
    fn masked_frames_round_trip() {
        // 33 lines so the header's first block offset is populated
        let rows: Vec<Vec<Pixel>> = (0..33_usize)
            .map(|y| {
                (0..8)
                    .map(|x| {
                        if (x + y) % 3 == 0 {
                            Pixel::transparent()
                        } else {
                            Pixel::opaque((x * y) as u8)
                        }
                    })
                    .collect()
            })
            .collect();
        let frame = frame_from_rows(rows);

        let encoded = MaskedEncoder::new(&frame).encode().unwrap();
        let decoded = MaskedDecoder::new(&encoded).decode().unwrap();

        assert_eq!(decoded, frame);
        assert_eq!(MaskedEncoder::new(&decoded).encode().unwrap(), encoded);
    }
}
