/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Frame-type driven codec dispatch
//!
//! Containers record a frame type per frame at load time; these
//! helpers route a frame to the matching codec with an exhaustive
//! match, so adding a frame type without wiring its codec is a
//! compile error. Frames of masked-format containers are `Regular`
//! like any other sprite frame, their container calls
//! [`MaskedDecoder`]/[`MaskedEncoder`] directly since the choice
//! between the two sprite encodings is container metadata, not frame
//! metadata.
//!
//! [`MaskedDecoder`]: crate::masked::MaskedDecoder
//! [`MaskedEncoder`]: crate::masked::MaskedEncoder

use alloc::vec::Vec;

use isogfx_core::options::DecoderOptions;

use crate::errors::{GfxDecodeErrors, GfxEncodeErrors};
use crate::frame::{Frame, FrameType};
use crate::level::{LevelFrameDecoder, LevelFrameEncoder};
use crate::sprite::{SpriteDecoder, SpriteEncoder};
use crate::tileset::{TileFrameDecoder, TileFrameEncoder};

/// Decode one frame of the given type
///
/// # Arguments
/// - `data`: The raw bytes of one frame
/// - `frame_type`: The variant recorded for this frame at container
///   load time
/// - `width`: The frame width where the container knows it, `None`
///   to recover it from the frame itself
/// - `options`: Restrictions the decoder should respect
pub fn decode_frame(
    data: &[u8], frame_type: FrameType, width: Option<usize>, options: DecoderOptions
) -> Result<Frame, GfxDecodeErrors> {
    match frame_type {
        FrameType::Regular => {
            let mut decoder = SpriteDecoder::new_with_options(data, options);
            if let Some(width) = width {
                decoder.set_width(width);
            }
            decoder.decode()
        }
        FrameType::LevelType0
        | FrameType::LevelType2
        | FrameType::LevelType3
        | FrameType::LevelType4
        | FrameType::LevelType5 => LevelFrameDecoder::new_with_options(data, options).decode(),
        FrameType::Square
        | FrameType::TransparentSquare
        | FrameType::LeftTriangle
        | FrameType::RightTriangle
        | FrameType::LeftTrapezoid
        | FrameType::RightTrapezoid
        | FrameType::Empty => {
            TileFrameDecoder::new_with_options(data, frame_type, options).decode()
        }
        FrameType::Unknown => Err(GfxDecodeErrors::Generic(
            "cannot decode a frame of unknown type"
        ))
    }
}

/// Encode one frame back into its wire format
///
/// The inverse of [`decode_frame`]; frames decoded by it re-encode
/// byte-identically.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, GfxEncodeErrors> {
    match frame.frame_type() {
        FrameType::Regular => SpriteEncoder::new(frame).encode(),
        FrameType::LevelType0
        | FrameType::LevelType2
        | FrameType::LevelType3
        | FrameType::LevelType4
        | FrameType::LevelType5 => LevelFrameEncoder::new(frame).encode(),
        FrameType::Square
        | FrameType::TransparentSquare
        | FrameType::LeftTriangle
        | FrameType::RightTriangle
        | FrameType::LeftTrapezoid
        | FrameType::RightTrapezoid
        | FrameType::Empty => TileFrameEncoder::new(frame).encode(),
        FrameType::Unknown => Err(GfxEncodeErrors::UnsupportedFrameType(FrameType::Unknown))
    }
}

#[cfg(test)]
mod tests {
    use isogfx_core::options::DecoderOptions;

    use super::{decode_frame, encode_frame};
    use crate::errors::GfxDecodeErrors;
    use crate::frame::FrameType;

    #[test]
    fn dispatch_routes_regular_frames() {
        let data = [0x02, 0x11, 0x22, 0xFE];
        let frame = decode_frame(
            &data,
            FrameType::Regular,
            Some(4),
            DecoderOptions::default()
        )
        .unwrap();

        assert_eq!(frame.dimensions(), (4, 1));
        assert_eq!(encode_frame(&frame).unwrap(), data);
    }

    #[test]
    fn unknown_frames_are_refused() {
        assert!(matches!(
            decode_frame(
                &[1, 2, 3],
                FrameType::Unknown,
                None,
                DecoderOptions::default()
            ),
            Err(GfxDecodeErrors::Generic(_))
        ));
    }
}
