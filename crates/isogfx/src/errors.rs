/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use isogfx_core::bytestream::ByteIoError;

use crate::frame::FrameType;

/// Possible errors that may occur during frame decoding
pub enum GfxDecodeErrors {
    /// The frame byte slice is empty
    EmptyInput,
    /// The frame width is still zero after every applicable
    /// inference strategy ran
    UnsupportedWidth,
    /// A run would push a scanline past the frame width.
    ///
    /// This is a hard integrity check, the width was wrong or the
    /// data is corrupt.
    ///
    /// # Arguments
    /// - 1st argument is the index of the offending wire scanline
    /// - 2nd argument is the frame width
    LineOverflow(usize, usize),
    /// The widths derived from two header blocks disagree
    InconsistentHeader(usize, usize),
    /// The format requires the 10-byte frame header but its
    /// signature is absent
    MissingHeader,
    /// A level or tileset frame byte count doesn't match any
    /// known shape
    InvalidFrameSize(usize),
    /// A reserved control byte was encountered at the given
    /// byte offset of the frame
    MalformedControlByte(usize),
    /// Too large dimensions
    ///
    /// # Arguments
    /// - 1st argument is the configured limit
    /// - 2nd argument is the value found
    LargeDimensions(usize, usize),
    /// Generic message
    Generic(&'static str),
    IoErrors(ByteIoError)
}

impl Debug for GfxDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            GfxDecodeErrors::EmptyInput => {
                writeln!(f, "Cannot decode an empty frame")
            }
            GfxDecodeErrors::UnsupportedWidth => {
                writeln!(f, "Frame width could not be recovered from header or data")
            }
            GfxDecodeErrors::LineOverflow(line, width) => {
                writeln!(
                    f,
                    "A run on scanline {line} would exceed the frame width {width}"
                )
            }
            GfxDecodeErrors::InconsistentHeader(first, second) => {
                writeln!(
                    f,
                    "Header blocks disagree on the frame width, {first} vs {second}"
                )
            }
            GfxDecodeErrors::MissingHeader => {
                writeln!(f, "Expected the 10-byte frame header but its signature is absent")
            }
            GfxDecodeErrors::InvalidFrameSize(size) => {
                writeln!(
                    f,
                    "Frame size {size} does not match any known fixed-size frame shape"
                )
            }
            GfxDecodeErrors::MalformedControlByte(position) => {
                writeln!(f, "Reserved control byte 0x00 at frame offset {position}")
            }
            GfxDecodeErrors::LargeDimensions(limit, found) => {
                writeln!(
                    f,
                    "Too large dimensions, configured limit is {limit} but found {found}"
                )
            }
            GfxDecodeErrors::Generic(reason) => {
                writeln!(f, "{reason}")
            }
            GfxDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error: {:?}", err)
            }
        }
    }
}

impl Display for GfxDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl From<&'static str> for GfxDecodeErrors {
    fn from(reason: &'static str) -> Self {
        Self::Generic(reason)
    }
}

impl From<ByteIoError> for GfxDecodeErrors {
    fn from(err: ByteIoError) -> Self {
        Self::IoErrors(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GfxDecodeErrors {}

/// Possible errors that may occur during frame encoding
pub enum GfxEncodeErrors {
    /// The frame dimensions are not encodable by the chosen
    /// variant, e.g a tileset frame that is not 32×32
    InvalidDimensions(usize, usize),
    /// The frame's transparency pattern deviates from the
    /// geometric shape its frame type declares
    ShapeMismatch(FrameType),
    /// A clipped frame grew past what the 16-bit header offsets
    /// can address
    TooLargeDimensions(usize),
    /// The frame type has no encoder, e.g `Unknown`
    UnsupportedFrameType(FrameType),
    /// Generic message
    Generic(&'static str)
}

impl Debug for GfxEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            GfxEncodeErrors::InvalidDimensions(width, height) => {
                writeln!(f, "Cannot encode a frame of dimensions {width}x{height}")
            }
            GfxEncodeErrors::ShapeMismatch(frame_type) => {
                writeln!(
                    f,
                    "Frame pixels do not match the {frame_type:?} transparency pattern"
                )
            }
            GfxEncodeErrors::TooLargeDimensions(offset) => {
                writeln!(
                    f,
                    "Frame offset {offset} cannot be addressed by a 16-bit header word"
                )
            }
            GfxEncodeErrors::UnsupportedFrameType(frame_type) => {
                writeln!(f, "No encoder for frames of type {frame_type:?}")
            }
            GfxEncodeErrors::Generic(reason) => {
                writeln!(f, "{reason}")
            }
        }
    }
}

impl Display for GfxEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl From<&'static str> for GfxEncodeErrors {
    fn from(reason: &'static str) -> Self {
        Self::Generic(reason)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GfxEncodeErrors {}

/// Errors raised when validating the group ranges of a [`Gfx`]
/// container
///
/// [`Gfx`]: crate::gfx::Gfx
pub enum GroupError {
    /// A group does not start where the previous one ended
    ///
    /// # Arguments
    /// - 1st argument is the expected first frame index
    /// - 2nd argument is the index found
    NotContiguous(usize, usize),
    /// A group's last frame index precedes its first
    InvertedRange(usize, usize),
    /// A group references a frame index past the frame count
    OutOfBounds(usize, usize),
    /// The groups stop before the last frame
    ///
    /// # Arguments
    /// - 1st argument is the first uncovered frame index
    /// - 2nd argument is the frame count
    UncoveredFrames(usize, usize)
}

impl Debug for GroupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            GroupError::NotContiguous(expected, found) => {
                writeln!(
                    f,
                    "Group ranges must be contiguous, expected start {expected} but found {found}"
                )
            }
            GroupError::InvertedRange(first, last) => {
                writeln!(f, "Group range {first}..={last} is inverted")
            }
            GroupError::OutOfBounds(index, count) => {
                writeln!(
                    f,
                    "Group references frame {index} but the container has {count} frames"
                )
            }
            GroupError::UncoveredFrames(index, count) => {
                writeln!(
                    f,
                    "Groups cover frames up to {index} but the container has {count} frames"
                )
            }
        }
    }
}

impl Display for GroupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GroupError {}
