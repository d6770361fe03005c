/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global decoder options

/// Decoder options that are flags
///
/// NOTE: When you extend this, add a value to
/// `default_flags` below
#[derive(Copy, Debug, Clone)]
pub struct DecoderFlags {
    /// Whether decoders should reject recoverable format anomalies
    /// instead of logging them
    strict_mode:         bool,
    /// Whether the sprite decoder may fall back to structural width
    /// inference when neither the caller nor the frame header
    /// provides a width
    infer_missing_width: bool
}

fn default_flags() -> DecoderFlags {
    DecoderFlags {
        strict_mode:         false,
        infer_missing_width: true
    }
}

/// Decoder options
///
/// Options respected by all frame decoders in the isogfx family.
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode frames larger than
    /// the specified width.
    ///
    /// - Default value: 4096
    max_width:  usize,
    /// Maximum height for which decoders will not
    /// try to decode frames larger than the
    /// specified height
    ///
    /// - Default value: 4096
    max_height: usize,
    /// Boolean flags that influence decoding
    flags:      DecoderFlags
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_width:  1 << 12,
            max_height: 1 << 12,
            flags:      default_flags()
        }
    }
}

impl DecoderOptions {
    /// Get maximum width configured for which the decoder
    /// should not try to decode frames greater than this width
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode frames greater than this height
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Return true whether the decoder should be in strict mode
    /// and reject recoverable anomalies
    pub const fn strict_mode(&self) -> bool {
        self.flags.strict_mode
    }

    /// Return true if the sprite decoder may recover a missing width
    /// by structural inference from the run lengths
    pub const fn infer_missing_width(&self) -> bool {
        self.flags.infer_missing_width
    }

    /// Set maximum width for which the decoder should not try
    /// decoding frames greater than that width
    ///
    /// # Arguments
    ///
    /// * `width`: The maximum width allowed
    ///
    /// returns: DecoderOptions
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding frames greater than that height
    ///
    /// # Arguments
    ///
    /// * `height`: The maximum height allowed
    ///
    /// returns: DecoderOptions
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Set whether the decoder should be in strict mode
    ///
    /// This reduces the error tolerance level for the decoders;
    /// anomalies that would otherwise be logged and skipped, like
    /// the reserved zero control byte of the masked sprite format,
    /// are rejected instead
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.flags.strict_mode = yes;
        self
    }

    /// Set whether the sprite decoder may fall back to structural
    /// width inference for headerless frames
    ///
    /// Containers that carry authoritative frame widths can turn
    /// this off to surface missing-width bugs early
    pub fn set_infer_missing_width(mut self, yes: bool) -> Self {
        self.flags.infer_missing_width = yes;
        self
    }
}
