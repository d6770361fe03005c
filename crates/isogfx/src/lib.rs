/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding of the frame formats used by a classic
//! isometric tile game engine
//!
//! Sprite containers store frames in one of two run-length encodings,
//! the regular one handled by [`SpriteDecoder`]/[`SpriteEncoder`] and a
//! masked one handled by [`MaskedDecoder`]/[`MaskedEncoder`]. Level
//! containers additionally store fixed size bit-pattern frames handled
//! by [`LevelFrameDecoder`]/[`LevelFrameEncoder`], and tileset
//! containers store 32×32 micro-tiles of six geometric shapes handled
//! by [`TileFrameDecoder`]/[`TileFrameEncoder`].
//!
//! All decoders produce [`Frame`] values, a rectangular grid of
//! transparent-or-indexed [`Pixel`]s; colors are resolved by an
//! external palette. Encoding is lossless: re-encoding a decoded frame
//! reproduces the original bytes.
//!
//! # Features
//! - Decoding and encoding of every frame variant
//! - Frame width recovery for headerless sprite frames
//! - Geometric shape detection for tileset frames
//! - `no_std` with `alloc`
//!
//! ## `no_std`
//! You can use `no_std` with the alloc feature to compile for `no_std` endpoints

#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
extern crate core;

pub use codec::*;
pub use errors::*;
pub use frame::*;
pub use gfx::*;
pub use isogfx_core;
pub use level::*;
pub use masked::*;
pub use sprite::*;
pub use tileset::*;

mod codec;
mod constants;
mod errors;
mod frame;
mod gfx;
mod level;
mod masked;
mod sprite;
mod tileset;
mod width;
