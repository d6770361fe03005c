/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the isogfx crates
//!
//! This crate provides a set of core routines shared
//! by the decoders and encoders under the `isogfx` umbrella
//!
//! It currently contains
//!
//! - A bytestream reader and writer with endian aware reads and writes
//! - Decoder options respected by all frame decoders
//! - A logging facade that forwards to the `log` crate when the
//!   `log` feature is on and compiles to nothing otherwise
//!
//! This library is `#[no_std]` with the `alloc` crate needed for defining
//! `Vec` which we need for storing encoded bytes.
//!
//! # Features
//!  - `std`: Enables `std` support, e.g `std::error::Error` impls
//!  - `log`: Enables logging via the `log` crate
//!
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub mod bytestream;
pub mod options;

#[cfg(feature = "log")]
pub use log;

#[cfg(not(feature = "log"))]
pub mod log;
