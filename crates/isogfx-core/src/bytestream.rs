/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader and writer.
//!
//! The formats handled by the isogfx crates always arrive as complete
//! in-memory frame slices, so the reader is a plain cursor over a byte
//! slice and the writer appends to a growable buffer.

pub use reader::{ByteIoError, ByteReader};
pub use writer::ByteWriter;

mod reader;
mod writer;
