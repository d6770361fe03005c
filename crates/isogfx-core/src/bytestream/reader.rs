/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Errors that may occur when reading from or writing to a bytestream
pub enum ByteIoError {
    /// Not enough bytes to satisfy a read.
    ///
    /// The first argument is the number of bytes requested,
    /// the second is the number of bytes actually left
    NotEnoughBytes(usize, usize),
    /// Generic message
    Generic(&'static str)
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ByteIoError::Generic(reason) => {
                writeln!(f, "Generic I/O error: {reason}")
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl From<&'static str> for ByteIoError {
    fn from(reason: &'static str) -> Self {
        ByteIoError::Generic(reason)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ByteIoError {}

/// An encapsulation of a bytestream reader
///
/// A thin cursor over a borrowed byte slice with endian aware
/// reads. Reads come in two flavours, ones that return a default
/// value on insufficient bytes (for hot loops that bound-check
/// elsewhere) and `_err` ones that report the failure.
pub struct ByteReader<'a> {
    stream:   &'a [u8],
    position: usize
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

impl<'a> ByteReader<'a> {
    /// Create a new reader over `buf` starting at position 0
    pub const fn new(buf: &'a [u8]) -> ByteReader<'a> {
        ByteReader {
            stream:   buf,
            position: 0
        }
    }

    /// Skip `num` bytes ahead of the stream
    #[inline]
    pub fn skip(&mut self, num: usize) {
        // Can this overflow ??
        self.position = self.position.wrapping_add(num);
    }

    /// Undo a read of `num` bytes
    #[inline]
    pub fn rewind(&mut self, num: usize) {
        self.position = self.position.saturating_sub(num);
    }

    /// Length of the underlying buffer
    pub const fn len(&self) -> usize {
        self.stream.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Number of bytes between the cursor and the end of the buffer
    pub const fn remaining(&self) -> usize {
        // Must be saturating to prevent underflow
        self.stream.len().saturating_sub(self.position)
    }

    /// Return true if the stream can satisfy a read of `num` more bytes
    ///
    /// # Example
    /// ```
    /// use isogfx_core::bytestream::ByteReader;
    /// let stream = ByteReader::new(&[1, 2, 3]);
    /// assert!(stream.has(3));
    /// assert!(!stream.has(4));
    /// ```
    pub const fn has(&self, num: usize) -> bool {
        self.position.saturating_add(num) <= self.stream.len()
    }

    pub const fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Report whether the cursor has consumed the whole buffer
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }

    /// Read a single byte, returning `0` if we can't read it, e.g
    /// because of EOF
    #[inline(always)]
    pub fn get_u8(&mut self) -> u8 {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }

    /// Read a single byte, erroring out if there is none left
    #[inline]
    pub fn get_u8_err(&mut self) -> Result<u8, ByteIoError> {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(ByteIoError::NotEnoughBytes(1, 0))
        }
    }

    /// Look at the next byte without advancing the cursor
    pub fn peek_u8(&self) -> Option<u8> {
        self.stream.get(self.position).copied()
    }

    /// Borrow the next `num` bytes of the stream, advancing the cursor
    /// past them
    #[inline]
    pub fn get_slice(&mut self, num: usize) -> Result<&'a [u8], ByteIoError> {
        match self.stream.get(self.position..self.position + num) {
            Some(slice) => {
                self.position += num;
                Ok(slice)
            }
            None => Err(ByteIoError::NotEnoughBytes(num, self.remaining()))
        }
    }

    /// Read `N` bytes into a fixed size array or error out if the
    /// stream cannot satisfy the read
    #[inline]
    pub fn get_fixed_bytes_or_err<const N: usize>(&mut self) -> Result<[u8; N], ByteIoError> {
        let mut bytes = [0; N];
        match self.stream.get(self.position..self.position + N) {
            Some(slice) => {
                bytes.copy_from_slice(slice);
                self.position += N;
                Ok(bytes)
            }
            None => Err(ByteIoError::NotEnoughBytes(N, self.remaining()))
        }
    }
}

macro_rules! get_single_type {
    ($name:tt,$name2:tt,$name3:tt,$name4:tt,$name5:tt,$name6:tt,$int_type:tt) => {
        impl<'a> ByteReader<'a> {
            #[inline(always)]
            fn $name(&mut self, mode: Mode) -> $int_type {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                match self.stream.get(self.position..self.position + SIZE_OF_VAL) {
                    Some(position) => {
                        space.copy_from_slice(position);
                        self.position += SIZE_OF_VAL;

                        match mode {
                            Mode::BE => $int_type::from_be_bytes(space),
                            Mode::LE => $int_type::from_le_bytes(space)
                        }
                    }
                    None => 0
                }
            }

            #[inline(always)]
            fn $name2(&mut self, mode: Mode) -> Result<$int_type, ByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                match self.stream.get(self.position..self.position + SIZE_OF_VAL) {
                    Some(position) => {
                        space.copy_from_slice(position);
                        self.position += SIZE_OF_VAL;

                        match mode {
                            Mode::BE => Ok($int_type::from_be_bytes(space)),
                            Mode::LE => Ok($int_type::from_le_bytes(space))
                        }
                    }
                    None => Err(ByteIoError::NotEnoughBytes(SIZE_OF_VAL, self.remaining()))
                }
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name3(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name2(Mode::BE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name4(&mut self) -> Result<$int_type, ByteIoError> {
                self.$name2(Mode::LE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning 0 if the underlying buffer does not have enough bytes for a ",stringify!($int_type)," read.")]
            #[inline(always)]
            pub fn $name5(&mut self) -> $int_type {
                self.$name(Mode::BE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning 0 if the underlying buffer does not have enough bytes for a ",stringify!($int_type)," read.")]
            #[inline(always)]
            pub fn $name6(&mut self) -> $int_type {
                self.$name(Mode::LE)
            }
        }
    };
}

get_single_type!(
    get_u16_inner_or_default,
    get_u16_inner_or_die,
    get_u16_be_err,
    get_u16_le_err,
    get_u16_be,
    get_u16_le,
    u16
);
get_single_type!(
    get_u32_inner_or_default,
    get_u32_inner_or_die,
    get_u32_be_err,
    get_u32_le_err,
    get_u32_be,
    get_u32_le,
    u32
);

#[cfg(test)]
mod tests {
    use super::ByteReader;

    #[test]
    fn reads_advance_the_cursor() {
        let data = [0x0A, 0x00, 0xFF, 0x01];
        let mut stream = ByteReader::new(&data);

        assert_eq!(stream.get_u16_le(), 10);
        assert_eq!(stream.position(), 2);
        assert_eq!(stream.get_u8(), 0xFF);
        assert_eq!(stream.remaining(), 1);
    }

    #[test]
    fn short_reads_error_out() {
        let mut stream = ByteReader::new(&[1]);
        assert!(stream.get_u16_le_err().is_err());
        // a failed read does not advance the cursor
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn silent_reads_return_zero_at_eof() {
        let mut stream = ByteReader::new(&[]);
        assert_eq!(stream.get_u8(), 0);
        assert_eq!(stream.get_u32_le(), 0);
    }
}
