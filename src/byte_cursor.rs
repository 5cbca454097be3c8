// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::Result;

/// Forward byte source with a small pushback buffer.
///
/// Marker detection inside entropy-coded data needs to look at the byte after
/// an `0xff`, and if that byte starts a marker, both bytes have to be handed
/// back so that the segment parser can read the marker normally.
pub struct ByteCursor<R> {
    inner: R,
    // Bytes are popped from the back, so the most recently pushed byte is
    // returned first.
    pushed_back: Vec<u8>,
    position: usize,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushed_back: Vec::with_capacity(2),
            position: 0,
        }
    }

    /// Reads a single byte, failing with `EndOfInput` past the end of the source.
    /// ```
    /// # use jpeg_baseline::byte_cursor::ByteCursor;
    /// let mut cursor = ByteCursor::new(&[0xff, 0xd8][..]);
    /// assert_eq!(cursor.read_u8()?, 0xff);
    /// assert_eq!(cursor.read_u8()?, 0xd8);
    /// assert!(cursor.read_u8().is_err());
    /// # Ok::<(), jpeg_baseline::error::Error>(())
    /// ```
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = match self.pushed_back.pop() {
            Some(byte) => byte,
            None => self.inner.read_u8()?,
        };
        self.position += 1;
        Ok(byte)
    }

    /// Returns the next byte without consuming it.
    pub fn peek_u8(&mut self) -> Result<u8> {
        let byte = self.read_u8()?;
        self.push_back(byte);
        Ok(byte)
    }

    /// Returns `byte` to the stream; it will be the next byte read.
    ///
    /// To restore a sequence `a, b`, push `b` first and `a` second.
    pub fn push_back(&mut self, byte: u8) {
        debug_assert!(self.position > 0);
        self.pushed_back.push(byte);
        self.position = self.position.saturating_sub(1);
    }

    /// Reads a big-endian 16 bit value.
    /// ```
    /// # use jpeg_baseline::byte_cursor::ByteCursor;
    /// let mut cursor = ByteCursor::new(&[0x01, 0x02][..]);
    /// assert_eq!(cursor.read_u16()?, 0x0102);
    /// # Ok::<(), jpeg_baseline::error::Error>(())
    /// ```
    pub fn read_u16(&mut self) -> Result<u16> {
        if self.pushed_back.is_empty() {
            let value = self.inner.read_u16::<BigEndian>()?;
            self.position += 2;
            return Ok(value);
        }
        let hi = self.read_u8()?;
        let lo = self.read_u8()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Discards `num` bytes.
    pub fn skip(&mut self, num: usize) -> Result<()> {
        for _ in 0..num {
            self.read_u8()?;
        }
        Ok(())
    }

    /// Number of bytes consumed so far, not counting pushed back bytes.
    pub fn position(&self) -> usize {
        self.position
    }
}
