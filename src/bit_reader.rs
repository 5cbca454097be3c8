// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::byte_cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::util::tracing_wrappers::*;

pub const MAX_BITS_PER_CALL: usize = 16;

/// Bits of one entropy-coded segment, read MSB first.
///
/// The whole segment is collected up front with byte stuffing removed, so a
/// `BitStream` never touches the underlying byte source while bits are read.
pub struct BitStream {
    data: Vec<u8>,
    bit_pos: usize,
}

impl BitStream {
    /// Wraps already de-stuffed bytes.
    /// ```
    /// # use jpeg_baseline::bit_reader::BitStream;
    /// let mut bits = BitStream::new(vec![0b1010_0000]);
    /// assert!(bits.next_bit()?);
    /// assert!(!bits.next_bit()?);
    /// assert_eq!(bits.read_bits(2)?, 0b10);
    /// assert_eq!(bits.bits_remaining(), 4);
    /// # Ok::<(), jpeg_baseline::error::Error>(())
    /// ```
    pub fn new(data: Vec<u8>) -> BitStream {
        BitStream { data, bit_pos: 0 }
    }

    /// Reads entropy-coded bytes until the next marker.
    ///
    /// `0xff 0x00` contributes a single `0xff` byte. On `0xff` followed by any
    /// other byte, both bytes are pushed back into `cursor` and reading stops.
    pub fn consume_entropy_segment<R: Read>(cursor: &mut ByteCursor<R>) -> Result<BitStream> {
        let mut data = Vec::new();
        loop {
            let byte = cursor.read_u8()?;
            if byte == 0xff {
                let next = cursor.read_u8()?;
                if next != 0x00 {
                    cursor.push_back(next);
                    cursor.push_back(byte);
                    break;
                }
            }
            data.push(byte);
        }
        debug!(
            end = cursor.position(),
            len = data.len(),
            "collected entropy-coded segment"
        );
        Ok(BitStream::new(data))
    }

    /// Returns the next bit.
    pub fn next_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.bit_pos / 8)
            .ok_or(Error::BitstreamUnderflow(self.bit_pos))?;
        let bit = (byte >> (7 - self.bit_pos % 8)) & 1;
        self.bit_pos += 1;
        Ok(bit != 0)
    }

    /// Reads `num` bits, the first one read being the most significant.
    pub fn read_bits(&mut self, num: usize) -> Result<u16> {
        debug_assert!(num <= MAX_BITS_PER_CALL);
        let mut value = 0u16;
        for _ in 0..num {
            value = (value << 1) | self.next_bit()? as u16;
        }
        Ok(value)
    }

    /// Number of bits read so far.
    pub fn position(&self) -> usize {
        self.bit_pos
    }

    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_pos
    }
}
