// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::byte_cursor::ByteCursor;
use crate::error::{Error, Result};

const LENGTH_FIELD_SIZE: usize = 2;

/// Reads the payload of one length-prefixed marker segment.
///
/// The declared length counts the two length bytes. Reads never go past the
/// declared end, and [`SegmentReader::finish`] checks that the payload was
/// consumed exactly.
pub struct SegmentReader<'a, R> {
    cursor: &'a mut ByteCursor<R>,
    declared: usize,
    consumed: usize,
}

impl<'a, R: Read> SegmentReader<'a, R> {
    /// Reads the length field that follows a marker.
    pub fn new(cursor: &'a mut ByteCursor<R>) -> Result<Self> {
        let declared = cursor.read_u16()? as usize;
        if declared < LENGTH_FIELD_SIZE {
            return Err(Error::SegmentSize {
                declared,
                consumed: LENGTH_FIELD_SIZE,
            });
        }
        Ok(Self {
            cursor,
            declared,
            consumed: LENGTH_FIELD_SIZE,
        })
    }

    fn overrun(&self, extra: usize) -> Error {
        Error::SegmentSize {
            declared: self.declared,
            consumed: self.consumed + extra,
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        if self.remaining() < 1 {
            return Err(self.overrun(1));
        }
        let byte = self.cursor.read_u8()?;
        self.consumed += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        if self.remaining() < 2 {
            return Err(self.overrun(2));
        }
        let value = self.cursor.read_u16()?;
        self.consumed += 2;
        Ok(value)
    }

    /// Reads `num` bytes into a new buffer.
    pub fn read_bytes(&mut self, num: usize) -> Result<Vec<u8>> {
        if self.remaining() < num {
            return Err(self.overrun(num));
        }
        let mut out = Vec::with_capacity(num);
        for _ in 0..num {
            out.push(self.cursor.read_u8()?);
        }
        self.consumed += num;
        Ok(out)
    }

    /// Discards the rest of the payload.
    pub fn skip_remaining(&mut self) -> Result<()> {
        let rest = self.remaining();
        self.cursor.skip(rest)?;
        self.consumed += rest;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.declared - self.consumed
    }

    pub fn payload_len(&self) -> usize {
        self.declared - LENGTH_FIELD_SIZE
    }

    /// Fails unless the payload has been consumed exactly.
    pub fn finish(self) -> Result<()> {
        if self.consumed != self.declared {
            return Err(Error::SegmentSize {
                declared: self.declared,
                consumed: self.consumed,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn exact_payload() -> Result<()> {
        let mut cursor = ByteCursor::new(&[0x00, 0x05, 1, 0x02, 0x03, 9][..]);
        let mut segment = SegmentReader::new(&mut cursor)?;
        assert_eq!(segment.payload_len(), 3);
        assert_eq!(segment.read_u8()?, 1);
        assert_eq!(segment.read_u16()?, 0x0203);
        segment.finish()?;
        assert_eq!(cursor.read_u8()?, 9);
        Ok(())
    }

    #[test]
    fn short_read_fails_finish() -> Result<()> {
        let mut cursor = ByteCursor::new(&[0x00, 0x04, 1, 2][..]);
        let mut segment = SegmentReader::new(&mut cursor)?;
        segment.read_u8()?;
        assert!(matches!(
            segment.finish(),
            Err(Error::SegmentSize {
                declared: 4,
                consumed: 3
            })
        ));
        Ok(())
    }

    #[test]
    fn reads_stop_at_declared_end() -> Result<()> {
        let mut cursor = ByteCursor::new(&[0x00, 0x03, 1, 2, 3][..]);
        let mut segment = SegmentReader::new(&mut cursor)?;
        assert!(matches!(segment.read_u16(), Err(Error::SegmentSize { .. })));
        assert_eq!(segment.read_u8()?, 1);
        assert!(matches!(segment.read_u8(), Err(Error::SegmentSize { .. })));
        Ok(())
    }

    #[test]
    fn length_below_two() {
        let mut cursor = ByteCursor::new(&[0x00, 0x01][..]);
        assert!(matches!(
            SegmentReader::new(&mut cursor),
            Err(Error::SegmentSize { declared: 1, .. })
        ));
    }

    #[test]
    fn skip_payload() -> Result<()> {
        let mut cursor = ByteCursor::new(&[0x00, 0x06, 1, 2, 3, 4, 0xff][..]);
        let mut segment = SegmentReader::new(&mut cursor)?;
        segment.skip_remaining()?;
        segment.finish()?;
        assert_eq!(cursor.read_u8()?, 0xff);
        Ok(())
    }
}
