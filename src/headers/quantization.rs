// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::error::{QuantTableError, Result};
use crate::headers::SegmentReader;
use crate::util::tracing_wrappers::*;
use crate::{BLOCK_SIZE, ZIGZAG_ORDER};

pub const NUM_QUANT_TABLES: usize = 4;

/// Quantization matrix in natural (row-major) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    pub values: [u16; BLOCK_SIZE],
    pub sixteen_bit: bool,
}

/// Quantization tables indexed by destination id.
#[derive(Debug, Default)]
pub struct QuantizationTables {
    tables: [Option<QuantizationTable>; NUM_QUANT_TABLES],
}

impl QuantizationTables {
    pub fn get(&self, id: u8) -> Result<&QuantizationTable> {
        Ok(self
            .tables
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(QuantTableError::Undefined(id))?)
    }

    /// Parses a DQT payload, which may define several tables.
    pub fn read_segment<R: Read>(&mut self, segment: &mut SegmentReader<'_, R>) -> Result<()> {
        while segment.remaining() > 0 {
            let info = segment.read_u8()?;
            let precision = info >> 4;
            let id = info & 0x0f;
            if precision > 1 {
                return Err(QuantTableError::Precision(precision).into());
            }
            if id as usize >= NUM_QUANT_TABLES {
                return Err(QuantTableError::Id(id).into());
            }
            let sixteen_bit = precision == 1;
            let mut values = [0u16; BLOCK_SIZE];
            for &pos in ZIGZAG_ORDER.iter() {
                values[pos] = if sixteen_bit {
                    segment.read_u16()?
                } else {
                    segment.read_u8()? as u16
                };
            }
            debug!(id, sixteen_bit, "read quantization table");
            self.tables[id as usize] = Some(QuantizationTable {
                values,
                sixteen_bit,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::byte_cursor::ByteCursor;
    use crate::error::Error;

    fn dqt(payload: &[u8]) -> Vec<u8> {
        let mut out = ((payload.len() + 2) as u16).to_be_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    fn parse(bytes: &[u8]) -> Result<QuantizationTables> {
        let mut cursor = ByteCursor::new(bytes);
        let mut segment = SegmentReader::new(&mut cursor)?;
        let mut tables = QuantizationTables::default();
        tables.read_segment(&mut segment)?;
        segment.finish()?;
        Ok(tables)
    }

    #[test]
    fn unzigzags_entries() -> Result<()> {
        let mut payload = vec![0x02];
        payload.extend(0..64u8);
        let tables = parse(&dqt(&payload))?;
        let table = tables.get(2)?;
        assert!(!table.sixteen_bit);
        // Zigzag index 2 lands on row 1, column 0.
        assert_eq!(table.values[..4], [0, 1, 5, 6]);
        assert_eq!(table.values[8], 2);
        assert_eq!(table.values[63], 63);
        assert!(tables.get(0).is_err());
        Ok(())
    }

    #[test]
    fn sixteen_bit_and_multiple_tables() -> Result<()> {
        let mut payload = vec![0x10];
        for i in 0..64u16 {
            payload.extend_from_slice(&(i * 300).to_be_bytes());
        }
        payload.push(0x01);
        payload.extend([7u8; 64]);
        let tables = parse(&dqt(&payload))?;
        assert!(tables.get(0)?.sixteen_bit);
        assert_eq!(tables.get(0)?.values[1], 300);
        assert_eq!(tables.get(0)?.values[8], 600);
        assert_eq!(tables.get(1)?.values, [7; 64]);
        Ok(())
    }

    #[test]
    fn invalid_precision() {
        let mut payload = vec![0x20];
        payload.extend([1u8; 64]);
        assert!(matches!(
            parse(&dqt(&payload)),
            Err(Error::QuantTable(QuantTableError::Precision(2)))
        ));
    }

    #[test]
    fn invalid_id() {
        let mut payload = vec![0x04];
        payload.extend([1u8; 64]);
        assert!(matches!(
            parse(&dqt(&payload)),
            Err(Error::QuantTable(QuantTableError::Id(4)))
        ));
    }

    #[test]
    fn truncated_table() {
        let mut payload = vec![0x00];
        payload.extend([1u8; 63]);
        assert!(matches!(
            parse(&dqt(&payload)),
            Err(Error::SegmentSize { .. })
        ));
    }
}
