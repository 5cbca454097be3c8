// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use num_traits::FromPrimitive;

use crate::entropy_coding::huffman::{
    HuffmanTables, HuffmanTree, TableClass, HUFFMAN_MAX_BITS, NUM_TABLE_IDS,
};
use crate::error::{HuffmanError, Result};
use crate::headers::SegmentReader;
use crate::util::tracing_wrappers::*;

impl HuffmanTables {
    /// Parses a DHT payload, building one decode tree per table it defines.
    pub fn read_segment<R: Read>(&mut self, segment: &mut SegmentReader<'_, R>) -> Result<()> {
        while segment.remaining() > 0 {
            let info = segment.read_u8()?;
            let class = TableClass::from_u8(info >> 4).ok_or(HuffmanError::InvalidClass(info >> 4))?;
            let id = info & 0x0f;
            if id as usize >= NUM_TABLE_IDS {
                return Err(HuffmanError::InvalidId(id).into());
            }
            let code_lengths = segment.read_bytes(HUFFMAN_MAX_BITS)?;
            let num_values: usize = code_lengths.iter().map(|&count| count as usize).sum();
            let values = segment.read_bytes(num_values)?;
            debug!(?class, id, num_values, "read Huffman table");
            self.set(class, id, HuffmanTree::build(&code_lengths, &values)?)?;
        }
        Ok(())
    }
}
