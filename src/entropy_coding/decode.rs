// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::bit_reader::BitStream;
use crate::entropy_coding::huffman::{HuffmanTables, TableClass};
use crate::error::{HuffmanError, Result};
use crate::headers::ScanComponentInfo;
use crate::util::tracing_wrappers::*;
use crate::{BLOCK_SIZE, ZIGZAG_ORDER};

pub const MAX_DC_CATEGORY: u8 = 11;
const END_OF_BLOCK: u8 = 0x00;
const ZERO_RUN: u8 = 0xf0;
const ZERO_RUN_LENGTH: usize = 16;

/// Maps the `size` raw bits of a magnitude category to a signed value.
///
/// Values whose top bit is clear are negative: `raw - (2^size - 1)`.
/// ```
/// # use jpeg_baseline::entropy_coding::decode::extend_sign;
/// assert_eq!(extend_sign(0b101, 3), 5);
/// assert_eq!(extend_sign(0b010, 3), -5);
/// assert_eq!(extend_sign(0, 0), 0);
/// ```
pub fn extend_sign(raw: u16, size: u8) -> i32 {
    if size == 0 {
        return 0;
    }
    let raw = raw as i32;
    if raw & (1 << (size - 1)) == 0 {
        raw - (1 << size) + 1
    } else {
        raw
    }
}

/// State carried across all blocks of a scan.
#[derive(Debug)]
pub struct DecodeContext {
    dc_predictors: Vec<i32>,
}

impl DecodeContext {
    /// Creates predictors for `num_components` frame components, all zero.
    pub fn new(num_components: usize) -> DecodeContext {
        DecodeContext {
            dc_predictors: vec![0; num_components],
        }
    }

    pub fn dc_predictor(&self, component: usize) -> i32 {
        self.dc_predictors[component]
    }

    /// Decodes the quantized coefficients of one block into natural order.
    pub fn decode_block(
        &mut self,
        bits: &mut BitStream,
        tables: &mut HuffmanTables,
        scan: &ScanComponentInfo,
        coefficients: &mut [i32; BLOCK_SIZE],
    ) -> Result<()> {
        coefficients.fill(0);

        let dc_tree = tables.get_mut(TableClass::Dc, scan.dc_table)?;
        let category = dc_tree.read_symbol(bits)?;
        if category > MAX_DC_CATEGORY {
            return Err(HuffmanError::DcCategory(category).into());
        }
        let diff = extend_sign(bits.read_bits(category as usize)?, category);
        let predictor = &mut self.dc_predictors[scan.component];
        *predictor = predictor.wrapping_add(diff);
        coefficients[0] = *predictor;

        let ac_tree = tables.get_mut(TableClass::Ac, scan.ac_table)?;
        let mut k = 1;
        while k < BLOCK_SIZE {
            let symbol = ac_tree.read_symbol(bits)?;
            match symbol {
                END_OF_BLOCK => break,
                ZERO_RUN => {
                    if k + ZERO_RUN_LENGTH > BLOCK_SIZE {
                        return Err(HuffmanError::CoefficientOverflow.into());
                    }
                    k += ZERO_RUN_LENGTH;
                }
                _ => {
                    let run = (symbol >> 4) as usize;
                    let size = symbol & 0x0f;
                    k += run;
                    if k >= BLOCK_SIZE {
                        return Err(HuffmanError::CoefficientOverflow.into());
                    }
                    coefficients[ZIGZAG_ORDER[k]] = extend_sign(bits.read_bits(size as usize)?, size);
                    k += 1;
                }
            }
        }
        trace!(
            component = scan.component,
            dc = coefficients[0],
            bit_pos = bits.position(),
            "decoded block"
        );
        Ok(())
    }
}
