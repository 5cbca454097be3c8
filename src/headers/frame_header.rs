// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::error::{FrameHeaderError, Result};
use crate::headers::SegmentReader;
use crate::util::tracing_wrappers::*;

pub const BASELINE_PRECISION: u8 = 8;
pub const MAX_SAMPLING_FACTOR: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub id: u8,
    pub h_samp: u8,
    pub v_samp: u8,
    pub quant_table: u8,
}

/// Contents of the SOF0 segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub width: u16,
    pub height: u16,
    pub components: Vec<ComponentDescriptor>,
    pub max_h_samp: u8,
    pub max_v_samp: u8,
}

impl FrameHeader {
    pub fn read<R: Read>(segment: &mut SegmentReader<'_, R>) -> Result<FrameHeader> {
        let precision = segment.read_u8()?;
        if precision != BASELINE_PRECISION {
            return Err(FrameHeaderError::Precision(precision).into());
        }
        let height = segment.read_u16()?;
        let width = segment.read_u16()?;
        if width == 0 || height == 0 {
            return Err(FrameHeaderError::InvalidImageSize(width, height).into());
        }
        let num_components = segment.read_u8()?;
        if num_components != 1 && num_components != 3 {
            return Err(FrameHeaderError::ComponentCount(num_components).into());
        }

        let mut components: Vec<ComponentDescriptor> = Vec::with_capacity(num_components as usize);
        for _ in 0..num_components {
            let id = segment.read_u8()?;
            let sampling = segment.read_u8()?;
            let quant_table = segment.read_u8()?;
            let (h_samp, v_samp) = (sampling >> 4, sampling & 0x0f);
            if !(1..=MAX_SAMPLING_FACTOR).contains(&h_samp)
                || !(1..=MAX_SAMPLING_FACTOR).contains(&v_samp)
            {
                return Err(FrameHeaderError::SamplingFactors {
                    id,
                    h: h_samp,
                    v: v_samp,
                }
                .into());
            }
            if components.iter().any(|c| c.id == id) {
                return Err(FrameHeaderError::DuplicateComponent(id).into());
            }
            components.push(ComponentDescriptor {
                id,
                h_samp,
                v_samp,
                quant_table,
            });
        }

        let max_h_samp = components.iter().map(|c| c.h_samp).max().unwrap_or(1);
        let max_v_samp = components.iter().map(|c| c.v_samp).max().unwrap_or(1);
        debug!(width, height, ?components, "read frame header");
        Ok(FrameHeader {
            width,
            height,
            components,
            max_h_samp,
            max_v_samp,
        })
    }

    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }

    pub fn is_grayscale(&self) -> bool {
        self.components.len() == 1
    }

    /// Width of an MCU in pixels.
    pub fn mcu_width(&self) -> usize {
        8 * self.max_h_samp as usize
    }

    /// Height of an MCU in pixels.
    pub fn mcu_height(&self) -> usize {
        8 * self.max_v_samp as usize
    }

    /// Number of MCUs per row and per column.
    pub fn mcu_grid(&self) -> (usize, usize) {
        (
            (self.width as usize).div_ceil(self.mcu_width()),
            (self.height as usize).div_ceil(self.mcu_height()),
        )
    }
}
