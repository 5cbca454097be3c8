// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::entropy_coding::huffman::NUM_TABLE_IDS;
use crate::error::{Result, ScanHeaderError};
use crate::headers::{FrameHeader, SegmentReader};
use crate::util::tracing_wrappers::*;

// Spectral selection start, end and successive approximation of a
// sequential scan.
const BASELINE_SPECTRAL: (u8, u8, u8) = (0x00, 0x3f, 0x00);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponentInfo {
    /// Index into [`FrameHeader::components`].
    pub component: usize,
    pub dc_table: u8,
    pub ac_table: u8,
}

/// Contents of the SOS segment, components in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponentInfo>,
}

impl ScanHeader {
    pub fn read<R: Read>(
        segment: &mut SegmentReader<'_, R>,
        frame: &FrameHeader,
    ) -> Result<ScanHeader> {
        let num_components = segment.read_u8()?;
        if num_components as usize != frame.components.len() {
            return Err(ScanHeaderError::ComponentCount {
                scan: num_components,
                frame: frame.components.len(),
            }
            .into());
        }
        let mut components: Vec<ScanComponentInfo> = Vec::with_capacity(num_components as usize);
        for _ in 0..num_components {
            let id = segment.read_u8()?;
            let tables = segment.read_u8()?;
            let component = frame
                .component_index(id)
                .ok_or(ScanHeaderError::UnknownComponent(id))?;
            if components.iter().any(|c| c.component == component) {
                return Err(ScanHeaderError::DuplicateComponent(id).into());
            }
            let (dc_table, ac_table) = (tables >> 4, tables & 0x0f);
            if dc_table as usize >= NUM_TABLE_IDS || ac_table as usize >= NUM_TABLE_IDS {
                return Err(ScanHeaderError::TableId {
                    dc: dc_table,
                    ac: ac_table,
                }
                .into());
            }
            components.push(ScanComponentInfo {
                component,
                dc_table,
                ac_table,
            });
        }

        let spectral = (segment.read_u8()?, segment.read_u8()?, segment.read_u8()?);
        if spectral != BASELINE_SPECTRAL {
            return Err(
                ScanHeaderError::SpectralSelection(spectral.0, spectral.1, spectral.2).into(),
            );
        }
        debug!(?components, "read scan header");
        Ok(ScanHeader { components })
    }
}
