// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_DIM;

/// Maps a pixel position inside an MCU to the position of the component
/// sample that covers it: `(x * h / h_max, y * v / v_max)`, rounded down.
/// ```
/// # use jpeg_baseline::render::upsample;
/// // Chroma subsampled 2x in both directions.
/// assert_eq!(upsample(15, 9, 1, 1, 2, 2), (7, 4));
/// // Full resolution components map to themselves.
/// assert_eq!(upsample(15, 9, 2, 2, 2, 2), (15, 9));
/// ```
pub fn upsample(x: usize, y: usize, h: u8, v: u8, h_max: u8, v_max: u8) -> (usize, usize) {
    (
        x * h as usize / h_max as usize,
        y * v as usize / v_max as usize,
    )
}

/// Samples of one component over one MCU: `h` by `v` blocks of 8x8.
#[derive(Debug, Clone)]
pub struct McuSamples {
    h_samp: u8,
    v_samp: u8,
    samples: Vec<u8>,
}

impl McuSamples {
    pub fn new(h_samp: u8, v_samp: u8) -> McuSamples {
        McuSamples {
            h_samp,
            v_samp,
            samples: vec![0; h_samp as usize * v_samp as usize * BLOCK_DIM * BLOCK_DIM],
        }
    }

    fn stride(&self) -> usize {
        self.h_samp as usize * BLOCK_DIM
    }

    /// Copies a row-major 8x8 block to block position `(block_x, block_y)`.
    pub fn store_block(&mut self, block_x: usize, block_y: usize, block: &[u8]) {
        debug_assert!(block_x < self.h_samp as usize && block_y < self.v_samp as usize);
        let stride = self.stride();
        for (row, src) in block.chunks_exact(BLOCK_DIM).enumerate() {
            let start = (block_y * BLOCK_DIM + row) * stride + block_x * BLOCK_DIM;
            self.samples[start..start + BLOCK_DIM].copy_from_slice(src);
        }
    }

    /// Sample covering pixel `(x, y)` of an MCU with maximum sampling
    /// factors `h_max` and `v_max`.
    pub fn sample_at(&self, x: usize, y: usize, h_max: u8, v_max: u8) -> u8 {
        let (sx, sy) = upsample(x, y, self.h_samp, self.v_samp, h_max, v_max);
        self.samples[sy * self.stride() + sx]
    }
}
