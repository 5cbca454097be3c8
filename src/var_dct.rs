// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{BLOCK_DIM, BLOCK_SIZE};

pub mod dct_slow;

/// Separable 8x8 inverse DCT-II with JPEG normalization.
///
/// Computes `f[x][y] = 1/4 sum_u sum_v C(u) C(v) F[u][v] cos((2x+1)u pi/16) cos((2y+1)v pi/16)`
/// as a column pass followed by a row pass. Blocks are row-major: `F[u][v]`
/// is at `u * 8 + v` and `f[x][y]` at `x * 8 + y`.
pub struct InverseDct {
    // basis[x][u] = C(u) / 2 * cos((2x+1)u pi/16)
    basis: [[f64; BLOCK_DIM]; BLOCK_DIM],
}

impl Default for InverseDct {
    fn default() -> Self {
        Self::new()
    }
}

impl InverseDct {
    pub fn new() -> InverseDct {
        let basis = array_init::array_init(|x: usize| {
            array_init::array_init(|u: usize| {
                let c = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                c / 2.0 * (((2 * x + 1) * u) as f64 * PI / 16.0).cos()
            })
        });
        InverseDct { basis }
    }

    pub fn transform(&self, coefficients: &[f64; BLOCK_SIZE], out: &mut [f64; BLOCK_SIZE]) {
        // tmp[u][y] = sum_v F[u][v] * basis[y][v]
        let mut tmp = [0.0f64; BLOCK_SIZE];
        for u in 0..BLOCK_DIM {
            let row = &coefficients[u * BLOCK_DIM..(u + 1) * BLOCK_DIM];
            for y in 0..BLOCK_DIM {
                tmp[u * BLOCK_DIM + y] = row
                    .iter()
                    .zip(self.basis[y].iter())
                    .map(|(f, b)| f * b)
                    .sum();
            }
        }
        for x in 0..BLOCK_DIM {
            for y in 0..BLOCK_DIM {
                let mut sum = 0.0;
                for u in 0..BLOCK_DIM {
                    sum += self.basis[x][u] * tmp[u * BLOCK_DIM + y];
                }
                out[x * BLOCK_DIM + y] = sum;
            }
        }
    }
}
