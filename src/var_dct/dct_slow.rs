// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Direct double-precision evaluation of the 8x8 DCT pair, used as a reference.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{BLOCK_DIM, BLOCK_SIZE};

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

#[inline(always)]
fn basis(spatial: usize, freq: usize) -> f64 {
    ((2 * spatial + 1) * freq) as f64 * PI / 16.0
}

pub fn idct2d(input: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for x in 0..BLOCK_DIM {
        for y in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for u in 0..BLOCK_DIM {
                for v in 0..BLOCK_DIM {
                    sum += alpha(u)
                        * alpha(v)
                        * input[u * BLOCK_DIM + v]
                        * basis(x, u).cos()
                        * basis(y, v).cos();
                }
            }
            out[x * BLOCK_DIM + y] = sum / 4.0;
        }
    }
    out
}

pub fn dct2d(input: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for u in 0..BLOCK_DIM {
        for v in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for x in 0..BLOCK_DIM {
                for y in 0..BLOCK_DIM {
                    sum += input[x * BLOCK_DIM + y] * basis(x, u).cos() * basis(y, v).cos();
                }
            }
            out[u * BLOCK_DIM + v] = alpha(u) * alpha(v) * sum / 4.0;
        }
    }
    out
}
