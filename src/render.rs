// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Turns decoded sample blocks into RGB pixels.

pub mod upsample;
pub mod ycbcr;

pub use upsample::{upsample, McuSamples};
pub use ycbcr::{gray_to_rgb, ycbcr_to_rgb};
