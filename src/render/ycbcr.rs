// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::image::Rgb;

const CHROMA_OFFSET: f64 = 128.0;

fn to_sample(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Full-range BT.601 as defined by JFIF.
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> Rgb {
    let y = y as f64;
    let cb = cb as f64 - CHROMA_OFFSET;
    let cr = cr as f64 - CHROMA_OFFSET;
    Rgb {
        r: to_sample(cr.mul_add(1.402, y)),
        g: to_sample(cr.mul_add(-0.714136, cb.mul_add(-0.344136, y))),
        b: to_sample(cb.mul_add(1.772, y)),
    }
}

pub fn gray_to_rgb(y: u8) -> Rgb {
    Rgb { r: y, g: y, b: y }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn neutral_chroma_is_gray() {
        for y in [0, 1, 77, 128, 254, 255] {
            assert_eq!(ycbcr_to_rgb(y, 128, 128), gray_to_rgb(y));
        }
    }

    #[test]
    fn known_colors() {
        // Red, green and blue as produced by a JFIF encoder.
        assert_eq!(ycbcr_to_rgb(76, 85, 255), Rgb { r: 254, g: 0, b: 0 });
        assert_eq!(ycbcr_to_rgb(150, 44, 21), Rgb { r: 0, g: 255, b: 1 });
        assert_eq!(ycbcr_to_rgb(29, 255, 107), Rgb { r: 0, g: 0, b: 254 });
    }

    #[test]
    fn clamps() {
        assert_eq!(ycbcr_to_rgb(255, 255, 255), Rgb { r: 255, g: 121, b: 255 });
        assert_eq!(ycbcr_to_rgb(0, 0, 0), Rgb { r: 0, g: 135, b: 0 });
    }
}
