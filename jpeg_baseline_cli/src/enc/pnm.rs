// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use jpeg_baseline::Image;

fn header(magic: &str, image: &Image) -> Vec<u8> {
    format!("{magic}\n{} {}\n255\n", image.width(), image.height()).into_bytes()
}

/// Binary P6, 8 bits per channel.
pub fn to_ppm(image: &Image) -> Vec<u8> {
    let mut ret = header("P6", image);
    ret.extend(image.pixels().iter().flat_map(|p| [p.r, p.g, p.b]));
    ret
}

/// Binary P5 holding the luma of each pixel.
pub fn to_pgm(image: &Image) -> Vec<u8> {
    let mut ret = header("P5", image);
    ret.extend(image.pixels().iter().map(|p| p.luma()));
    ret
}
