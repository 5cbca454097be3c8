// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// BT.601 luma, used when writing grayscale output.
    pub fn luma(self) -> u8 {
        let y = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        y.round().clamp(0.0, 255.0) as u8
    }
}

/// Destination of decoded image data.
///
/// `set_size` is called once, when the frame header has been read and before
/// any pixel. An error from `set_size` aborts decoding. `set_pixel` is only
/// called with in-bounds positions.
pub trait ImageSink {
    fn set_size(&mut self, width: usize, height: usize) -> Result<()>;
    fn set_pixel(&mut self, row: usize, col: usize, pixel: Rgb);
    fn set_comment(&mut self, comment: &[u8]);
}

/// In-memory RGB raster.
///
/// `set_size` only reserves the buffer. Rows are filled in as `set_pixel`
/// reaches them, so a frame header claiming a huge size costs no more than
/// the scan data that backs it. `pixel` and `pixels` cover the rows reached
/// so far, which is every row once decoding succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    comment: Option<Vec<u8>>,
}

impl Image {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel(&self, row: usize, col: usize) -> Rgb {
        self.pixels[row * self.width + col]
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Contents of the last COM segment, if any.
    pub fn comment(&self) -> Option<&[u8]> {
        self.comment.as_deref()
    }
}

impl ImageSink for Image {
    fn set_size(&mut self, width: usize, height: usize) -> Result<()> {
        let total = width
            .checked_mul(height)
            .ok_or(Error::ImageSizeTooLarge(width, height))?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(total)?;
        self.width = width;
        self.height = height;
        self.pixels = pixels;
        Ok(())
    }

    fn set_pixel(&mut self, row: usize, col: usize, pixel: Rgb) {
        debug_assert!(row < self.height && col < self.width);
        let index = row * self.width + col;
        if index >= self.pixels.len() {
            // Within the capacity reserved by `set_size`.
            self.pixels.resize((row + 1) * self.width, Rgb::default());
        }
        self.pixels[index] = pixel;
    }

    fn set_comment(&mut self, comment: &[u8]) {
        self.comment = Some(comment.to_vec());
    }
}
