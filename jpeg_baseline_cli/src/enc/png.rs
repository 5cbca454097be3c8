// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::{eyre, Result};
use jpeg_baseline::Image;

/// Writes an 8 bit sRGB PNG.
pub fn to_png<Writer: Write>(image: &Image, buf: &mut Writer) -> Result<()> {
    let (width, height) = image.size();
    let width = u32::try_from(width).map_err(|_| eyre!("Image too wide for PNG: {width}"))?;
    let height = u32::try_from(height).map_err(|_| eyre!("Image too tall for PNG: {height}"))?;
    let mut encoder = png::Encoder::new(buf, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    let mut writer = encoder.write_header()?;
    let data: Vec<u8> = image
        .pixels()
        .iter()
        .flat_map(|p| [p.r, p.g, p.b])
        .collect();
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use jpeg_baseline::{ImageSink, Rgb};

    use super::*;

    #[test]
    fn writes_readable_png() -> Result<()> {
        let mut image = Image::default();
        image.set_size(3, 2)?;
        image.set_pixel(1, 2, Rgb { r: 9, g: 8, b: 7 });
        let mut out = vec![];
        to_png(&image, &mut out)?;
        assert!(out.starts_with(b"\x89PNG\r\n\x1a\n"));
        let reader = png::Decoder::new(std::io::Cursor::new(out)).read_info()?;
        let info = reader.info();
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        Ok(())
    }
}
