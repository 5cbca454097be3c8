// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use jpeg_baseline::Image;

pub mod png;
pub mod pnm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Ppm,
    Pgm,
    Png,
}

impl OutputFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<OutputFormat> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ppm") => Ok(OutputFormat::Ppm),
            Some("pgm") => Ok(OutputFormat::Pgm),
            Some("png") => Ok(OutputFormat::Png),
            _ => Err(eyre!(
                "Unsupported output format for {}, use .ppm, .pgm or .png",
                path.display()
            )),
        }
    }
}

pub fn encode(image: &Image, format: OutputFormat) -> Result<Vec<u8>> {
    Ok(match format {
        OutputFormat::Ppm => pnm::to_ppm(image),
        OutputFormat::Pgm => pnm::to_pgm(image),
        OutputFormat::Png => {
            let mut out = vec![];
            png::to_png(image, &mut out)?;
            out
        }
    })
}

pub fn save_image(image: &Image, path: &Path) -> Result<()> {
    let bytes = encode(image, OutputFormat::from_path(path)?)?;
    std::fs::write(path, bytes).wrap_err_with(|| format!("Cannot write {}", path.display()))
}
