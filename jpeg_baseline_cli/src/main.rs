// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use jpeg_baseline::{decode_with_options, DecoderOptions};
use jpeg_baseline_cli::enc::{save_image, OutputFormat};

#[derive(Parser)]
#[command(version, about = "Decodes a baseline JPEG file")]
struct Opt {
    /// Input JPEG file
    input: PathBuf,

    /// Output image file, should end in .ppm, .pgm or .png
    output: PathBuf,

    /// If specified, writes the bytes of the last COM segment
    #[clap(long)]
    comment_out: Option<PathBuf>,

    /// Refuse images with more than this many pixels
    #[clap(long)]
    pixel_limit: Option<usize>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    // Fail on a bad extension before decoding.
    OutputFormat::from_path(&opt.output)?;

    let file = File::open(&opt.input)
        .wrap_err_with(|| format!("Cannot open {}", opt.input.display()))?;
    let options = DecoderOptions {
        pixel_limit: opt.pixel_limit,
    };
    let image = decode_with_options(BufReader::new(file), &options)
        .wrap_err_with(|| format!("Cannot decode {}", opt.input.display()))?;
    println!("Image size: {} x {}", image.width(), image.height());

    save_image(&image, &opt.output)?;

    if let Some(path) = opt.comment_out {
        match image.comment() {
            Some(comment) => std::fs::write(&path, comment)
                .wrap_err_with(|| format!("Cannot write {}", path.display()))?,
            None => eprintln!("No comment found, not writing {}", path.display()),
        }
    }
    Ok(())
}
