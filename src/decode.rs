// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::bit_reader::BitStream;
use crate::byte_cursor::ByteCursor;
use crate::entropy_coding::decode::DecodeContext;
use crate::entropy_coding::huffman::HuffmanTables;
use crate::error::{FrameHeaderError, MarkerError, Result, ScanHeaderError};
use crate::headers::{
    FrameHeader, Marker, QuantizationTable, QuantizationTables, ScanHeader, SegmentReader,
};
use crate::image::{Image, ImageSink};
use crate::render::{gray_to_rgb, ycbcr_to_rgb, McuSamples};
use crate::util::tracing_wrappers::*;
use crate::var_dct::InverseDct;
use crate::BLOCK_SIZE;

const LEVEL_SHIFT: f64 = 128.0;

#[derive(Debug, Clone, Default)]
pub struct DecoderOptions {
    /// Largest accepted `width * height`. Frames above it are rejected before
    /// any pixel is produced.
    pub pixel_limit: Option<usize>,
}

#[derive(Debug)]
enum DecoderState {
    ExpectSoi,
    HeaderSegments,
    Scan(ScanHeader),
    ExpectEoi,
    Done,
}

/// Marker-driven decoder for a single baseline image.
pub struct Decoder<'a, R, S: ?Sized> {
    cursor: ByteCursor<R>,
    options: &'a DecoderOptions,
    sink: &'a mut S,
    quant_tables: QuantizationTables,
    huffman_tables: HuffmanTables,
    frame: Option<FrameHeader>,
    idct: InverseDct,
}

impl<'a, R: Read, S: ImageSink + ?Sized> Decoder<'a, R, S> {
    pub fn new(reader: R, options: &'a DecoderOptions, sink: &'a mut S) -> Self {
        Decoder {
            cursor: ByteCursor::new(reader),
            options,
            sink,
            quant_tables: QuantizationTables::default(),
            huffman_tables: HuffmanTables::new(),
            frame: None,
            idct: InverseDct::new(),
        }
    }

    /// Decodes from SOI up to and including EOI.
    pub fn run(mut self) -> Result<()> {
        let mut state = DecoderState::ExpectSoi;
        loop {
            state = match state {
                DecoderState::ExpectSoi => {
                    let code = Marker::read_code(&mut self.cursor)?;
                    if code != Marker::Soi as u8 {
                        return Err(MarkerError::ExpectedSoi(code).into());
                    }
                    DecoderState::HeaderSegments
                }
                DecoderState::HeaderSegments => self.read_segment()?,
                DecoderState::Scan(scan) => {
                    self.decode_scan(&scan)?;
                    DecoderState::ExpectEoi
                }
                DecoderState::ExpectEoi => {
                    let code = Marker::read_code(&mut self.cursor)?;
                    if code != Marker::Eoi as u8 {
                        return Err(MarkerError::ExpectedEoi(code).into());
                    }
                    DecoderState::Done
                }
                DecoderState::Done => {
                    debug!(bytes = self.cursor.position(), "decoded image");
                    return Ok(());
                }
            }
        }
    }

    fn read_segment(&mut self) -> Result<DecoderState> {
        let marker = Marker::read(&mut self.cursor)?;
        trace!(?marker, offset = self.cursor.position(), "marker");
        match marker {
            Marker::Soi => Err(MarkerError::MisplacedSoi.into()),
            Marker::Eoi => Err(MarkerError::MisplacedEoi.into()),
            Marker::Com => self.read_comment(),
            Marker::App => self.skip_application_data(),
            Marker::Dqt => self.read_quantization_tables(),
            Marker::Dht => self.read_huffman_tables(),
            Marker::Sof0 => self.read_frame_header(),
            Marker::Sos => self.read_scan_header(),
        }
    }

    fn read_comment(&mut self) -> Result<DecoderState> {
        let mut segment = SegmentReader::new(&mut self.cursor)?;
        let comment = segment.read_bytes(segment.remaining())?;
        segment.finish()?;
        debug!(len = comment.len(), "comment");
        self.sink.set_comment(&comment);
        Ok(DecoderState::HeaderSegments)
    }

    fn skip_application_data(&mut self) -> Result<DecoderState> {
        let mut segment = SegmentReader::new(&mut self.cursor)?;
        debug!(len = segment.payload_len(), "skipping application segment");
        segment.skip_remaining()?;
        segment.finish()?;
        Ok(DecoderState::HeaderSegments)
    }

    fn read_quantization_tables(&mut self) -> Result<DecoderState> {
        let mut segment = SegmentReader::new(&mut self.cursor)?;
        self.quant_tables.read_segment(&mut segment)?;
        segment.finish()?;
        Ok(DecoderState::HeaderSegments)
    }

    fn read_huffman_tables(&mut self) -> Result<DecoderState> {
        let mut segment = SegmentReader::new(&mut self.cursor)?;
        self.huffman_tables.read_segment(&mut segment)?;
        segment.finish()?;
        Ok(DecoderState::HeaderSegments)
    }

    fn read_frame_header(&mut self) -> Result<DecoderState> {
        if self.frame.is_some() {
            return Err(FrameHeaderError::Duplicate.into());
        }
        let mut segment = SegmentReader::new(&mut self.cursor)?;
        let frame = FrameHeader::read(&mut segment)?;
        segment.finish()?;
        let (width, height) = (frame.width as usize, frame.height as usize);
        if let Some(limit) = self.options.pixel_limit {
            if width * height > limit {
                return Err(
                    FrameHeaderError::PixelLimitExceeded(frame.width, frame.height, limit).into(),
                );
            }
        }
        self.sink.set_size(width, height)?;
        self.frame = Some(frame);
        Ok(DecoderState::HeaderSegments)
    }

    fn read_scan_header(&mut self) -> Result<DecoderState> {
        let frame = self
            .frame
            .as_ref()
            .ok_or(ScanHeaderError::MissingFrameHeader)?;
        let mut segment = SegmentReader::new(&mut self.cursor)?;
        let scan = ScanHeader::read(&mut segment, frame)?;
        segment.finish()?;
        Ok(DecoderState::Scan(scan))
    }

    fn decode_scan(&mut self, scan: &ScanHeader) -> Result<()> {
        let Decoder {
            cursor,
            sink,
            quant_tables,
            huffman_tables,
            frame,
            idct,
            ..
        } = self;
        let frame = frame.as_ref().ok_or(ScanHeaderError::MissingFrameHeader)?;

        let mut bits = BitStream::consume_entropy_segment(cursor)?;
        let mut context = DecodeContext::new(frame.components.len());
        let mut mcu: Vec<McuSamples> = frame
            .components
            .iter()
            .map(|c| McuSamples::new(c.h_samp, c.v_samp))
            .collect();
        let (mcus_x, mcus_y) = frame.mcu_grid();
        let (mcu_width, mcu_height) = (frame.mcu_width(), frame.mcu_height());
        let (width, height) = (frame.width as usize, frame.height as usize);
        debug!(mcus_x, mcus_y, mcu_width, mcu_height, "decoding scan");

        let mut coefficients = [0i32; BLOCK_SIZE];
        let mut samples = [0u8; BLOCK_SIZE];
        for mcu_y in 0..mcus_y {
            for mcu_x in 0..mcus_x {
                for info in scan.components.iter() {
                    let component = &frame.components[info.component];
                    let quant = quant_tables.get(component.quant_table)?;
                    for block_y in 0..component.v_samp as usize {
                        for block_x in 0..component.h_samp as usize {
                            context.decode_block(
                                &mut bits,
                                huffman_tables,
                                info,
                                &mut coefficients,
                            )?;
                            reconstruct_block(idct, quant, &coefficients, &mut samples);
                            mcu[info.component].store_block(block_x, block_y, &samples);
                        }
                    }
                }
                trace!(mcu_x, mcu_y, bits_left = bits.bits_remaining(), "decoded MCU");

                let top = mcu_y * mcu_height;
                let left = mcu_x * mcu_width;
                for y in 0..mcu_height.min(height - top) {
                    for x in 0..mcu_width.min(width - left) {
                        let sample = |c: usize| {
                            mcu[c].sample_at(x, y, frame.max_h_samp, frame.max_v_samp)
                        };
                        let pixel = if frame.is_grayscale() {
                            gray_to_rgb(sample(0))
                        } else {
                            ycbcr_to_rgb(sample(0), sample(1), sample(2))
                        };
                        sink.set_pixel(top + y, left + x, pixel);
                    }
                }
            }
        }
        if bits.bits_remaining() >= 8 {
            warn!(
                bits_left = bits.bits_remaining(),
                "unused entropy-coded data after last MCU"
            );
        }
        Ok(())
    }
}

/// Dequantizes, inverse transforms and level shifts one block.
fn reconstruct_block(
    idct: &InverseDct,
    quant: &QuantizationTable,
    coefficients: &[i32; BLOCK_SIZE],
    out: &mut [u8; BLOCK_SIZE],
) {
    let dequantized: [f64; BLOCK_SIZE] =
        array_init::array_init(|i| coefficients[i] as f64 * quant.values[i] as f64);
    let mut spatial = [0.0; BLOCK_SIZE];
    idct.transform(&dequantized, &mut spatial);
    for (out, value) in out.iter_mut().zip(spatial.iter()) {
        *out = (value + LEVEL_SHIFT).round().clamp(0.0, 255.0) as u8;
    }
}

/// Decodes a baseline JPEG into an in-memory RGB image.
pub fn decode<R: Read>(reader: R) -> Result<Image> {
    decode_with_options(reader, &DecoderOptions::default())
}

pub fn decode_with_options<R: Read>(reader: R, options: &DecoderOptions) -> Result<Image> {
    let mut image = Image::default();
    decode_into(reader, options, &mut image)?;
    Ok(image)
}

/// Decodes a baseline JPEG, sending the frame size, pixels and comments to
/// `sink` as they become available.
pub fn decode_into<R: Read, S: ImageSink + ?Sized>(
    reader: R,
    options: &DecoderOptions,
    sink: &mut S,
) -> Result<()> {
    Decoder::new(reader, options, sink).run()
}

#[cfg(test)]
mod test {
    use jpeg_baseline_test_utils::{grayscale_jpeg, BlockEncoder, JpegBuilder, ZIGZAG_ORDER};
    use test_log::test;

    use super::*;
    use crate::error::{Error, HuffmanError, QuantTableError};
    use crate::image::Rgb;
    use crate::var_dct::dct_slow;

    #[derive(Default)]
    struct RecordingSink {
        sizes: Vec<(usize, usize)>,
        pixels: Vec<(usize, usize, Rgb)>,
        comments: Vec<Vec<u8>>,
    }

    impl ImageSink for RecordingSink {
        fn set_size(&mut self, width: usize, height: usize) -> Result<()> {
            self.sizes.push((width, height));
            Ok(())
        }

        fn set_pixel(&mut self, row: usize, col: usize, pixel: Rgb) {
            self.pixels.push((row, col, pixel));
        }

        fn set_comment(&mut self, comment: &[u8]) {
            self.comments.push(comment.to_vec());
        }
    }

    fn record(data: &[u8]) -> Result<RecordingSink> {
        let mut sink = RecordingSink::default();
        decode_into(data, &DecoderOptions::default(), &mut sink)?;
        Ok(sink)
    }

    fn gray(value: u8) -> Rgb {
        Rgb {
            r: value,
            g: value,
            b: value,
        }
    }

    /// A 3 component image with every block coded as zero.
    fn flat_ycbcr(width: u16, height: u16, sampling: [(u8, u8); 3]) -> Vec<u8> {
        let (h_max, v_max) = (
            sampling.iter().map(|s| s.0).max().unwrap() as usize,
            sampling.iter().map(|s| s.1).max().unwrap() as usize,
        );
        let mcus = (width as usize).div_ceil(8 * h_max) * (height as usize).div_ceil(8 * v_max);
        let blocks_per_mcu: usize = sampling.iter().map(|&(h, v)| (h * v) as usize).sum();
        let mut encoder = BlockEncoder::new();
        for _ in 0..mcus * blocks_per_mcu {
            encoder.encode_block(0, &[]);
        }
        JpegBuilder::new()
            .soi()
            .dqt(0, &[1; 64])
            .simple_tables()
            .sof0(
                width,
                height,
                &[
                    (1, sampling[0].0, sampling[0].1, 0),
                    (2, sampling[1].0, sampling[1].1, 0),
                    (3, sampling[2].0, sampling[2].1, 0),
                ],
            )
            .sos(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)])
            .raw(&encoder.finish())
            .eoi()
            .build()
    }

    #[test]
    fn zero_dc_is_mid_gray() -> Result<()> {
        let image = decode(&grayscale_jpeg(8, 8, &[(0, vec![])])[..])?;
        assert_eq!(image.size(), (8, 8));
        assert!(image.pixels().iter().all(|&p| p == gray(128)));
        Ok(())
    }

    #[test]
    fn dc_only_block_is_flat() -> Result<()> {
        // F[0][0] / 8 is added to every sample.
        let image = decode(&grayscale_jpeg(8, 8, &[(80, vec![])])[..])?;
        assert!(image.pixels().iter().all(|&p| p == gray(138)));
        Ok(())
    }

    #[test]
    fn dc_prediction_spans_blocks() -> Result<()> {
        let image = decode(&grayscale_jpeg(24, 8, &[(80, vec![]), (-160, vec![]), (80, vec![])])[..])?;
        assert_eq!(image.pixel(3, 2), gray(138));
        assert_eq!(image.pixel(3, 10), gray(118));
        assert_eq!(image.pixel(7, 23), gray(128));
        Ok(())
    }

    #[test]
    fn ac_coefficients_match_reference_transform() -> Result<()> {
        let mut ac = vec![0; 63];
        ac[0] = 40;
        ac[1] = -25;
        ac[5] = 12;
        ac[30] = -7;
        let image = decode(&grayscale_jpeg(8, 8, &[(64, ac.clone())])[..])?;

        let mut coefficients = [0.0; BLOCK_SIZE];
        coefficients[0] = 64.0;
        for (k, &c) in ac.iter().enumerate() {
            coefficients[ZIGZAG_ORDER[k + 1]] = c as f64;
        }
        let spatial = dct_slow::idct2d(&coefficients);
        for row in 0..8 {
            for col in 0..8 {
                let expected = (spatial[row * 8 + col] + 128.0).clamp(0.0, 255.0);
                let got = image.pixel(row, col);
                assert_eq!((got.r, got.g), (got.b, got.b));
                assert!(
                    (got.r as f64 - expected).abs() <= 0.5 + 1e-9,
                    "({row}, {col}): {} vs {expected}",
                    got.r
                );
            }
        }
        Ok(())
    }

    #[test]
    fn stuffed_scan_bytes() -> Result<()> {
        // The second block starts 4 bits into a byte; its category 11 code
        // and all-ones magnitude fill the following byte with 0xff.
        let data = grayscale_jpeg(16, 8, &[(0, vec![]), (2047, vec![])]);
        assert!(data.windows(2).any(|w| w == [0xff, 0x00]));
        let image = decode(&data[..])?;
        assert_eq!(image.pixel(0, 0), gray(128));
        assert_eq!(image.pixel(7, 15), gray(255));
        Ok(())
    }

    #[test]
    fn subsampled_partial_mcus_stay_in_bounds() -> Result<()> {
        let data = flat_ycbcr(20, 20, [(2, 2), (1, 1), (1, 1)]);
        let sink = record(&data)?;
        assert_eq!(sink.sizes, [(20, 20)]);
        assert_eq!(sink.pixels.len(), 400);
        let mut seen = vec![false; 400];
        for &(row, col, pixel) in &sink.pixels {
            assert!(row < 20 && col < 20);
            assert!(!seen[row * 20 + col]);
            seen[row * 20 + col] = true;
            assert_eq!(pixel, gray(128));
        }
        Ok(())
    }

    #[test]
    fn odd_sampling_layouts() -> Result<()> {
        for (sampling, width, height) in [
            ([(1, 1), (1, 1), (1, 1)], 9, 17),
            ([(2, 1), (1, 1), (1, 1)], 33, 7),
            ([(1, 2), (1, 1), (1, 1)], 5, 40),
            ([(4, 1), (2, 1), (1, 1)], 50, 3),
        ] {
            let sink = record(&flat_ycbcr(width, height, sampling))?;
            assert_eq!(sink.pixels.len(), width as usize * height as usize);
        }
        Ok(())
    }

    #[test]
    fn chroma_shifts_color() -> Result<()> {
        // One MCU of Y, Cb, Cr at full resolution, with Cr raised by 50.
        let mut encoder = BlockEncoder::new();
        encoder.encode_block(0, &[]);
        encoder.encode_block(0, &[]);
        encoder.encode_block(400, &[]);
        let data = JpegBuilder::new()
            .soi()
            .dqt(0, &[1; 64])
            .simple_tables()
            .sof0(8, 8, &[(1, 1, 1, 0), (2, 1, 1, 0), (3, 1, 1, 0)])
            .sos(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)])
            .raw(&encoder.finish())
            .eoi()
            .build();
        let image = decode(&data[..])?;
        assert!(image
            .pixels()
            .iter()
            .all(|&p| p == Rgb { r: 198, g: 92, b: 128 }));
        Ok(())
    }

    #[test]
    fn scan_order_differs_from_frame_order() -> Result<()> {
        // Blocks arrive as Cr, Y, Cb but color conversion still uses frame order.
        let mut encoder = BlockEncoder::new();
        encoder.encode_block(400, &[]);
        encoder.encode_block(0, &[]);
        encoder.encode_block(0, &[]);
        let data = JpegBuilder::new()
            .soi()
            .dqt(0, &[1; 64])
            .simple_tables()
            .sof0(8, 8, &[(1, 1, 1, 0), (2, 1, 1, 0), (3, 1, 1, 0)])
            .sos(&[(3, 0, 0), (1, 0, 0), (2, 0, 0)])
            .raw(&encoder.finish())
            .eoi()
            .build();
        let image = decode(&data[..])?;
        assert_eq!(image.pixel(4, 4), Rgb { r: 198, g: 92, b: 128 });
        Ok(())
    }

    #[test]
    fn comments_and_app_segments() -> Result<()> {
        let mut encoder = BlockEncoder::new();
        encoder.encode_block(0, &[]);
        let data = JpegBuilder::new()
            .soi()
            .app(0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0")
            .com(b"first")
            .dqt(0, &[1; 64])
            .app(14, b"Adobe")
            .simple_tables()
            .com(b"")
            .sof0(8, 8, &[(1, 1, 1, 0)])
            .sos(&[(1, 0, 0)])
            .raw(&encoder.finish())
            .eoi()
            .build();
        let sink = record(&data)?;
        assert_eq!(sink.comments, [b"first".to_vec(), vec![]]);
        assert_eq!(decode(&data[..])?.comment(), Some(&b""[..]));
        Ok(())
    }

    #[test]
    fn sixteen_bit_quantization() -> Result<()> {
        let mut payload = vec![0x10];
        for _ in 0..64 {
            payload.extend_from_slice(&[0x01, 0x00]);
        }
        let mut encoder = BlockEncoder::new();
        encoder.encode_block(-1, &[]);
        let data = JpegBuilder::new()
            .soi()
            .segment(0xdb, &payload)
            .simple_tables()
            .sof0(8, 8, &[(1, 1, 1, 0)])
            .sos(&[(1, 0, 0)])
            .raw(&encoder.finish())
            .eoi()
            .build();
        // -1 * 256 / 8 = -32.
        let image = decode(&data[..])?;
        assert!(image.pixels().iter().all(|&p| p == gray(96)));
        Ok(())
    }

    fn header_prefix() -> JpegBuilder {
        JpegBuilder::new().soi().dqt(0, &[1; 64]).simple_tables()
    }

    fn decode_err(data: &[u8]) -> Error {
        match record(data) {
            Ok(_) => panic!("decoding succeeded"),
            Err(err) => err,
        }
    }

    #[test]
    fn quantization_precision_two_fails_before_frame() {
        let mut payload = vec![0x20];
        payload.extend_from_slice(&[1; 64]);
        let data = JpegBuilder::new()
            .soi()
            .segment(0xdb, &payload)
            .sof0(8, 8, &[(1, 1, 1, 0)])
            .build();
        let mut sink = RecordingSink::default();
        let err = decode_into(&data[..], &DecoderOptions::default(), &mut sink).unwrap_err();
        assert!(matches!(
            err,
            Error::QuantTable(QuantTableError::Precision(2))
        ));
        assert!(sink.sizes.is_empty());
    }

    #[test]
    fn must_start_with_soi() {
        assert!(matches!(
            decode_err(&JpegBuilder::new().com(b"x").build()),
            Error::Marker(MarkerError::ExpectedSoi(0xfe))
        ));
        // APPn codes are reported as read, not as APP0.
        assert!(matches!(
            decode_err(&JpegBuilder::new().app(1, b"Exif").build()),
            Error::Marker(MarkerError::ExpectedSoi(0xe1))
        ));
        assert!(matches!(
            decode_err(&[0x00, 0xd8]),
            Error::Marker(MarkerError::MissingPrefix(0x00))
        ));
        assert!(matches!(decode_err(&[]), Error::EndOfInput));
    }

    #[test]
    fn misplaced_markers() {
        assert!(matches!(
            decode_err(&header_prefix().soi().build()),
            Error::Marker(MarkerError::MisplacedSoi)
        ));
        assert!(matches!(
            decode_err(&header_prefix().eoi().build()),
            Error::Marker(MarkerError::MisplacedEoi)
        ));
        assert!(matches!(
            decode_err(&header_prefix().marker(0xc2).build()),
            Error::Marker(MarkerError::Unknown(0xc2))
        ));
        assert!(matches!(
            decode_err(&header_prefix().raw(&[0x12, 0x34]).build()),
            Error::Marker(MarkerError::MissingPrefix(0x12))
        ));
    }

    #[test]
    fn scan_requires_frame() {
        assert!(matches!(
            decode_err(&header_prefix().sos(&[(1, 0, 0)]).build()),
            Error::ScanHeader(ScanHeaderError::MissingFrameHeader)
        ));
    }

    #[test]
    fn duplicate_frame_header() {
        let data = header_prefix()
            .sof0(8, 8, &[(1, 1, 1, 0)])
            .sof0(8, 8, &[(1, 1, 1, 0)])
            .build();
        assert!(matches!(
            decode_err(&data),
            Error::FrameHeader(FrameHeaderError::Duplicate)
        ));
    }

    #[test]
    fn pixel_limit() {
        let data = grayscale_jpeg(16, 8, &[(0, vec![]), (0, vec![])]);
        let limited = DecoderOptions {
            pixel_limit: Some(127),
        };
        assert!(matches!(
            decode_with_options(&data[..], &limited),
            Err(Error::FrameHeader(FrameHeaderError::PixelLimitExceeded(
                16, 8, 127
            )))
        ));
        let exact = DecoderOptions {
            pixel_limit: Some(128),
        };
        assert!(decode_with_options(&data[..], &exact).is_ok());
    }

    #[test]
    fn huge_frame_with_little_data_fails_cleanly() {
        let mut encoder = BlockEncoder::new();
        for _ in 0..4 {
            encoder.encode_block(0, &[]);
        }
        let scan_data = encoder.finish();
        let huge = || {
            header_prefix()
                .sof0(65535, 65535, &[(1, 1, 1, 0)])
                .sos(&[(1, 0, 0)])
                .raw(&scan_data)
        };
        // No pixel limit: the size is accepted, the data is not.
        let unterminated = huge().build();
        assert!(decode(&unterminated[..]).is_err());
        let terminated = huge().eoi().build();
        assert!(decode(&terminated[..]).is_err());
    }

    #[test]
    fn undefined_tables_fail_in_scan() {
        let mut encoder = BlockEncoder::new();
        encoder.encode_block(0, &[]);
        let scan_data = encoder.finish();
        let missing_quant = header_prefix()
            .sof0(8, 8, &[(1, 1, 1, 1)])
            .sos(&[(1, 0, 0)])
            .raw(&scan_data)
            .eoi()
            .build();
        assert!(matches!(
            decode_err(&missing_quant),
            Error::QuantTable(QuantTableError::Undefined(1))
        ));
        let missing_huffman = header_prefix()
            .sof0(8, 8, &[(1, 1, 1, 0)])
            .sos(&[(1, 1, 0)])
            .raw(&scan_data)
            .eoi()
            .build();
        assert!(matches!(
            decode_err(&missing_huffman),
            Error::HuffmanTable(HuffmanError::Undefined { id: 1, .. })
        ));
    }

    #[test]
    fn segment_length_mismatch() {
        let mut payload = vec![0x00];
        payload.extend_from_slice(&[1; 64]);
        payload.push(0x00);
        let data = JpegBuilder::new()
            .soi()
            .segment_with_length(0xdb, 68, &payload)
            .build();
        // The extra byte starts another table whose entries run past the end.
        assert!(matches!(decode_err(&data), Error::SegmentSize { .. }));

        let data = JpegBuilder::new()
            .soi()
            .segment_with_length(0xfe, 1, &[])
            .build();
        assert!(matches!(
            decode_err(&data),
            Error::SegmentSize {
                declared: 1,
                consumed: 2
            }
        ));
    }

    #[test]
    fn truncated_inputs() {
        let data = grayscale_jpeg(8, 8, &[(0, vec![])]);
        // Cut inside the DQT payload.
        assert!(matches!(decode_err(&data[..30]), Error::EndOfInput));
        // Scan data without a terminating marker.
        assert!(matches!(
            decode_err(&data[..data.len() - 2]),
            Error::EndOfInput
        ));
        // Too few bits for the declared blocks.
        let short = grayscale_jpeg(16, 8, &[(0, vec![])]);
        assert!(matches!(
            decode_err(&short),
            Error::BitstreamUnderflow(_)
        ));
    }

    #[test]
    fn scan_must_end_with_eoi() {
        let mut data = grayscale_jpeg(8, 8, &[(0, vec![])]);
        let len = data.len();
        data[len - 1] = 0xd8;
        assert!(matches!(
            decode_err(&data),
            Error::Marker(MarkerError::ExpectedEoi(0xd8))
        ));
    }

    #[test]
    fn arbitrary_blocks_stay_in_range() {
        arbtest::arbtest(|u| {
            let width = u.int_in_range(1..=24u16)?;
            let height = u.int_in_range(1..=24u16)?;
            let blocks = (width as usize).div_ceil(8) * (height as usize).div_ceil(8);
            let mut content = Vec::with_capacity(blocks);
            let mut dc = 0i32;
            for _ in 0..blocks {
                let target = u.int_in_range(-1023..=1023)?;
                let mut ac = vec![0; 63];
                for _ in 0..u.int_in_range(0..=6)? {
                    let k = u.int_in_range(0..=62usize)?;
                    ac[k] = u.int_in_range(-1023..=1023)?;
                }
                content.push((target - dc, ac));
                dc = target;
            }
            let sink = record(&grayscale_jpeg(width, height, &content)).unwrap();
            assert_eq!(sink.pixels.len(), width as usize * height as usize);
            for (row, col, _) in sink.pixels {
                assert!(row < height as usize && col < width as usize);
            }
            Ok(())
        });
    }

    #[test]
    fn corrupted_streams_never_panic() {
        arbtest::arbtest(|u| {
            let width = u.int_in_range(1..=40u16)?;
            let height = u.int_in_range(1..=40u16)?;
            let mut data = if u.arbitrary()? {
                let blocks = (width as usize).div_ceil(8) * (height as usize).div_ceil(8);
                let mut content = Vec::with_capacity(blocks);
                for _ in 0..blocks {
                    let mut ac = vec![0; 63];
                    for _ in 0..u.int_in_range(0..=3)? {
                        let k = u.int_in_range(0..=62usize)?;
                        ac[k] = u.int_in_range(-255..=255)?;
                    }
                    content.push((u.int_in_range(-255..=255)?, ac));
                }
                grayscale_jpeg(width, height, &content)
            } else {
                flat_ycbcr(width, height, [(2, 2), (1, 1), (1, 1)])
            };
            for _ in 0..u.int_in_range(0..=4)? {
                let index = u.choose_index(data.len())?;
                data[index] = u.arbitrary()?;
            }
            if u.arbitrary()? {
                let len = u.int_in_range(0..=data.len())?;
                data.truncate(len);
            }
            if let Ok(image) = decode(&data[..]) {
                assert_eq!(image.pixels().len(), image.width() * image.height());
            }
            Ok(())
        });
    }
}
