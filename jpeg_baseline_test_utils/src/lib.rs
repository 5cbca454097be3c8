// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Synthesizes baseline JPEG byte streams for tests, including deliberately
//! malformed ones.

/// Zigzag scan position -> natural (row-major) index.
pub const ZIGZAG_ORDER: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27,
    20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58,
    59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

pub const DHT_CLASS_DC: u8 = 0;
pub const DHT_CLASS_AC: u8 = 1;

/// DC table where category `c` is coded as the four bits of `c`.
pub const DC_LENGTHS: [u8; 16] = [0, 0, 0, 12, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
pub const DC_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// AC table with one 8 bit code per symbol: EOB, ZRL, then every
/// (run, size) pair with size 1 to 10. A symbol's code is its index.
pub fn ac_values() -> Vec<u8> {
    let mut values = vec![0x00, 0xf0];
    for run in 0..16u8 {
        for size in 1..=10u8 {
            values.push((run << 4) | size);
        }
    }
    values
}

pub fn ac_lengths() -> [u8; 16] {
    let mut lengths = [0u8; 16];
    lengths[7] = ac_values().len() as u8;
    lengths
}

/// Writes bits MSB first, stuffing a zero byte after every `0xff`.
#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u8,
    num_bits: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, value: u32, num_bits: usize) {
        for i in (0..num_bits).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1) as u8;
            self.num_bits += 1;
            if self.num_bits == 8 {
                self.push_byte();
            }
        }
    }

    fn push_byte(&mut self) {
        self.bytes.push(self.acc);
        if self.acc == 0xff {
            self.bytes.push(0x00);
        }
        self.acc = 0;
        self.num_bits = 0;
    }

    /// Pads the last byte with one bits.
    pub fn finish(mut self) -> Vec<u8> {
        if self.num_bits > 0 {
            let pad = 8 - self.num_bits;
            self.write((1 << pad) - 1, pad);
        }
        self.bytes
    }
}

/// Number of bits needed for the magnitude of `value`.
pub fn category(value: i32) -> u32 {
    32 - value.unsigned_abs().leading_zeros()
}

fn magnitude_bits(value: i32, size: u32) -> u32 {
    if value < 0 {
        (value + (1 << size) - 1) as u32
    } else {
        value as u32
    }
}

/// Entropy-codes blocks with [`DC_LENGTHS`] and [`ac_values`].
#[derive(Default)]
pub struct BlockEncoder {
    pub writer: BitWriter,
}

impl BlockEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes one block given its DC difference and its 63 AC coefficients
    /// in zigzag order.
    pub fn encode_block(&mut self, dc_diff: i32, ac: &[i32]) {
        assert!(ac.len() <= 63);
        let size = category(dc_diff);
        self.writer.write(size, 4);
        self.writer.write(magnitude_bits(dc_diff, size), size as usize);

        let ac_codes = ac_values();
        let code = |symbol: u8| ac_codes.iter().position(|&s| s == symbol).unwrap() as u32;
        let last = ac.iter().rposition(|&c| c != 0);
        let mut run = 0;
        for &coefficient in ac.iter().take(last.map_or(0, |l| l + 1)) {
            if coefficient == 0 {
                run += 1;
                continue;
            }
            while run >= 16 {
                self.writer.write(code(0xf0), 8);
                run -= 16;
            }
            let size = category(coefficient);
            self.writer.write(code(((run as u8) << 4) | size as u8), 8);
            self.writer
                .write(magnitude_bits(coefficient, size), size as usize);
            run = 0;
        }
        if last != Some(62) {
            self.writer.write(code(0x00), 8);
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.finish()
    }
}

/// Assembles marker segments into a byte stream.
#[derive(Default)]
pub struct JpegBuilder {
    bytes: Vec<u8>,
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(mut self, code: u8) -> Self {
        self.bytes.extend_from_slice(&[0xff, code]);
        self
    }

    pub fn soi(self) -> Self {
        self.marker(0xd8)
    }

    pub fn eoi(self) -> Self {
        self.marker(0xd9)
    }

    /// Marker followed by a length field that matches `payload`.
    pub fn segment(self, code: u8, payload: &[u8]) -> Self {
        self.segment_with_length(code, (payload.len() + 2) as u16, payload)
    }

    pub fn segment_with_length(mut self, code: u8, length: u16, payload: &[u8]) -> Self {
        self = self.marker(code);
        self.bytes.extend_from_slice(&length.to_be_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn com(self, text: &[u8]) -> Self {
        self.segment(0xfe, text)
    }

    pub fn app(self, n: u8, payload: &[u8]) -> Self {
        self.segment(0xe0 + n, payload)
    }

    /// 8 bit table, entries in zigzag order.
    pub fn dqt(self, id: u8, zigzag_values: &[u8; 64]) -> Self {
        let mut payload = vec![id];
        payload.extend_from_slice(zigzag_values);
        self.segment(0xdb, &payload)
    }

    pub fn dht(self, class: u8, id: u8, lengths: &[u8; 16], values: &[u8]) -> Self {
        let mut payload = vec![(class << 4) | id];
        payload.extend_from_slice(lengths);
        payload.extend_from_slice(values);
        self.segment(0xc4, &payload)
    }

    /// DC and AC tables of the [`BlockEncoder`] under id 0.
    pub fn simple_tables(self) -> Self {
        self.dht(DHT_CLASS_DC, 0, &DC_LENGTHS, &DC_VALUES)
            .dht(DHT_CLASS_AC, 0, &ac_lengths(), &ac_values())
    }

    /// `components` holds `(id, h, v, quant_table)`.
    pub fn sof0(self, width: u16, height: u16, components: &[(u8, u8, u8, u8)]) -> Self {
        let mut payload = vec![8];
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&width.to_be_bytes());
        payload.push(components.len() as u8);
        for &(id, h, v, tq) in components {
            payload.extend_from_slice(&[id, (h << 4) | v, tq]);
        }
        self.segment(0xc0, &payload)
    }

    /// `components` holds `(id, dc_table, ac_table)`.
    pub fn sos(self, components: &[(u8, u8, u8)]) -> Self {
        let mut payload = vec![components.len() as u8];
        for &(id, dc, ac) in components {
            payload.extend_from_slice(&[id, (dc << 4) | ac]);
        }
        payload.extend_from_slice(&[0x00, 0x3f, 0x00]);
        self.segment(0xda, &payload)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A complete grayscale image whose blocks are described by DC differences
/// and zigzag AC coefficients, quantized with all-ones.
pub fn grayscale_jpeg(width: u16, height: u16, blocks: &[(i32, Vec<i32>)]) -> Vec<u8> {
    let mut encoder = BlockEncoder::new();
    for (dc, ac) in blocks {
        encoder.encode_block(*dc, ac);
    }
    JpegBuilder::new()
        .soi()
        .dqt(0, &[1; 64])
        .simple_tables()
        .sof0(width, height, &[(1, 1, 1, 0)])
        .sos(&[(1, 0, 0)])
        .raw(&encoder.finish())
        .eoi()
        .build()
}
