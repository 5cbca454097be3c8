// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Marker error: {0}")]
    Marker(#[from] MarkerError),
    #[error("Segment size mismatch: declared length {declared}, consumed {consumed}")]
    SegmentSize { declared: usize, consumed: usize },
    #[error("Invalid frame header: {0}")]
    FrameHeader(#[from] FrameHeaderError),
    #[error("Invalid scan header: {0}")]
    ScanHeader(#[from] ScanHeaderError),
    #[error("Invalid quantization table: {0}")]
    QuantTable(#[from] QuantTableError),
    #[error("Invalid Huffman table: {0}")]
    HuffmanTable(#[from] HuffmanError),
    #[error("Entropy-coded data exhausted after {0} bits")]
    BitstreamUnderflow(usize),
    #[error("Unexpected end of input")]
    EndOfInput,
    #[error("Read failure: {0}")]
    Io(std::io::Error),
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(usize, usize),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MarkerError {
    #[error("Expected marker prefix 0xff, found {0:#04x}")]
    MissingPrefix(u8),
    #[error("Unknown marker {0:#04x}")]
    Unknown(u8),
    #[error("Expected SOI, found {0:#04x}")]
    ExpectedSoi(u8),
    #[error("Expected EOI, found {0:#04x}")]
    ExpectedEoi(u8),
    #[error("SOI is only allowed at the start of the image")]
    MisplacedSoi,
    #[error("EOI before the scan")]
    MisplacedEoi,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameHeaderError {
    #[error("Duplicate SOF0 segment")]
    Duplicate,
    #[error("Unsupported sample precision {0}, only 8 bits are supported")]
    Precision(u8),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(u16, u16),
    #[error("Image size {0}x{1} exceeds the pixel limit {2}")]
    PixelLimitExceeded(u16, u16, usize),
    #[error("Invalid number of components: {0}")]
    ComponentCount(u8),
    #[error("Invalid sampling factors {h}x{v} for component {id}")]
    SamplingFactors { id: u8, h: u8, v: u8 },
    #[error("Duplicate component id {0}")]
    DuplicateComponent(u8),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScanHeaderError {
    #[error("SOS before SOF0")]
    MissingFrameHeader,
    #[error("Scan has {scan} components, frame has {frame}")]
    ComponentCount { scan: u8, frame: usize },
    #[error("Scan references unknown component {0}")]
    UnknownComponent(u8),
    #[error("Component {0} appears twice in the scan")]
    DuplicateComponent(u8),
    #[error("Invalid Huffman table ids dc={dc} ac={ac}")]
    TableId { dc: u8, ac: u8 },
    #[error("Non-baseline spectral selection ({0}, {1}, {2})")]
    SpectralSelection(u8, u8, u8),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuantTableError {
    #[error("Invalid precision flag {0}")]
    Precision(u8),
    #[error("Invalid table id {0}")]
    Id(u8),
    #[error("Quantization table {0} is not defined")]
    Undefined(u8),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HuffmanError {
    #[error("Too many code lengths: {0}, max is 16")]
    TooManyLengths(usize),
    #[error("Ran out of values while assigning codes of length {0}")]
    ValuesExhausted(usize),
    #[error("Code lengths of size {0} could not all be assigned")]
    Unsatisfied(usize),
    #[error("Bit sequence does not match any code")]
    InvalidCode,
    #[error("Invalid table class {0}")]
    InvalidClass(u8),
    #[error("Invalid table id {0}")]
    InvalidId(u8),
    #[error("{class:?} table {id} is not defined")]
    Undefined {
        class: crate::entropy_coding::huffman::TableClass,
        id: u8,
    },
    #[error("Invalid DC magnitude category {0}")]
    DcCategory(u8),
    #[error("AC run moves past the end of the block")]
    CoefficientOverflow,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::EndOfInput
        } else {
            Error::Io(err)
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
