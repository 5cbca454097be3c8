// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod frame_header;
pub mod huffman_table;
pub mod marker;
pub mod quantization;
pub mod scan_header;
pub mod segment;

pub use frame_header::*;
pub use marker::Marker;
pub use quantization::*;
pub use scan_header::*;
pub use segment::SegmentReader;
