// Copyright (c) the jpeg_baseline Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::byte_cursor::ByteCursor;
use crate::error::{MarkerError, Result};

pub const MARKER_PREFIX: u8 = 0xff;

const APP_FIRST: u8 = 0xe0;
const APP_LAST: u8 = 0xef;

/// Markers understood by the baseline decoder. All APPn codes map to `App`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Marker {
    Sof0 = 0xc0,
    Dht = 0xc4,
    Soi = 0xd8,
    Eoi = 0xd9,
    Sos = 0xda,
    Dqt = 0xdb,
    App = 0xe0,
    Com = 0xfe,
}

impl Marker {
    pub fn from_code(code: u8) -> Result<Marker> {
        let code = if (APP_FIRST..=APP_LAST).contains(&code) {
            APP_FIRST
        } else {
            code
        };
        Ok(Marker::from_u8(code).ok_or(MarkerError::Unknown(code))?)
    }

    /// Reads `0xff` and returns the marker code after it, without mapping it.
    pub fn read_code<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u8> {
        let prefix = cursor.read_u8()?;
        if prefix != MARKER_PREFIX {
            return Err(MarkerError::MissingPrefix(prefix).into());
        }
        Ok(cursor.read_u8()?)
    }

    /// Reads `0xff` followed by a marker code.
    pub fn read<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Marker> {
        Marker::from_code(Marker::read_code(cursor)?)
    }
}
