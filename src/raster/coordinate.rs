//! Coordinate pair for raster georeferencing

use std::fmt;

use crate::errors::{FormatError, FormatResult};
use crate::io::byte_order::{checked_span, ByteOrder};

/// Size in bytes of an encoded coordinate (two f64 values)
pub const COORDINATE_SIZE: usize = 16;

/// A point in map units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// X coordinate (easting or longitude)
    pub x: f64,
    /// Y coordinate (northing or latitude)
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y }
    }

    /// True when neither component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Decodes an X/Y pair of f64 values at `offset`
    ///
    /// Non-finite components fail with `MalformedCoordinate`, carrying the
    /// raw bytes so the caller can report exactly what was on disk.
    pub fn read(buf: &[u8], offset: usize, order: ByteOrder) -> FormatResult<Self> {
        let span = checked_span(buf.len(), offset, COORDINATE_SIZE)?;
        let handler = order.handler();
        let coordinate = Coordinate {
            x: handler.read_f64(buf, offset)?,
            y: handler.read_f64(buf, offset + 8)?,
        };

        if !coordinate.is_finite() {
            let mut raw = [0u8; COORDINATE_SIZE];
            raw.copy_from_slice(&buf[span]);
            return Err(FormatError::MalformedCoordinate { offset, raw });
        }
        Ok(coordinate)
    }

    /// Encodes this coordinate at `offset`
    pub fn write(&self, buf: &mut [u8], offset: usize, order: ByteOrder) -> FormatResult<()> {
        checked_span(buf.len(), offset, COORDINATE_SIZE)?;
        let handler = order.handler();
        handler.write_f64(buf, offset, self.x)?;
        handler.write_f64(buf, offset + 8, self.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
