//! Byte order handling for binary GIS records
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when decoding fixed-width
//! scalars from a borrowed buffer. Shapefile headers mix both orders in a
//! single record, so the order is chosen per call rather than per file.

use std::marker::PhantomData;
use std::ops::Range;

use byteorder::{BigEndian, LittleEndian};
use log::trace;

use crate::errors::{FormatError, FormatResult};

/// Represents the byte order of a multi-byte scalar in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the machine this code runs on
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Parses a two-byte "II"/"MM" order marker
    pub fn from_marker(marker: [u8; 2]) -> FormatResult<Self> {
        match &marker {
            b"II" => Ok(ByteOrder::LittleEndian),
            b"MM" => Ok(ByteOrder::BigEndian),
            _ => Err(FormatError::UnrecognizedEnumerationValue {
                enumeration: "byte order marker",
                value: u16::from_be_bytes(marker) as i64,
            }),
        }
    }

    /// Parses a configuration name such as `"little"` or `"big-endian"`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "little" | "little-endian" | "le" => Some(ByteOrder::LittleEndian),
            "big" | "big-endian" | "be" => Some(ByteOrder::BigEndian),
            "native" => Some(Self::native()),
            _ => None,
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian",
            ByteOrder::BigEndian => "Big Endian",
        }
    }

    /// The opposite byte order
    pub fn swapped(&self) -> Self {
        match self {
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
        }
    }

    /// Returns the shared handler for this byte order
    pub fn handler(&self) -> &'static dyn ByteOrderHandler {
        match self {
            ByteOrder::LittleEndian => &LITTLE_ENDIAN,
            ByteOrder::BigEndian => &BIG_ENDIAN,
        }
    }
}

/// Trait for byte order handling strategies
///
/// Every method checks that `width` bytes are available from `offset`
/// before touching the buffer and fails with `InsufficientLength` otherwise.
pub trait ByteOrderHandler: Send + Sync {
    /// The byte order this handler decodes
    fn order(&self) -> ByteOrder;

    fn read_u16(&self, buf: &[u8], offset: usize) -> FormatResult<u16>;
    fn read_i16(&self, buf: &[u8], offset: usize) -> FormatResult<i16>;
    fn read_u32(&self, buf: &[u8], offset: usize) -> FormatResult<u32>;
    fn read_i32(&self, buf: &[u8], offset: usize) -> FormatResult<i32>;
    fn read_u64(&self, buf: &[u8], offset: usize) -> FormatResult<u64>;
    fn read_i64(&self, buf: &[u8], offset: usize) -> FormatResult<i64>;
    fn read_f32(&self, buf: &[u8], offset: usize) -> FormatResult<f32>;
    fn read_f64(&self, buf: &[u8], offset: usize) -> FormatResult<f64>;

    fn write_u16(&self, buf: &mut [u8], offset: usize, value: u16) -> FormatResult<()>;
    fn write_i16(&self, buf: &mut [u8], offset: usize, value: i16) -> FormatResult<()>;
    fn write_u32(&self, buf: &mut [u8], offset: usize, value: u32) -> FormatResult<()>;
    fn write_i32(&self, buf: &mut [u8], offset: usize, value: i32) -> FormatResult<()>;
    fn write_u64(&self, buf: &mut [u8], offset: usize, value: u64) -> FormatResult<()>;
    fn write_i64(&self, buf: &mut [u8], offset: usize, value: i64) -> FormatResult<()>;
    fn write_f32(&self, buf: &mut [u8], offset: usize, value: f32) -> FormatResult<()>;
    fn write_f64(&self, buf: &mut [u8], offset: usize, value: f64) -> FormatResult<()>;
}

/// Checks that `width` bytes starting at `offset` lie inside a buffer of `total` bytes
pub fn checked_span(total: usize, offset: usize, width: usize) -> FormatResult<Range<usize>> {
    match offset.checked_add(width) {
        Some(end) if end <= total => Ok(offset..end),
        _ => {
            trace!("Rejecting {}-byte access at offset {} (buffer holds {})", width, offset, total);
            Err(FormatError::insufficient(width, total, offset))
        }
    }
}

/// Handler for one concrete byte order, backed by the `byteorder` crate
pub struct EndianHandler<E> {
    order: ByteOrder,
    _marker: PhantomData<E>,
}

/// Little-endian byte order handler
pub type LittleEndianHandler = EndianHandler<LittleEndian>;

/// Big-endian byte order handler
pub type BigEndianHandler = EndianHandler<BigEndian>;

static LITTLE_ENDIAN: LittleEndianHandler = LittleEndianHandler::new();
static BIG_ENDIAN: BigEndianHandler = BigEndianHandler::new();

impl LittleEndianHandler {
    pub const fn new() -> Self {
        EndianHandler { order: ByteOrder::LittleEndian, _marker: PhantomData }
    }
}

impl BigEndianHandler {
    pub const fn new() -> Self {
        EndianHandler { order: ByteOrder::BigEndian, _marker: PhantomData }
    }
}

impl<E> EndianHandler<E> {
    fn slice<'b>(&self, buf: &'b [u8], offset: usize, width: usize) -> FormatResult<&'b [u8]> {
        let span = checked_span(buf.len(), offset, width)?;
        Ok(&buf[span])
    }

    fn slice_mut<'b>(&self, buf: &'b mut [u8], offset: usize, width: usize) -> FormatResult<&'b mut [u8]> {
        let span = checked_span(buf.len(), offset, width)?;
        Ok(&mut buf[span])
    }
}

impl<E: byteorder::ByteOrder + Send + Sync> ByteOrderHandler for EndianHandler<E> {
    fn order(&self) -> ByteOrder {
        self.order
    }

    fn read_u16(&self, buf: &[u8], offset: usize) -> FormatResult<u16> {
        Ok(E::read_u16(self.slice(buf, offset, 2)?))
    }

    fn read_i16(&self, buf: &[u8], offset: usize) -> FormatResult<i16> {
        Ok(E::read_i16(self.slice(buf, offset, 2)?))
    }

    fn read_u32(&self, buf: &[u8], offset: usize) -> FormatResult<u32> {
        Ok(E::read_u32(self.slice(buf, offset, 4)?))
    }

    fn read_i32(&self, buf: &[u8], offset: usize) -> FormatResult<i32> {
        Ok(E::read_i32(self.slice(buf, offset, 4)?))
    }

    fn read_u64(&self, buf: &[u8], offset: usize) -> FormatResult<u64> {
        Ok(E::read_u64(self.slice(buf, offset, 8)?))
    }

    fn read_i64(&self, buf: &[u8], offset: usize) -> FormatResult<i64> {
        Ok(E::read_i64(self.slice(buf, offset, 8)?))
    }

    fn read_f32(&self, buf: &[u8], offset: usize) -> FormatResult<f32> {
        Ok(E::read_f32(self.slice(buf, offset, 4)?))
    }

    fn read_f64(&self, buf: &[u8], offset: usize) -> FormatResult<f64> {
        Ok(E::read_f64(self.slice(buf, offset, 8)?))
    }

    fn write_u16(&self, buf: &mut [u8], offset: usize, value: u16) -> FormatResult<()> {
        E::write_u16(self.slice_mut(buf, offset, 2)?, value);
        Ok(())
    }

    fn write_i16(&self, buf: &mut [u8], offset: usize, value: i16) -> FormatResult<()> {
        E::write_i16(self.slice_mut(buf, offset, 2)?, value);
        Ok(())
    }

    fn write_u32(&self, buf: &mut [u8], offset: usize, value: u32) -> FormatResult<()> {
        E::write_u32(self.slice_mut(buf, offset, 4)?, value);
        Ok(())
    }

    fn write_i32(&self, buf: &mut [u8], offset: usize, value: i32) -> FormatResult<()> {
        E::write_i32(self.slice_mut(buf, offset, 4)?, value);
        Ok(())
    }

    fn write_u64(&self, buf: &mut [u8], offset: usize, value: u64) -> FormatResult<()> {
        E::write_u64(self.slice_mut(buf, offset, 8)?, value);
        Ok(())
    }

    fn write_i64(&self, buf: &mut [u8], offset: usize, value: i64) -> FormatResult<()> {
        E::write_i64(self.slice_mut(buf, offset, 8)?, value);
        Ok(())
    }

    fn write_f32(&self, buf: &mut [u8], offset: usize, value: f32) -> FormatResult<()> {
        E::write_f32(self.slice_mut(buf, offset, 4)?, value);
        Ok(())
    }

    fn write_f64(&self, buf: &mut [u8], offset: usize, value: f64) -> FormatResult<()> {
        E::write_f64(self.slice_mut(buf, offset, 8)?, value);
        Ok(())
    }
}
