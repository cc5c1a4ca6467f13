//! Typed scalar access over byte buffers
//!
//! `read_scalar` and `write_scalar` are the entry points format readers use
//! for fixed-width values. Widths are implied by [`ScalarKind`]; values that
//! do not fit a requested kind are rejected rather than wrapped.

use std::fmt;

use log::trace;

use crate::errors::{FormatError, FormatResult};
use crate::io::byte_order::{checked_span, ByteOrder};

/// Fixed-width scalar encodings understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// All kinds, narrowest first
    pub const ALL: [ScalarKind; 10] = [
        ScalarKind::I8,
        ScalarKind::U8,
        ScalarKind::I16,
        ScalarKind::U16,
        ScalarKind::I32,
        ScalarKind::U32,
        ScalarKind::I64,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
    ];

    /// Size in bytes of one value of this kind
    pub fn width(&self) -> usize {
        match self {
            ScalarKind::I8 | ScalarKind::U8 => 1,
            ScalarKind::I16 | ScalarKind::U16 => 2,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }

    pub fn is_signed(&self) -> bool {
        !matches!(self, ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 | ScalarKind::U64)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::U8 => "u8",
            ScalarKind::I16 => "i16",
            ScalarKind::U16 => "u16",
            ScalarKind::I32 => "i32",
            ScalarKind::U32 => "u32",
            ScalarKind::I64 => "i64",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded fixed-width value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
        }
    }

    /// Converts a signed integer into `kind`, rejecting values that do not fit
    pub fn from_i64(value: i64, kind: ScalarKind) -> FormatResult<Self> {
        let misfit = || FormatError::out_of_range(value, kind);
        Ok(match kind {
            ScalarKind::I8 => Scalar::I8(i8::try_from(value).map_err(|_| misfit())?),
            ScalarKind::U8 => Scalar::U8(u8::try_from(value).map_err(|_| misfit())?),
            ScalarKind::I16 => Scalar::I16(i16::try_from(value).map_err(|_| misfit())?),
            ScalarKind::U16 => Scalar::U16(u16::try_from(value).map_err(|_| misfit())?),
            ScalarKind::I32 => Scalar::I32(i32::try_from(value).map_err(|_| misfit())?),
            ScalarKind::U32 => Scalar::U32(u32::try_from(value).map_err(|_| misfit())?),
            ScalarKind::I64 => Scalar::I64(value),
            ScalarKind::U64 => Scalar::U64(u64::try_from(value).map_err(|_| misfit())?),
            ScalarKind::F32 | ScalarKind::F64 => return Err(misfit()),
        })
    }

    /// Converts a float into a float `kind`
    ///
    /// Narrowing to f32 keeps NaN and infinities but rejects finite values
    /// beyond the f32 range.
    pub fn from_f64(value: f64, kind: ScalarKind) -> FormatResult<Self> {
        match kind {
            ScalarKind::F64 => Ok(Scalar::F64(value)),
            ScalarKind::F32 => {
                if value.is_finite() && value.abs() > f32::MAX as f64 {
                    Err(FormatError::out_of_range(value, kind))
                } else {
                    Ok(Scalar::F32(value as f32))
                }
            }
            _ => Err(FormatError::out_of_range(value, kind)),
        }
    }

    /// Widens to f64 (lossy for 64-bit integers beyond 2^53)
    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::I8(v) => v as f64,
            Scalar::U8(v) => v as f64,
            Scalar::I16(v) => v as f64,
            Scalar::U16(v) => v as f64,
            Scalar::I32(v) => v as f64,
            Scalar::U32(v) => v as f64,
            Scalar::I64(v) => v as f64,
            Scalar::U64(v) => v as f64,
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
        }
    }

    /// Integer value as i64, if this is an integer that fits
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Scalar::I8(v) => Some(v as i64),
            Scalar::U8(v) => Some(v as i64),
            Scalar::I16(v) => Some(v as i64),
            Scalar::U16(v) => Some(v as i64),
            Scalar::I32(v) => Some(v as i64),
            Scalar::U32(v) => Some(v as i64),
            Scalar::I64(v) => Some(v),
            Scalar::U64(v) => i64::try_from(v).ok(),
            Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
        }
    }
}

/// Reads one scalar of `kind` at `offset` under `order`
pub fn read_scalar(buf: &[u8], offset: usize, kind: ScalarKind, order: ByteOrder) -> FormatResult<Scalar> {
    let handler = order.handler();
    let value = match kind {
        ScalarKind::I8 => Scalar::I8(buf[checked_span(buf.len(), offset, 1)?][0] as i8),
        ScalarKind::U8 => Scalar::U8(buf[checked_span(buf.len(), offset, 1)?][0]),
        ScalarKind::I16 => Scalar::I16(handler.read_i16(buf, offset)?),
        ScalarKind::U16 => Scalar::U16(handler.read_u16(buf, offset)?),
        ScalarKind::I32 => Scalar::I32(handler.read_i32(buf, offset)?),
        ScalarKind::U32 => Scalar::U32(handler.read_u32(buf, offset)?),
        ScalarKind::I64 => Scalar::I64(handler.read_i64(buf, offset)?),
        ScalarKind::U64 => Scalar::U64(handler.read_u64(buf, offset)?),
        ScalarKind::F32 => Scalar::F32(handler.read_f32(buf, offset)?),
        ScalarKind::F64 => Scalar::F64(handler.read_f64(buf, offset)?),
    };
    trace!("Read {} at offset {} ({}): {}", kind, offset, order.name(), value);
    Ok(value)
}

/// Writes `value` at `offset` under `order`
pub fn write_scalar(buf: &mut [u8], offset: usize, value: Scalar, order: ByteOrder) -> FormatResult<()> {
    let handler = order.handler();
    match value {
        Scalar::I8(v) => {
            let span = checked_span(buf.len(), offset, 1)?;
            buf[span.start] = v as u8;
            Ok(())
        }
        Scalar::U8(v) => {
            let span = checked_span(buf.len(), offset, 1)?;
            buf[span.start] = v;
            Ok(())
        }
        Scalar::I16(v) => handler.write_i16(buf, offset, v),
        Scalar::U16(v) => handler.write_u16(buf, offset, v),
        Scalar::I32(v) => handler.write_i32(buf, offset, v),
        Scalar::U32(v) => handler.write_u32(buf, offset, v),
        Scalar::I64(v) => handler.write_i64(buf, offset, v),
        Scalar::U64(v) => handler.write_u64(buf, offset, v),
        Scalar::F32(v) => handler.write_f32(buf, offset, v),
        Scalar::F64(v) => handler.write_f64(buf, offset, v),
    }
}

/// Writes an integer into `kind`, rejecting it if it does not fit
pub fn write_integer(buf: &mut [u8], offset: usize, value: i64, kind: ScalarKind, order: ByteOrder) -> FormatResult<()> {
    let scalar = Scalar::from_i64(value, kind)?;
    write_scalar(buf, offset, scalar, order)
}

/// Reads a signed 32-bit element count, rejecting negative values
///
/// Shapefile part and point counts are stored this way.
pub fn read_count(buf: &[u8], offset: usize, order: ByteOrder) -> FormatResult<usize> {
    let count = order.handler().read_i32(buf, offset)?;
    usize::try_from(count).map_err(|_| FormatError::MalformedCount {
        offset,
        count: count as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(ScalarKind::U8.width(), 1);
        assert_eq!(ScalarKind::I16.width(), 2);
        assert_eq!(ScalarKind::F32.width(), 4);
        assert_eq!(ScalarKind::U64.width(), 8);
    }

    #[test]
    fn test_from_i64_rejects_misfit() {
        assert_eq!(Scalar::from_i64(255, ScalarKind::U8).unwrap(), Scalar::U8(255));
        assert!(Scalar::from_i64(256, ScalarKind::U8).is_err());
        assert!(Scalar::from_i64(-1, ScalarKind::U32).is_err());
        assert!(Scalar::from_i64(i32::MIN as i64 - 1, ScalarKind::I32).is_err());
        assert!(Scalar::from_i64(1, ScalarKind::F64).is_err());
    }

    #[test]
    fn test_from_f64_narrowing() {
        assert_eq!(Scalar::from_f64(1.5, ScalarKind::F32).unwrap(), Scalar::F32(1.5));
        assert!(Scalar::from_f64(1e300, ScalarKind::F32).is_err());
        assert!(Scalar::from_f64(f64::INFINITY, ScalarKind::F32).is_ok());
        assert!(Scalar::from_f64(1.0, ScalarKind::I32).is_err());
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Scalar::U8(200).as_f64(), 200.0);
        assert_eq!(Scalar::I32(-7).as_f64(), -7.0);
        assert_eq!(Scalar::F32(0.5).as_f64(), 0.5);
        assert_eq!(Scalar::U64(1 << 53).as_f64(), 9007199254740992.0);
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Scalar::U64(u64::MAX).as_i64(), None);
        assert_eq!(Scalar::I16(-5).as_i64(), Some(-5));
        assert_eq!(Scalar::F32(1.0).as_i64(), None);
    }

    #[test]
    fn test_read_count_negative() {
        let buf = (-3i32).to_le_bytes();
        let err = read_count(&buf, 0, ByteOrder::LittleEndian).unwrap_err();
        assert_eq!(err, FormatError::MalformedCount { offset: 0, count: -3 });
    }
}
