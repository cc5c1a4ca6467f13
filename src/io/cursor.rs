//! Sequential scalar access
//!
//! Record headers are decoded field after field. [`ScalarCursor`] and
//! [`ScalarWriter`] keep the running offset so callers don't have to,
//! while still allowing a per-field byte order override.

use crate::errors::FormatResult;
use crate::io::byte_order::{checked_span, ByteOrder, ByteOrderHandler};
use crate::io::scalar::{self, Scalar, ScalarKind};

/// Reads scalars from a borrowed buffer, advancing after each read
///
/// A failed read leaves the position unchanged.
pub struct ScalarCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ScalarCursor<'a> {
    pub fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        ScalarCursor { buf, pos: 0, order }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Moves to an absolute offset inside the buffer
    pub fn seek(&mut self, offset: usize) -> FormatResult<()> {
        checked_span(self.buf.len(), 0, offset)?;
        self.pos = offset;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> FormatResult<()> {
        checked_span(self.buf.len(), self.pos, count)?;
        self.pos += count;
        Ok(())
    }

    /// Borrows the next `count` bytes
    pub fn read_bytes(&mut self, count: usize) -> FormatResult<&'a [u8]> {
        let buf = self.buf;
        let span = checked_span(buf.len(), self.pos, count)?;
        self.pos = span.end;
        Ok(&buf[span])
    }

    pub fn read_u8(&mut self) -> FormatResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a scalar in the cursor's byte order
    pub fn read(&mut self, kind: ScalarKind) -> FormatResult<Scalar> {
        self.read_with(kind, self.order)
    }

    /// Reads a scalar in an explicit byte order
    pub fn read_with(&mut self, kind: ScalarKind, order: ByteOrder) -> FormatResult<Scalar> {
        let value = scalar::read_scalar(self.buf, self.pos, kind, order)?;
        self.pos += kind.width();
        Ok(value)
    }

    fn advance<T>(&mut self, width: usize, read: impl FnOnce(&dyn ByteOrderHandler, &[u8], usize) -> FormatResult<T>) -> FormatResult<T> {
        let value = read(self.order.handler(), self.buf, self.pos)?;
        self.pos += width;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> FormatResult<u16> {
        self.advance(2, |h, b, o| h.read_u16(b, o))
    }

    pub fn read_i16(&mut self) -> FormatResult<i16> {
        self.advance(2, |h, b, o| h.read_i16(b, o))
    }

    pub fn read_u32(&mut self) -> FormatResult<u32> {
        self.advance(4, |h, b, o| h.read_u32(b, o))
    }

    pub fn read_i32(&mut self) -> FormatResult<i32> {
        self.advance(4, |h, b, o| h.read_i32(b, o))
    }

    pub fn read_u64(&mut self) -> FormatResult<u64> {
        self.advance(8, |h, b, o| h.read_u64(b, o))
    }

    pub fn read_i64(&mut self) -> FormatResult<i64> {
        self.advance(8, |h, b, o| h.read_i64(b, o))
    }

    pub fn read_f32(&mut self) -> FormatResult<f32> {
        self.advance(4, |h, b, o| h.read_f32(b, o))
    }

    pub fn read_f64(&mut self) -> FormatResult<f64> {
        self.advance(8, |h, b, o| h.read_f64(b, o))
    }

    /// Reads a signed 32-bit count, rejecting negatives
    pub fn read_count(&mut self) -> FormatResult<usize> {
        let count = scalar::read_count(self.buf, self.pos, self.order)?;
        self.pos += 4;
        Ok(count)
    }
}

/// Writes scalars into a fixed-size borrowed buffer, advancing after each write
pub struct ScalarWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ScalarWriter<'a> {
    pub fn new(buf: &'a mut [u8], order: ByteOrder) -> Self {
        ScalarWriter { buf, pos: 0, order }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn write(&mut self, value: Scalar) -> FormatResult<()> {
        self.write_with(value, self.order)
    }

    pub fn write_with(&mut self, value: Scalar, order: ByteOrder) -> FormatResult<()> {
        scalar::write_scalar(self.buf, self.pos, value, order)?;
        self.pos += value.kind().width();
        Ok(())
    }

    /// Writes an integer into `kind`, rejecting values that do not fit
    pub fn write_integer(&mut self, value: i64, kind: ScalarKind) -> FormatResult<()> {
        self.write(Scalar::from_i64(value, kind)?)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> FormatResult<()> {
        let span = checked_span(self.buf.len(), self.pos, bytes.len())?;
        self.pos = span.end;
        self.buf[span].copy_from_slice(bytes);
        Ok(())
    }
}
