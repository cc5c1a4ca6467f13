//! Endian-aware primitive codec
//!
//! This module provides the byte order strategies and the typed scalar
//! entry points every format reader and writer goes through.

pub mod byte_order;
pub mod scalar;
pub mod cursor;
#[cfg(test)]
mod tests;

pub use byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use cursor::{ScalarCursor, ScalarWriter};
pub use scalar::{read_count, read_scalar, write_integer, write_scalar, Scalar, ScalarKind};
