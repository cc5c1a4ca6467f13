//! Error taxonomy for binary format decoding
//!
//! Every decoder in this crate fails with a [`FormatError`]. The set of kinds
//! is closed: each failure class has exactly one variant carrying the data a
//! caller needs to render a diagnostic. Building an error never logs; use
//! [`FormatError::report`] with an explicit [`ErrorSink`] for that.

use std::fmt;

use crate::raster::pyramid::{CellRange, LevelExtent};
use crate::utils::logger::ErrorSink;

/// Failure raised by the codec, field-type mapper, raster primitives and pyramid guard
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Buffer too short for the requested read or write
    InsufficientLength {
        /// Bytes needed starting at `offset`
        requested: usize,
        /// Total length of the buffer
        total: usize,
        /// Offset the access started at
        offset: usize,
    },
    /// Host type has no field-code mapping
    UnsupportedType(String),
    /// On-disk field code not in the mapper's resolve table
    UnrecognizedFieldCode(char),
    /// Negative height or width
    InvalidDimension {
        /// Which dimension was rejected
        dimension: &'static str,
        value: f64,
    },
    /// Decoded coordinate is NaN or infinite
    MalformedCoordinate {
        offset: usize,
        /// The 16 raw bytes the X/Y pair was decoded from
        raw: [u8; 16],
    },
    /// Requested region exceeds the declared level extent
    PyramidOutOfBounds {
        level: usize,
        rows: CellRange,
        cols: CellRange,
        extent: LevelExtent,
    },
    /// Region requested before the level's extent was established
    PyramidHeaderUndefined {
        level: usize,
    },
    /// On-disk enumeration value has no defined mapping
    UnrecognizedEnumerationValue {
        enumeration: &'static str,
        value: i64,
    },
    /// On-disk element count is negative
    MalformedCount {
        offset: usize,
        count: i64,
    },
    /// Value does not fit the target width or field
    ValueOutOfRange {
        value: String,
        target: String,
    },
    /// Non-blank textual numeric field that does not parse
    MalformedNumeric(String),
}

/// Discriminant of [`FormatError`], for matching on the failure class alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientLength,
    UnsupportedType,
    UnrecognizedFieldCode,
    InvalidDimension,
    MalformedCoordinate,
    PyramidOutOfBounds,
    PyramidHeaderUndefined,
    UnrecognizedEnumerationValue,
    MalformedCount,
    ValueOutOfRange,
    MalformedNumeric,
}

impl FormatError {
    /// Builds an `InsufficientLength` error
    pub fn insufficient(requested: usize, total: usize, offset: usize) -> Self {
        FormatError::InsufficientLength { requested, total, offset }
    }

    /// Builds a `ValueOutOfRange` error from any displayable value
    pub fn out_of_range(value: impl fmt::Display, target: impl fmt::Display) -> Self {
        FormatError::ValueOutOfRange {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    /// Returns the failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormatError::InsufficientLength { .. } => ErrorKind::InsufficientLength,
            FormatError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            FormatError::UnrecognizedFieldCode(_) => ErrorKind::UnrecognizedFieldCode,
            FormatError::InvalidDimension { .. } => ErrorKind::InvalidDimension,
            FormatError::MalformedCoordinate { .. } => ErrorKind::MalformedCoordinate,
            FormatError::PyramidOutOfBounds { .. } => ErrorKind::PyramidOutOfBounds,
            FormatError::PyramidHeaderUndefined { .. } => ErrorKind::PyramidHeaderUndefined,
            FormatError::UnrecognizedEnumerationValue { .. } => ErrorKind::UnrecognizedEnumerationValue,
            FormatError::MalformedCount { .. } => ErrorKind::MalformedCount,
            FormatError::ValueOutOfRange { .. } => ErrorKind::ValueOutOfRange,
            FormatError::MalformedNumeric(_) => ErrorKind::MalformedNumeric,
        }
    }

    /// Writes this error through the given sink
    ///
    /// This is the only path by which an error reaches a log.
    pub fn report(&self, sink: &dyn ErrorSink) {
        sink.report(self.kind(), &self.to_string());
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InsufficientLength { requested, total, offset } => write!(
                f,
                "Insufficient length: {} bytes requested at offset {} but buffer holds {}",
                requested, offset, total
            ),
            FormatError::UnsupportedType(name) => write!(f, "Unsupported host type: {}", name),
            FormatError::UnrecognizedFieldCode(code) => {
                write!(f, "Unrecognized field type code: {:?}", code)
            }
            FormatError::InvalidDimension { dimension, value } => {
                write!(f, "Invalid {}: {} (must not be negative)", dimension, value)
            }
            FormatError::MalformedCoordinate { offset, raw } => {
                write!(f, "Malformed coordinate at offset {}: ", offset)?;
                for byte in raw {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
            FormatError::PyramidOutOfBounds { level, rows, cols, extent } => write!(
                f,
                "Pyramid level {} out of bounds: requested rows {} cols {}, level holds {} rows x {} cols",
                level, rows, cols, extent.rows, extent.cols
            ),
            FormatError::PyramidHeaderUndefined { level } => {
                write!(f, "Pyramid level {} has no header", level)
            }
            FormatError::UnrecognizedEnumerationValue { enumeration, value } => {
                write!(f, "Unrecognized {} value: {}", enumeration, value)
            }
            FormatError::MalformedCount { offset, count } => {
                write!(f, "Malformed count {} at offset {}", count, offset)
            }
            FormatError::ValueOutOfRange { value, target } => {
                write!(f, "Value {} does not fit {}", value, target)
            }
            FormatError::MalformedNumeric(text) => write!(f, "Malformed numeric field: {:?}", text),
        }
    }
}

impl std::error::Error for FormatError {}

/// Result type for format operations
pub type FormatResult<T> = Result<T, FormatError>;
