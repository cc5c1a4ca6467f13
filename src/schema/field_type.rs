//! Attribute field type codes
//!
//! dBASE-style tables describe each column with a single ASCII character.
//! This module defines that code, the host value types a writer may hand us,
//! and the storage families a code resolves back to.

use std::fmt;

use crate::errors::{FormatError, FormatResult};

/// Well-known dBASE field type characters
pub mod codes {
    pub const NUMERIC: char = 'N';
    pub const CHARACTER: char = 'C';
    pub const FLOAT: char = 'F';
    pub const LOGICAL: char = 'L';
    pub const DATE: char = 'D';
    pub const MEMO: char = 'M';
    pub const BINARY: char = 'B';
}

/// A single on-disk field type character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldTypeCode(char);

impl FieldTypeCode {
    pub const NUMERIC: FieldTypeCode = FieldTypeCode(codes::NUMERIC);
    pub const CHARACTER: FieldTypeCode = FieldTypeCode(codes::CHARACTER);
    pub const FLOAT: FieldTypeCode = FieldTypeCode(codes::FLOAT);
    pub const LOGICAL: FieldTypeCode = FieldTypeCode(codes::LOGICAL);
    pub const DATE: FieldTypeCode = FieldTypeCode(codes::DATE);
    pub const MEMO: FieldTypeCode = FieldTypeCode(codes::MEMO);
    pub const BINARY: FieldTypeCode = FieldTypeCode(codes::BINARY);

    /// Wraps a character, rejecting anything that cannot be stored in one byte
    /// of a field descriptor
    pub fn new(code: char) -> FormatResult<Self> {
        if code.is_ascii_graphic() {
            Ok(FieldTypeCode(code))
        } else {
            Err(FormatError::UnrecognizedFieldCode(code))
        }
    }

    /// Decodes the type byte of a field descriptor
    pub fn from_byte(byte: u8) -> FormatResult<Self> {
        Self::new(byte as char)
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    pub fn as_byte(&self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for FieldTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value types a host application stores in attribute columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    String,
    Date,
    DateTime,
    Time,
    Guid,
    Bytes,
}

impl HostType {
    pub const ALL: [HostType; 19] = [
        HostType::Bool,
        HostType::I8,
        HostType::I16,
        HostType::I32,
        HostType::I64,
        HostType::U8,
        HostType::U16,
        HostType::U32,
        HostType::U64,
        HostType::F32,
        HostType::F64,
        HostType::Decimal,
        HostType::Char,
        HostType::String,
        HostType::Date,
        HostType::DateTime,
        HostType::Time,
        HostType::Guid,
        HostType::Bytes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HostType::Bool => "bool",
            HostType::I8 => "i8",
            HostType::I16 => "i16",
            HostType::I32 => "i32",
            HostType::I64 => "i64",
            HostType::U8 => "u8",
            HostType::U16 => "u16",
            HostType::U32 => "u32",
            HostType::U64 => "u64",
            HostType::F32 => "f32",
            HostType::F64 => "f64",
            HostType::Decimal => "decimal",
            HostType::Char => "char",
            HostType::String => "string",
            HostType::Date => "date",
            HostType::DateTime => "datetime",
            HostType::Time => "time",
            HostType::Guid => "guid",
            HostType::Bytes => "bytes",
        }
    }

    /// Looks a host type up by the name returned from [`HostType::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        HostType::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            HostType::I8 | HostType::I16 | HostType::I32 | HostType::I64
                | HostType::U8 | HostType::U16 | HostType::U32 | HostType::U64
        )
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage family a field code resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    /// Text-encoded number, integral or with fixed decimals
    Numeric,
    /// Text-encoded floating point number
    Float,
    Logical,
    Character,
    Date,
    Memo,
    Binary,
}

impl TypeFamily {
    pub fn name(&self) -> &'static str {
        match self {
            TypeFamily::Numeric => "numeric",
            TypeFamily::Float => "float",
            TypeFamily::Logical => "logical",
            TypeFamily::Character => "character",
            TypeFamily::Date => "date",
            TypeFamily::Memo => "memo",
            TypeFamily::Binary => "binary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "numeric" => Some(TypeFamily::Numeric),
            "float" => Some(TypeFamily::Float),
            "logical" => Some(TypeFamily::Logical),
            "character" => Some(TypeFamily::Character),
            "date" => Some(TypeFamily::Date),
            "memo" => Some(TypeFamily::Memo),
            "binary" => Some(TypeFamily::Binary),
            _ => None,
        }
    }

    /// Whether values of `host` can be stored in a column of this family
    pub fn contains(&self, host: HostType) -> bool {
        match self {
            TypeFamily::Numeric => host.is_integer()
                || matches!(host, HostType::F32 | HostType::F64 | HostType::Decimal),
            TypeFamily::Float => matches!(host, HostType::F32 | HostType::F64 | HostType::Decimal),
            TypeFamily::Logical => host == HostType::Bool,
            TypeFamily::Character => matches!(
                host,
                HostType::Char | HostType::String | HostType::Guid | HostType::Time
            ),
            TypeFamily::Date => matches!(host, HostType::Date | HostType::DateTime),
            TypeFamily::Memo => host == HostType::String,
            TypeFamily::Binary => host == HostType::Bytes,
        }
    }

    /// Host type a reader materializes values of this family as
    pub fn host_type(&self) -> HostType {
        match self {
            TypeFamily::Numeric | TypeFamily::Float => HostType::F64,
            TypeFamily::Logical => HostType::Bool,
            TypeFamily::Character | TypeFamily::Memo => HostType::String,
            TypeFamily::Date => HostType::Date,
            TypeFamily::Binary => HostType::Bytes,
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
