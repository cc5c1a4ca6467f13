//! dBASE field descriptors and cell values
//!
//! A table header carries one 32-byte descriptor per column:
//!
//! | Offset | Size | Content |
//! |---|---|---|
//! | 0 | 11 | name, NUL padded |
//! | 11 | 1 | field type code |
//! | 16 | 1 | field length |
//! | 17 | 1 | decimal count |
//!
//! [`FieldCodec`] reads and writes descriptors and the fixed-width cells they
//! describe, using the mapper and settings it was built with.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::config::FormatSettings;
use crate::errors::{FormatError, FormatResult};
use crate::io::byte_order::checked_span;
use crate::schema::field_type::{FieldTypeCode, HostType, TypeFamily};
use crate::schema::mapper::FieldTypeMapper;
use crate::schema::values;

/// Size of one field descriptor in bytes
pub const DESCRIPTOR_SIZE: usize = 32;

/// Longest field name a descriptor can hold
pub const MAX_NAME_LENGTH: usize = 10;

/// One column of an attribute table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub code: FieldTypeCode,
    pub family: TypeFamily,
    /// Width of the cell in bytes
    pub length: u8,
    pub decimals: u8,
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}({},{})", self.name, self.code, self.length, self.decimals)
    }
}

/// A decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Number(f64),
    Logical(bool),
    Text(String),
}

/// Encodes and decodes descriptors and cells for one table
pub struct FieldCodec {
    mapper: Arc<dyn FieldTypeMapper>,
    settings: FormatSettings,
}

impl FieldCodec {
    pub fn new(mapper: Arc<dyn FieldTypeMapper>, settings: FormatSettings) -> Self {
        FieldCodec { mapper, settings }
    }

    pub fn mapper(&self) -> &dyn FieldTypeMapper {
        self.mapper.as_ref()
    }

    pub fn settings(&self) -> &FormatSettings {
        &self.settings
    }

    /// Builds the descriptor for a column of `host` values
    pub fn describe(&self, name: &str, host: HostType, length: u8, decimals: u8) -> FormatResult<FieldDescriptor> {
        if name.is_empty() || name.len() > MAX_NAME_LENGTH || !name.is_ascii() {
            return Err(FormatError::out_of_range(
                format!("{:?}", name),
                format!("field name of 1 to {} ASCII characters", MAX_NAME_LENGTH),
            ));
        }

        let code = self.mapper.map_type_to_code(host)?;
        let family = self.mapper.resolve_code_to_type(code.as_char())?;
        check_layout(name, family, length, decimals)?;
        Ok(FieldDescriptor {
            name: name.to_string(),
            code,
            family,
            length,
            decimals,
        })
    }

    /// Writes a descriptor into its 32-byte on-disk form
    pub fn encode_descriptor(&self, field: &FieldDescriptor) -> [u8; DESCRIPTOR_SIZE] {
        let mut record = [0u8; DESCRIPTOR_SIZE];
        let name = field.name.as_bytes();
        let len = name.len().min(MAX_NAME_LENGTH);
        record[..len].copy_from_slice(&name[..len]);
        record[11] = field.code.as_byte();
        record[16] = field.length;
        record[17] = field.decimals;
        record
    }

    /// Reads the descriptor starting at `offset`
    pub fn decode_descriptor(&self, buf: &[u8], offset: usize) -> FormatResult<FieldDescriptor> {
        let span = checked_span(buf.len(), offset, DESCRIPTOR_SIZE)?;
        let record = &buf[span];

        let name_end = record[..11].iter().position(|b| *b == 0).unwrap_or(11);
        let name = String::from_utf8_lossy(&record[..name_end]).trim_end().to_string();
        let code = FieldTypeCode::from_byte(record[11])?;
        let family = self.mapper.resolve_code_to_type(code.as_char())?;
        check_layout(&name, family, record[16], record[17])?;

        let field = FieldDescriptor {
            name,
            code,
            family,
            length: record[16],
            decimals: record[17],
        };
        debug!("Decoded field descriptor {}", field);
        Ok(field)
    }

    /// Encodes one cell into exactly `field.length` bytes
    pub fn encode_value(&self, field: &FieldDescriptor, value: &FieldValue) -> FormatResult<Vec<u8>> {
        let width = field.length as usize;
        let misfit = |shown: String| FormatError::out_of_range(shown, format!("field {}", field));

        let mut cell = match (field.family, value) {
            (TypeFamily::Logical, FieldValue::Logical(v)) => vec![values::encode_logical(Some(*v))],
            (TypeFamily::Logical, FieldValue::Null) => vec![values::encode_logical(None)],
            (_, FieldValue::Null) => Vec::new(),
            (TypeFamily::Numeric | TypeFamily::Float, FieldValue::Number(n)) => values::format_numeric(
                *n,
                width,
                field.decimals as usize,
                &self.settings.number_format,
            )?
            .into_bytes(),
            (TypeFamily::Character | TypeFamily::Date, FieldValue::Text(s)) => s.clone().into_bytes(),
            (_, other) => return Err(misfit(format!("{:?}", other))),
        };

        // Widths are byte counts; multi-byte text must still fit the cell.
        if cell.len() > width {
            return Err(misfit(format!("{:?}", String::from_utf8_lossy(&cell))));
        }
        cell.resize(width, b' ');
        Ok(cell)
    }

    /// Decodes one cell from the start of `cell`
    pub fn decode_value(&self, field: &FieldDescriptor, cell: &[u8]) -> FormatResult<FieldValue> {
        let span = checked_span(cell.len(), 0, field.length as usize)?;
        let raw = &cell[span];

        match field.family {
            TypeFamily::Logical => {
                let byte = raw.first().ok_or_else(|| FormatError::insufficient(1, raw.len(), 0))?;
                Ok(match values::decode_logical(*byte)? {
                    Some(v) => FieldValue::Logical(v),
                    None => FieldValue::Null,
                })
            }
            TypeFamily::Numeric | TypeFamily::Float => {
                let text = String::from_utf8_lossy(raw);
                Ok(match values::parse_numeric(&text, &self.settings.number_format)? {
                    Some(n) => FieldValue::Number(n),
                    None => FieldValue::Null,
                })
            }
            _ => {
                let text = String::from_utf8_lossy(raw);
                let text = text.trim_end_matches(|c: char| c == ' ' || c == '\0');
                if text.is_empty() {
                    Ok(FieldValue::Null)
                } else {
                    Ok(FieldValue::Text(text.to_string()))
                }
            }
        }
    }
}

/// Cells are at least one byte wide with room for a digit before the
/// decimals; logical cells are exactly one byte.
fn check_layout(name: &str, family: TypeFamily, length: u8, decimals: u8) -> FormatResult<()> {
    let fits = match family {
        TypeFamily::Logical => length == 1 && decimals == 0,
        _ => length > 0 && decimals < length,
    };
    if fits {
        Ok(())
    } else {
        Err(FormatError::out_of_range(
            format!("({},{})", length, decimals),
            format!("{} field {}", family, name),
        ))
    }
}
