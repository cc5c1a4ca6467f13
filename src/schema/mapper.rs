//! Host type to field code mapping
//!
//! Readers and writers receive a [`FieldTypeMapper`] when they are built.
//! [`DefaultFieldTypeMapper`] covers the five classic dBASE codes; a
//! [`TableFieldTypeMapper`] can be assembled in code or loaded from TOML
//! when a format needs a different alphabet.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, trace};

use crate::config::{parse_toml, single_char, ConfigError};
use crate::errors::{FormatError, FormatResult};
use crate::schema::field_type::{FieldTypeCode, HostType, TypeFamily};

/// Capability to translate between host types and on-disk field codes
pub trait FieldTypeMapper: Send + Sync {
    /// Code a column holding `host` values is written with
    fn map_type_to_code(&self, host: HostType) -> FormatResult<FieldTypeCode>;

    /// Family of values a column declared with `code` holds
    fn resolve_code_to_type(&self, code: char) -> FormatResult<TypeFamily>;
}

/// The classic dBASE III mapping
///
/// | Host types | Code |
/// |---|---|
/// | integers, `f64`, `decimal` | `N` |
/// | `f32` | `F` |
/// | `bool` | `L` |
/// | `char`, `string` | `C` |
/// | `date`, `datetime` | `D` |
///
/// `time`, `guid` and `bytes` have no mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFieldTypeMapper;

impl FieldTypeMapper for DefaultFieldTypeMapper {
    fn map_type_to_code(&self, host: HostType) -> FormatResult<FieldTypeCode> {
        let code = match host {
            HostType::Bool => FieldTypeCode::LOGICAL,
            HostType::F32 => FieldTypeCode::FLOAT,
            HostType::F64 | HostType::Decimal => FieldTypeCode::NUMERIC,
            h if h.is_integer() => FieldTypeCode::NUMERIC,
            HostType::Char | HostType::String => FieldTypeCode::CHARACTER,
            HostType::Date | HostType::DateTime => FieldTypeCode::DATE,
            other => return Err(FormatError::UnsupportedType(other.name().to_string())),
        };
        trace!("Mapped host type {} to field code {}", host, code);
        Ok(code)
    }

    fn resolve_code_to_type(&self, code: char) -> FormatResult<TypeFamily> {
        match code {
            'N' => Ok(TypeFamily::Numeric),
            'F' => Ok(TypeFamily::Float),
            'L' => Ok(TypeFamily::Logical),
            'C' => Ok(TypeFamily::Character),
            'D' => Ok(TypeFamily::Date),
            other => Err(FormatError::UnrecognizedFieldCode(other)),
        }
    }
}

/// Mapper driven by explicit lookup tables
#[derive(Debug, Clone, Default)]
pub struct TableFieldTypeMapper {
    types: HashMap<HostType, FieldTypeCode>,
    codes: HashMap<char, TypeFamily>,
}

impl TableFieldTypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `code` resolves to `family`
    pub fn with_code(mut self, code: FieldTypeCode, family: TypeFamily) -> Self {
        self.codes.insert(code.as_char(), family);
        self
    }

    /// Declares that `host` is written with `code`
    pub fn with_type(mut self, host: HostType, code: FieldTypeCode) -> Self {
        self.types.insert(host, code);
        self
    }

    /// Checks that every mapped type lands on a declared code whose family holds it
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (host, code) in &self.types {
            match self.codes.get(&code.as_char()) {
                Some(family) if family.contains(*host) => {}
                Some(family) => {
                    return Err(ConfigError::invalid(
                        format!("types.{}", host),
                        format!("{} resolves to {}, which cannot hold {}", code, family, host),
                    ))
                }
                None => {
                    return Err(ConfigError::invalid(
                        format!("types.{}", host),
                        format!("{} is not declared under [codes]", code),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Builds a mapper from TOML
    ///
    /// ```toml
    /// [codes]
    /// N = "numeric"
    /// M = "memo"
    ///
    /// [types]
    /// i32 = "N"
    /// string = "M"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let root = parse_toml(content)?;
        let mut mapper = TableFieldTypeMapper::new();

        if let Some(value) = root.get("codes") {
            let table = value.as_table().ok_or_else(|| ConfigError::invalid("codes", value))?;
            for (key, value) in table {
                let mut chars = key.chars();
                let code = match (chars.next(), chars.next()) {
                    (Some(c), None) => FieldTypeCode::new(c).map_err(|_| ConfigError::invalid("codes", key))?,
                    _ => return Err(ConfigError::invalid("codes", key)),
                };
                let family = value
                    .as_str()
                    .and_then(TypeFamily::from_name)
                    .ok_or_else(|| ConfigError::invalid(format!("codes.{}", key), value))?;
                mapper = mapper.with_code(code, family);
            }
        }

        if let Some(value) = root.get("types") {
            let table = value.as_table().ok_or_else(|| ConfigError::invalid("types", value))?;
            for (key, value) in table {
                let host = HostType::from_name(key).ok_or_else(|| ConfigError::invalid("types", key))?;
                let key_path = format!("types.{}", key);
                let code = FieldTypeCode::new(single_char(&key_path, value)?)
                    .map_err(|_| ConfigError::invalid(key_path.as_str(), value))?;
                mapper = mapper.with_type(host, code);
            }
        }

        mapper.validate()?;
        debug!(
            "Loaded field type table: {} host types, {} codes",
            mapper.types.len(),
            mapper.codes.len()
        );
        Ok(mapper)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl FieldTypeMapper for TableFieldTypeMapper {
    fn map_type_to_code(&self, host: HostType) -> FormatResult<FieldTypeCode> {
        self.types
            .get(&host)
            .copied()
            .ok_or_else(|| FormatError::UnsupportedType(host.name().to_string()))
    }

    fn resolve_code_to_type(&self, code: char) -> FormatResult<TypeFamily> {
        self.codes
            .get(&code)
            .copied()
            .ok_or(FormatError::UnrecognizedFieldCode(code))
    }
}
