//! Reader/writer settings
//!
//! Settings are plain values handed to each reader or writer when it is
//! built. Nothing here is global: two readers in one process may run with
//! different byte orders or number formats.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::io::byte_order::ByteOrder;
use crate::schema::values::NumberFormat;

/// Failure while loading settings or code tables
#[derive(Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    Io(io::Error),
    /// Content is not valid TOML
    Parse(String),
    /// A key holds a value this crate does not accept
    InvalidValue {
        key: String,
        value: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, value: impl fmt::Display) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Failed to parse TOML: {}", msg),
            ConfigError::InvalidValue { key, value } => write!(f, "Invalid value for {}: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        ConfigError::Io(error)
    }
}

/// Parses TOML text into a value tree
pub(crate) fn parse_toml(content: &str) -> Result<toml::Value, ConfigError> {
    content
        .parse::<toml::Value>()
        .map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Reads a single-character string value
pub(crate) fn single_char(key: &str, value: &toml::Value) -> Result<char, ConfigError> {
    let text = value.as_str().ok_or_else(|| ConfigError::invalid(key, value))?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::invalid(key, text)),
    }
}

/// Settings shared by the readers and writers of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSettings {
    /// Order used where a format does not fix one itself
    pub byte_order: ByteOrder,
    /// Separators for text-encoded numeric fields
    pub number_format: NumberFormat,
}

impl Default for FormatSettings {
    fn default() -> Self {
        FormatSettings {
            byte_order: ByteOrder::LittleEndian,
            number_format: NumberFormat::default(),
        }
    }
}

impl FormatSettings {
    /// Parses settings from TOML; missing keys keep their defaults
    ///
    /// ```toml
    /// byte_order = "big"
    ///
    /// [number_format]
    /// decimal_separator = ","
    /// group_separator = "."
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let root = parse_toml(content)?;
        let mut settings = FormatSettings::default();

        if let Some(value) = root.get("byte_order") {
            let name = value.as_str().ok_or_else(|| ConfigError::invalid("byte_order", value))?;
            settings.byte_order =
                ByteOrder::from_name(name).ok_or_else(|| ConfigError::invalid("byte_order", name))?;
        }

        if let Some(table) = root.get("number_format") {
            let table = table
                .as_table()
                .ok_or_else(|| ConfigError::invalid("number_format", table))?;

            if let Some(value) = table.get("decimal_separator") {
                settings.number_format.decimal_separator =
                    single_char("number_format.decimal_separator", value)?;
            }
            if let Some(value) = table.get("group_separator") {
                settings.number_format.group_separator =
                    Some(single_char("number_format.group_separator", value)?);
            }
            if settings.number_format.group_separator == Some(settings.number_format.decimal_separator) {
                return Err(ConfigError::invalid(
                    "number_format.group_separator",
                    settings.number_format.decimal_separator,
                ));
            }
        }

        debug!(
            "Loaded settings: byte order {}, decimal separator {:?}",
            settings.byte_order.name(),
            settings.number_format.decimal_separator
        );
        Ok(settings)
    }

    /// Loads settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
