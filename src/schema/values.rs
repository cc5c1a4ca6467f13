//! Text-encoded attribute values
//!
//! dBASE stores numbers as right-aligned ASCII inside a fixed-width field and
//! booleans as a single character. The separators used for numbers are taken
//! from an explicit [`NumberFormat`] so output does not depend on process state.

use log::warn;

use crate::errors::{FormatError, FormatResult};

/// Separators used when numbers are written to or read from text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    /// Thousands separator accepted when parsing; never emitted
    pub group_separator: Option<char>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            decimal_separator: '.',
            group_separator: None,
        }
    }
}

/// Formats `value` with `decimals` fractional digits, right-aligned in `width` bytes
///
/// Fails with `ValueOutOfRange` when the text would not fit or the value is not finite.
pub fn format_numeric(value: f64, width: usize, decimals: usize, format: &NumberFormat) -> FormatResult<String> {
    if !value.is_finite() {
        return Err(FormatError::out_of_range(value, format!("numeric field N({},{})", width, decimals)));
    }

    let mut text = format!("{:.*}", decimals, value);
    if format.decimal_separator != '.' {
        text = text.replace('.', &format.decimal_separator.to_string());
    }

    fit(text, width, || format!("numeric field N({},{})", width, decimals))
}

/// Formats an integer right-aligned in `width` bytes
pub fn format_integer(value: i64, width: usize) -> FormatResult<String> {
    fit(value.to_string(), width, || format!("numeric field N({},0)", width))
}

/// Right-aligns `text` in `width` bytes
fn fit(text: String, width: usize, target: impl FnOnce() -> String) -> FormatResult<String> {
    if text.len() > width {
        return Err(FormatError::out_of_range(text, target()));
    }
    Ok(" ".repeat(width - text.len()) + &text)
}

/// Parses a numeric field
///
/// Blank fields (spaces or NUL padding) are null and return `None`.
pub fn parse_numeric(text: &str, format: &NumberFormat) -> FormatResult<Option<f64>> {
    let trimmed = text.trim_matches(|c: char| c == ' ' || c == '\0');
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut normalized: String = match format.group_separator {
        Some(group) => trimmed.chars().filter(|c| *c != group).collect(),
        None => trimmed.to_string(),
    };
    if format.decimal_separator != '.' {
        if normalized.contains('.') {
            return Err(FormatError::MalformedNumeric(trimmed.to_string()));
        }
        normalized = normalized.replace(format.decimal_separator, ".");
    }

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => {
            warn!("Numeric field {:?} does not parse", trimmed);
            Err(FormatError::MalformedNumeric(trimmed.to_string()))
        }
    }
}

/// Encodes a logical field; `None` is written as `?`
pub fn encode_logical(value: Option<bool>) -> u8 {
    match value {
        Some(true) => b'T',
        Some(false) => b'F',
        None => b'?',
    }
}

/// Decodes a logical field byte
pub fn decode_logical(byte: u8) -> FormatResult<Option<bool>> {
    match byte {
        b'T' | b't' | b'Y' | b'y' => Ok(Some(true)),
        b'F' | b'f' | b'N' | b'n' => Ok(Some(false)),
        b'?' | b' ' | 0 => Ok(None),
        _ => Err(FormatError::UnrecognizedEnumerationValue {
            enumeration: "logical field",
            value: byte as i64,
        }),
    }
}
