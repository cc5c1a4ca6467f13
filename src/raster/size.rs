//! Raster size pair

use std::fmt;

use crate::errors::{FormatError, FormatResult};

/// Height and width of a raster in map or pixel units
///
/// Both components are non-negative. Zero is allowed and describes a
/// degenerate raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    height: f64,
    width: f64,
}

impl Size {
    /// Creates a size, rejecting negative (or NaN) components
    ///
    /// Height is checked first, so a negative height is reported whatever
    /// the width holds.
    pub fn new(height: f64, width: f64) -> FormatResult<Self> {
        check("height", height)?;
        check("width", width)?;
        Ok(Size { height, width })
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn area(&self) -> f64 {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0.0 || self.width == 0.0
    }
}

fn check(dimension: &'static str, value: f64) -> FormatResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(FormatError::InvalidDimension { dimension, value })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.height, self.width)
    }
}
