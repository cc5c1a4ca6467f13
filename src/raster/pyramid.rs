//! Raster pyramid levels and region validation
//!
//! A pyramid stores the same raster at several resolutions. Each level
//! declares its extent in its header; until that header has been read the
//! extent is unknown, which is not the same thing as an empty level.
//! [`validate_region`] is called before any buffer is sized or any byte is
//! fetched, so a bad request costs nothing but the check.

use std::fmt;

use log::{debug, trace};

use crate::errors::{FormatError, FormatResult};

/// Inclusive range of rows or columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub low: i64,
    pub high: i64,
}

impl CellRange {
    pub fn new(low: i64, high: i64) -> Self {
        CellRange { low, high }
    }

    /// A range covering a single row or column
    pub fn single(index: i64) -> Self {
        CellRange { low: index, high: index }
    }

    /// Number of cells covered, or 0 for an inverted range
    ///
    /// Saturates at `u64::MAX` for the full `i64` domain.
    pub fn len(&self) -> u64 {
        if self.high < self.low {
            0
        } else {
            self.high.abs_diff(self.low).saturating_add(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `0 <= low <= high < limit`
    pub fn fits_within(&self, limit: u64) -> bool {
        self.low >= 0 && self.low <= self.high && (self.high as u64) < limit
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Declared row and column count of one pyramid level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelExtent {
    pub rows: u64,
    pub cols: u64,
}

impl LevelExtent {
    pub fn new(rows: u64, cols: u64) -> Self {
        LevelExtent { rows, cols }
    }

    /// Extent of the next coarser level (half size, rounded up)
    pub fn downsampled(&self) -> Self {
        LevelExtent {
            rows: self.rows.div_ceil(2),
            cols: self.cols.div_ceil(2),
        }
    }

    pub fn cell_count(&self) -> u64 {
        self.rows.saturating_mul(self.cols)
    }
}

impl fmt::Display for LevelExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.rows, self.cols)
    }
}

/// One resolution level of a pyramid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidLevel {
    index: usize,
    extent: Option<LevelExtent>,
    /// Byte offset of the level's first cell in storage
    pub data_offset: u64,
}

impl PyramidLevel {
    /// A level whose header has not been read yet
    pub fn undefined(index: usize) -> Self {
        PyramidLevel { index, extent: None, data_offset: 0 }
    }

    pub fn new(index: usize, extent: LevelExtent, data_offset: u64) -> Self {
        PyramidLevel { index, extent: Some(extent), data_offset }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn extent(&self) -> Option<LevelExtent> {
        self.extent
    }

    pub fn is_defined(&self) -> bool {
        self.extent.is_some()
    }

    /// Records the extent once the level header has been parsed
    pub fn set_extent(&mut self, extent: LevelExtent, data_offset: u64) {
        debug!("Pyramid level {} established: {} at offset {}", self.index, extent, data_offset);
        self.extent = Some(extent);
        self.data_offset = data_offset;
    }
}

/// Checks a requested region against a level's declared extent
///
/// Fails with `PyramidHeaderUndefined` when the extent has not been set and
/// with `PyramidOutOfBounds` when either range leaves `[0, rows)` / `[0, cols)`,
/// is inverted, or starts below zero.
pub fn validate_region(level: &PyramidLevel, rows: CellRange, cols: CellRange) -> FormatResult<()> {
    let extent = level
        .extent
        .ok_or(FormatError::PyramidHeaderUndefined { level: level.index })?;

    if rows.fits_within(extent.rows) && cols.fits_within(extent.cols) {
        trace!("Region rows {} cols {} accepted on level {}", rows, cols, level.index);
        Ok(())
    } else {
        Err(FormatError::PyramidOutOfBounds {
            level: level.index,
            rows,
            cols,
            extent,
        })
    }
}

/// Level table of a pyramid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidHeader {
    levels: Vec<PyramidLevel>,
    /// Bytes stored per cell (4 for RGBA tiles)
    pub bytes_per_cell: u32,
}

impl PyramidHeader {
    /// A header with `level_count` levels, none established yet
    pub fn with_undefined_levels(level_count: usize, bytes_per_cell: u32) -> Self {
        PyramidHeader {
            levels: (0..level_count).map(PyramidLevel::undefined).collect(),
            bytes_per_cell,
        }
    }

    /// Builds a full pyramid from the base extent, halving until a single cell
    /// remains or `max_levels` is reached. Levels are stored back to back.
    pub fn from_base(base: LevelExtent, max_levels: usize, bytes_per_cell: u32) -> FormatResult<Self> {
        let mut levels = Vec::new();
        let mut extent = base;
        let mut offset: u64 = 0;

        while levels.len() < max_levels {
            levels.push(PyramidLevel::new(levels.len(), extent, offset));
            let level_bytes = extent
                .rows
                .checked_mul(extent.cols)
                .and_then(|cells| cells.checked_mul(bytes_per_cell as u64))
                .and_then(|bytes| bytes.checked_add(offset))
                .ok_or_else(|| FormatError::out_of_range(extent, "addressable pyramid level"))?;
            offset = level_bytes;

            if extent.rows <= 1 && extent.cols <= 1 {
                break;
            }
            extent = extent.downsampled();
        }

        debug!("Built pyramid of {} levels from base {}", levels.len(), base);
        Ok(PyramidHeader { levels, bytes_per_cell })
    }

    pub fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> Option<&PyramidLevel> {
        self.levels.get(index)
    }

    pub fn level_mut(&mut self, index: usize) -> Option<&mut PyramidLevel> {
        self.levels.get_mut(index)
    }

    /// Validates a region on level `index`; a level missing from the table
    /// counts as not yet established
    pub fn validate_region(&self, index: usize, rows: CellRange, cols: CellRange) -> FormatResult<&PyramidLevel> {
        let level = self
            .levels
            .get(index)
            .ok_or(FormatError::PyramidHeaderUndefined { level: index })?;
        validate_region(level, rows, cols)?;
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn level(rows: u64, cols: u64) -> PyramidLevel {
        PyramidLevel::new(0, LevelExtent::new(rows, cols), 0)
    }

    #[test]
    fn test_accepts_full_extent() {
        let level = level(100, 200);
        assert!(validate_region(&level, CellRange::new(0, 99), CellRange::new(0, 199)).is_ok());
        assert!(validate_region(&level, CellRange::single(0), CellRange::single(0)).is_ok());
    }

    #[test]
    fn test_rejects_upper_bound_off_by_one() {
        let level = level(100, 200);
        assert_eq!(
            validate_region(&level, CellRange::new(0, 100), CellRange::new(0, 199)).unwrap_err().kind(),
            ErrorKind::PyramidOutOfBounds
        );
        assert_eq!(
            validate_region(&level, CellRange::new(0, 99), CellRange::new(0, 200)).unwrap_err().kind(),
            ErrorKind::PyramidOutOfBounds
        );
    }

    #[test]
    fn test_rejects_negative_and_inverted() {
        let level = level(100, 200);
        assert!(validate_region(&level, CellRange::new(-1, 10), CellRange::new(0, 10)).is_err());
        assert!(validate_region(&level, CellRange::new(0, 10), CellRange::new(-5, -1)).is_err());
        assert!(validate_region(&level, CellRange::new(20, 10), CellRange::new(0, 10)).is_err());
    }

    #[test]
    fn test_error_carries_request_and_extent() {
        let level = level(100, 200);
        let err = validate_region(&level, CellRange::new(50, 150), CellRange::new(0, 10)).unwrap_err();

        assert_eq!(
            err,
            FormatError::PyramidOutOfBounds {
                level: 0,
                rows: CellRange::new(50, 150),
                cols: CellRange::new(0, 10),
                extent: LevelExtent::new(100, 200),
            }
        );
    }

    #[test]
    fn test_undefined_differs_from_empty() {
        let undefined = PyramidLevel::undefined(2);
        let empty = PyramidLevel::new(2, LevelExtent::new(0, 0), 0);
        let region = (CellRange::single(0), CellRange::single(0));

        assert_eq!(
            validate_region(&undefined, region.0, region.1).unwrap_err(),
            FormatError::PyramidHeaderUndefined { level: 2 }
        );
        assert_eq!(
            validate_region(&empty, region.0, region.1).unwrap_err().kind(),
            ErrorKind::PyramidOutOfBounds
        );
    }

    #[test]
    fn test_set_extent_establishes_level() {
        let mut header = PyramidHeader::with_undefined_levels(2, 4);
        let rows = CellRange::new(0, 3);
        let cols = CellRange::new(0, 3);
        assert!(header.validate_region(1, rows, cols).is_err());

        header.level_mut(1).unwrap().set_extent(LevelExtent::new(4, 4), 1024);
        assert_eq!(header.validate_region(1, rows, cols).unwrap().data_offset, 1024);
        assert_eq!(
            header.validate_region(5, rows, cols).unwrap_err(),
            FormatError::PyramidHeaderUndefined { level: 5 }
        );
    }

    #[test]
    fn test_from_base() {
        let header = PyramidHeader::from_base(LevelExtent::new(5, 8), 10, 4).unwrap();
        let extents: Vec<_> = header.levels().iter().map(|l| l.extent().unwrap()).collect();

        assert_eq!(
            extents,
            vec![
                LevelExtent::new(5, 8),
                LevelExtent::new(3, 4),
                LevelExtent::new(2, 2),
                LevelExtent::new(1, 1),
            ]
        );
        assert_eq!(header.level(1).unwrap().data_offset, 5 * 8 * 4);
        assert_eq!(header.level(2).unwrap().data_offset, (40 + 12) * 4);

        let capped = PyramidHeader::from_base(LevelExtent::new(1024, 1024), 2, 1).unwrap();
        assert_eq!(capped.level_count(), 2);
    }

    #[test]
    fn test_range_len() {
        assert_eq!(CellRange::new(3, 3).len(), 1);
        assert_eq!(CellRange::new(5, 4).len(), 0);
        assert!(CellRange::new(5, 4).is_empty());
        assert_eq!(CellRange::new(-2, 2).len(), 5);
        assert_eq!(CellRange::new(i64::MIN, i64::MAX).len(), u64::MAX);
        assert_eq!(CellRange::new(0, i64::MAX).len(), 1 << 63);
    }

    #[test]
    fn test_cell_count() {
        assert_eq!(LevelExtent::new(5, 8).cell_count(), 40);
        assert_eq!(LevelExtent::new(5, 8).downsampled().cell_count(), 12);
        assert_eq!(LevelExtent::new(2, u64::MAX).cell_count(), u64::MAX);
    }
}
