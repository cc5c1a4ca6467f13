//! Guarded access to pyramid cell data
//!
//! [`PyramidReader`] sits between a caller and whatever holds the pyramid
//! bytes. Every request goes through [`validate_region`] first; storage is
//! only touched for regions that lie fully inside an established level.

use log::{debug, trace};

use crate::errors::{FormatError, FormatResult};
use crate::io::byte_order::checked_span;
use crate::raster::pyramid::{validate_region, CellRange, PyramidHeader, PyramidLevel};

/// Source of raw pyramid bytes
///
/// Opening files and resolving paths is up to the implementor.
pub trait PyramidStorage {
    /// Fills `buf` with the bytes starting at `offset`
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FormatResult<()>;
}

/// Storage over an in-memory byte slice
pub struct SliceStorage<'a> {
    data: &'a [u8],
}

impl<'a> SliceStorage<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceStorage { data }
    }
}

impl PyramidStorage for SliceStorage<'_> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FormatResult<()> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let span = checked_span(self.data.len(), offset, buf.len())?;
        buf.copy_from_slice(&self.data[span]);
        Ok(())
    }
}

/// Reads rectangular regions out of a pyramid
pub struct PyramidReader<S: PyramidStorage> {
    header: PyramidHeader,
    storage: S,
}

impl<S: PyramidStorage> PyramidReader<S> {
    pub fn new(header: PyramidHeader, storage: S) -> Self {
        PyramidReader { header, storage }
    }

    pub fn header(&self) -> &PyramidHeader {
        &self.header
    }

    /// Mutable header access, for establishing lazily loaded levels
    pub fn header_mut(&mut self) -> &mut PyramidHeader {
        &mut self.header
    }

    pub fn into_inner(self) -> (PyramidHeader, S) {
        (self.header, self.storage)
    }

    /// Reads the cells of `rows` x `cols` on level `index`, row by row
    ///
    /// The returned buffer holds `rows.len() * cols.len() * bytes_per_cell`
    /// bytes in row-major order.
    pub fn read_region(&mut self, index: usize, rows: CellRange, cols: CellRange) -> FormatResult<Vec<u8>> {
        let level = self
            .header
            .level(index)
            .ok_or(FormatError::PyramidHeaderUndefined { level: index })?;
        validate_region(level, rows, cols)?;

        let too_large = || FormatError::out_of_range(format!("{} x {}", rows, cols), "addressable region");
        let bytes_per_cell = self.header.bytes_per_cell as u64;
        let row_bytes = to_usize(cols.len().checked_mul(bytes_per_cell).ok_or_else(too_large)?)?;
        let total = to_usize(rows.len())?.checked_mul(row_bytes).ok_or_else(too_large)?;

        let spans = row_offsets(level, rows, cols, bytes_per_cell)?;
        debug!(
            "Reading {} bytes from pyramid level {} (rows {}, cols {})",
            total, index, rows, cols
        );

        let mut out = Vec::new();
        out.try_reserve_exact(total).map_err(|_| too_large())?;
        out.resize(total, 0);
        for (chunk, offset) in out.chunks_exact_mut(row_bytes.max(1)).zip(spans) {
            trace!("Row read at offset {}", offset);
            self.storage.read_at(offset, chunk)?;
        }
        Ok(out)
    }
}

/// Storage offset of the first requested cell in each requested row
fn row_offsets(level: &PyramidLevel, rows: CellRange, cols: CellRange, bytes_per_cell: u64) -> FormatResult<Vec<u64>> {
    // Validated ranges are non-negative and inside the extent.
    let extent = level.extent().ok_or(FormatError::PyramidHeaderUndefined { level: level.index() })?;
    (rows.low..=rows.high)
        .map(|row| {
            (row as u64)
                .checked_mul(extent.cols)
                .and_then(|cell| cell.checked_add(cols.low as u64))
                .and_then(|cell| cell.checked_mul(bytes_per_cell))
                .and_then(|bytes| bytes.checked_add(level.data_offset))
                .ok_or_else(|| FormatError::out_of_range(row, "addressable pyramid row"))
        })
        .collect()
}

fn to_usize(value: u64) -> FormatResult<usize> {
    usize::try_from(value).map_err(|_| FormatError::out_of_range(value, "usize"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::raster::pyramid::LevelExtent;

    /// Storage that records every read and never fails
    struct RecordingStorage {
        reads: Vec<(u64, usize)>,
    }

    impl PyramidStorage for RecordingStorage {
        fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> FormatResult<()> {
            self.reads.push((offset, buf.len()));
            buf.fill(0xEE);
            Ok(())
        }
    }

    fn recording_reader() -> PyramidReader<RecordingStorage> {
        let header = PyramidHeader::from_base(LevelExtent::new(100, 200), 3, 4).unwrap();
        PyramidReader::new(header, RecordingStorage { reads: Vec::new() })
    }

    #[test]
    fn test_out_of_bounds_never_reaches_storage() {
        let mut reader = recording_reader();

        let err = reader
            .read_region(0, CellRange::new(50, 150), CellRange::new(0, 10))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PyramidOutOfBounds);

        let err = reader
            .read_region(0, CellRange::new(-1, 0), CellRange::new(0, 0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PyramidOutOfBounds);

        let (_, storage) = reader.into_inner();
        assert!(storage.reads.is_empty());
    }

    #[test]
    fn test_undefined_level_never_reaches_storage() {
        let header = PyramidHeader::with_undefined_levels(2, 4);
        let mut reader = PyramidReader::new(header, RecordingStorage { reads: Vec::new() });

        let err = reader.read_region(1, CellRange::single(0), CellRange::single(0)).unwrap_err();
        assert_eq!(err, FormatError::PyramidHeaderUndefined { level: 1 });

        let err = reader.read_region(7, CellRange::single(0), CellRange::single(0)).unwrap_err();
        assert_eq!(err, FormatError::PyramidHeaderUndefined { level: 7 });

        let (_, storage) = reader.into_inner();
        assert!(storage.reads.is_empty());
    }

    #[test]
    fn test_in_bounds_reads_one_span_per_row() {
        let mut reader = recording_reader();

        let data = reader.read_region(1, CellRange::new(2, 4), CellRange::new(10, 19)).unwrap();
        assert_eq!(data.len(), 3 * 10 * 4);
        assert!(data.iter().all(|b| *b == 0xEE));

        let level_offset = 100 * 200 * 4;
        let (_, storage) = reader.into_inner();
        assert_eq!(
            storage.reads,
            vec![
                (level_offset + (2 * 100 + 10) * 4, 40),
                (level_offset + (3 * 100 + 10) * 4, 40),
                (level_offset + (4 * 100 + 10) * 4, 40),
            ]
        );
    }

    #[test]
    fn test_oversized_region_is_rejected_without_reads() {
        let mut header = PyramidHeader::with_undefined_levels(1, 4);
        header.level_mut(0).unwrap().set_extent(LevelExtent::new(1, u64::MAX), 0);
        let mut reader = PyramidReader::new(header, RecordingStorage { reads: Vec::new() });

        let err = reader
            .read_region(0, CellRange::single(0), CellRange::new(0, i64::MAX))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueOutOfRange);

        // One byte per cell fits the arithmetic but not an allocation
        reader.header_mut().bytes_per_cell = 1;
        let err = reader
            .read_region(0, CellRange::single(0), CellRange::new(0, i64::MAX))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueOutOfRange);

        let (_, storage) = reader.into_inner();
        assert!(storage.reads.is_empty());
    }

    #[test]
    fn test_slice_storage() {
        // 2 x 3 level, one byte per cell
        let data: Vec<u8> = (0..6).collect();
        let header = PyramidHeader::from_base(LevelExtent::new(2, 3), 1, 1).unwrap();
        let mut reader = PyramidReader::new(header, SliceStorage::new(&data));

        assert_eq!(
            reader.read_region(0, CellRange::new(0, 1), CellRange::new(1, 2)).unwrap(),
            vec![1, 2, 4, 5]
        );
    }

    #[test]
    fn test_slice_storage_truncated() {
        let data = [0u8; 4];
        let header = PyramidHeader::from_base(LevelExtent::new(2, 3), 1, 1).unwrap();
        let mut reader = PyramidReader::new(header, SliceStorage::new(&data));

        assert_eq!(
            reader.read_region(0, CellRange::single(1), CellRange::new(0, 2)).unwrap_err(),
            FormatError::InsufficientLength { requested: 3, total: 4, offset: 3 }
        );
    }
}
