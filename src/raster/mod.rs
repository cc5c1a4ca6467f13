//! Raster primitives
//!
//! Coordinates, sizes, on-disk enumerations and the pyramid level guard.

pub mod coordinate;
pub mod size;
pub mod pyramid;
pub mod storage;
pub mod enums;

pub use coordinate::{Coordinate, COORDINATE_SIZE};
pub use enums::{HfaCompression, HfaDataType, HfaLayerType, OnDiskEnum, ShapeType};
pub use pyramid::{validate_region, CellRange, LevelExtent, PyramidHeader, PyramidLevel};
pub use size::Size;
pub use storage::{PyramidReader, PyramidStorage, SliceStorage};
