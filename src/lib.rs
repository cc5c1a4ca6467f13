pub mod config;
pub mod errors;
pub mod io;
pub mod raster;
pub mod schema;
pub mod utils;

pub use config::{ConfigError, FormatSettings};
pub use errors::{ErrorKind, FormatError, FormatResult};
pub use io::{read_scalar, write_scalar, ByteOrder, Scalar, ScalarCursor, ScalarKind, ScalarWriter};
pub use raster::{validate_region, CellRange, Coordinate, LevelExtent, PyramidHeader, PyramidReader, Size};
pub use schema::{DefaultFieldTypeMapper, FieldCodec, FieldTypeMapper, TableFieldTypeMapper};
pub use utils::logger::{ErrorSink, Logger};
