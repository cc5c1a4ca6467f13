//! Attribute table schema typing
//!
//! Maps host value types onto single-character field codes and back, and
//! encodes the text-based cells those codes describe.

pub mod field_type;
pub mod mapper;
pub mod values;
pub mod descriptor;

pub use descriptor::{FieldCodec, FieldDescriptor, FieldValue};
pub use field_type::{FieldTypeCode, HostType, TypeFamily};
pub use mapper::{DefaultFieldTypeMapper, FieldTypeMapper, TableFieldTypeMapper};
pub use values::NumberFormat;
