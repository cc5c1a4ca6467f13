//! On-disk enumerations
//!
//! Raster and vector headers store small integer codes for pixel types,
//! layer kinds, compression and shape types. Each enumeration here decodes
//! those codes strictly: a value without a mapping is an error, never a
//! fallback variant. Display names come from `enumerations.toml`, which is
//! compiled into the crate.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::warn;

use crate::config::{parse_toml, ConfigError};
use crate::errors::{FormatError, FormatResult};
use crate::io::byte_order::ByteOrder;
use crate::io::scalar::{read_scalar, ScalarKind};

lazy_static! {
    static ref ENUMERATION_NAMES: EnumerationTables = {
        let content = include_str!("../../enumerations.toml");
        EnumerationTables::from_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse enumeration names: {}", e);
            EnumerationTables::default()
        })
    };
}

/// Code-to-name tables keyed by table name
#[derive(Debug, Default)]
pub struct EnumerationTables {
    tables: HashMap<String, HashMap<i64, String>>,
}

impl EnumerationTables {
    /// Parses tables of the form `[table]` / `code = "name"`
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let root = parse_toml(content)?;
        let root = root
            .as_table()
            .ok_or_else(|| ConfigError::Parse("expected a table of enumerations".to_string()))?;

        let mut defs = EnumerationTables::default();
        for (table_name, table) in root {
            let table = table
                .as_table()
                .ok_or_else(|| ConfigError::invalid(table_name.as_str(), table))?;

            let mut names = HashMap::new();
            for (key, value) in table {
                let code = key
                    .parse::<i64>()
                    .map_err(|_| ConfigError::invalid(table_name.as_str(), key))?;
                let name = value
                    .as_str()
                    .ok_or_else(|| ConfigError::invalid(format!("{}.{}", table_name, key), value))?;
                names.insert(code, name.to_string());
            }
            defs.tables.insert(table_name.clone(), names);
        }

        Ok(defs)
    }

    pub fn name(&self, table: &str, code: i64) -> Option<&str> {
        self.tables.get(table)?.get(&code).map(String::as_str)
    }
}

/// Display name of `code` in one of the built-in tables
pub fn enumeration_name(table: &str, code: i64) -> Option<&'static str> {
    let tables: &'static EnumerationTables = &ENUMERATION_NAMES;
    tables.name(table, code)
}

/// An enumeration stored as a fixed-width integer
pub trait OnDiskEnum: Sized + Copy {
    /// Name reported in `UnrecognizedEnumerationValue`
    const ENUMERATION: &'static str;
    /// Table in `enumerations.toml` holding display names
    const TABLE: &'static str;
    /// How the code is stored
    const STORAGE: ScalarKind;

    fn from_code(code: i64) -> Option<Self>;

    fn code(&self) -> i64;

    /// Maps a raw code, failing on values without a definition
    fn decode(code: i64) -> FormatResult<Self> {
        Self::from_code(code).ok_or(FormatError::UnrecognizedEnumerationValue {
            enumeration: Self::ENUMERATION,
            value: code,
        })
    }

    /// Reads and decodes the code stored at `offset`
    fn read(buf: &[u8], offset: usize, order: ByteOrder) -> FormatResult<Self> {
        let raw = read_scalar(buf, offset, Self::STORAGE, order)?;
        let code = raw
            .as_i64()
            .ok_or_else(|| FormatError::out_of_range(raw, Self::ENUMERATION))?;
        Self::decode(code)
    }

    fn name(&self) -> &'static str {
        enumeration_name(Self::TABLE, self.code()).unwrap_or("unnamed")
    }
}

/// Pixel type of an Imagine raster layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HfaDataType {
    U1,
    U2,
    U4,
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    F32,
    F64,
    C64,
    C128,
}

impl HfaDataType {
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            HfaDataType::U1 => 1,
            HfaDataType::U2 => 2,
            HfaDataType::U4 => 4,
            HfaDataType::U8 | HfaDataType::S8 => 8,
            HfaDataType::U16 | HfaDataType::S16 => 16,
            HfaDataType::U32 | HfaDataType::S32 | HfaDataType::F32 => 32,
            HfaDataType::F64 | HfaDataType::C64 => 64,
            HfaDataType::C128 => 128,
        }
    }

    /// Scalar kind of one sample, for types the codec can decode directly
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            HfaDataType::U8 => Some(ScalarKind::U8),
            HfaDataType::S8 => Some(ScalarKind::I8),
            HfaDataType::U16 => Some(ScalarKind::U16),
            HfaDataType::S16 => Some(ScalarKind::I16),
            HfaDataType::U32 => Some(ScalarKind::U32),
            HfaDataType::S32 => Some(ScalarKind::I32),
            HfaDataType::F32 => Some(ScalarKind::F32),
            HfaDataType::F64 => Some(ScalarKind::F64),
            _ => None,
        }
    }
}

impl OnDiskEnum for HfaDataType {
    const ENUMERATION: &'static str = "HFA data type";
    const TABLE: &'static str = "hfa_data_types";
    const STORAGE: ScalarKind = ScalarKind::U16;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => HfaDataType::U1,
            1 => HfaDataType::U2,
            2 => HfaDataType::U4,
            3 => HfaDataType::U8,
            4 => HfaDataType::S8,
            5 => HfaDataType::U16,
            6 => HfaDataType::S16,
            7 => HfaDataType::U32,
            8 => HfaDataType::S32,
            9 => HfaDataType::F32,
            10 => HfaDataType::F64,
            11 => HfaDataType::C64,
            12 => HfaDataType::C128,
            _ => return None,
        })
    }

    fn code(&self) -> i64 {
        match self {
            HfaDataType::U1 => 0,
            HfaDataType::U2 => 1,
            HfaDataType::U4 => 2,
            HfaDataType::U8 => 3,
            HfaDataType::S8 => 4,
            HfaDataType::U16 => 5,
            HfaDataType::S16 => 6,
            HfaDataType::U32 => 7,
            HfaDataType::S32 => 8,
            HfaDataType::F32 => 9,
            HfaDataType::F64 => 10,
            HfaDataType::C64 => 11,
            HfaDataType::C128 => 12,
        }
    }
}

/// Whether an Imagine layer holds class values or continuous data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HfaLayerType {
    Thematic,
    Athematic,
}

impl OnDiskEnum for HfaLayerType {
    const ENUMERATION: &'static str = "HFA layer type";
    const TABLE: &'static str = "hfa_layer_types";
    const STORAGE: ScalarKind = ScalarKind::U16;

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HfaLayerType::Thematic),
            1 => Some(HfaLayerType::Athematic),
            _ => None,
        }
    }

    fn code(&self) -> i64 {
        match self {
            HfaLayerType::Thematic => 0,
            HfaLayerType::Athematic => 1,
        }
    }
}

/// Block compression of an Imagine layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HfaCompression {
    None,
    RunLength,
}

impl OnDiskEnum for HfaCompression {
    const ENUMERATION: &'static str = "HFA compression";
    const TABLE: &'static str = "hfa_compression";
    const STORAGE: ScalarKind = ScalarKind::U16;

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HfaCompression::None),
            1 => Some(HfaCompression::RunLength),
            _ => None,
        }
    }

    fn code(&self) -> i64 {
        match self {
            HfaCompression::None => 0,
            HfaCompression::RunLength => 1,
        }
    }
}

/// Geometry type in a shapefile header or record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    NullShape,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
    MultiPatch,
}

impl ShapeType {
    pub fn has_z(&self) -> bool {
        matches!(
            self,
            ShapeType::PointZ | ShapeType::PolyLineZ | ShapeType::PolygonZ
                | ShapeType::MultiPointZ | ShapeType::MultiPatch
        )
    }

    pub fn has_m(&self) -> bool {
        self.has_z()
            || matches!(
                self,
                ShapeType::PointM | ShapeType::PolyLineM | ShapeType::PolygonM | ShapeType::MultiPointM
            )
    }
}

impl OnDiskEnum for ShapeType {
    const ENUMERATION: &'static str = "shape type";
    const TABLE: &'static str = "shape_types";
    const STORAGE: ScalarKind = ScalarKind::I32;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => ShapeType::NullShape,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            31 => ShapeType::MultiPatch,
            _ => return None,
        })
    }

    fn code(&self) -> i64 {
        match self {
            ShapeType::NullShape => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
            ShapeType::PointM => 21,
            ShapeType::PolyLineM => 23,
            ShapeType::PolygonM => 25,
            ShapeType::MultiPointM => 28,
            ShapeType::MultiPatch => 31,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_and_have_names() {
        for code in 0..=12 {
            let ept = HfaDataType::decode(code).unwrap();
            assert_eq!(ept.code(), code);
            assert_ne!(ept.name(), "unnamed");
        }
        for code in [0, 1, 3, 5, 8, 11, 13, 15, 18, 21, 23, 25, 28, 31] {
            assert_eq!(ShapeType::decode(code).unwrap().code(), code);
        }
        assert_eq!(HfaDataType::F32.name(), "f32");
        assert_eq!(ShapeType::Polygon.name(), "Polygon");
        assert_eq!(HfaLayerType::Athematic.name(), "athematic");
        assert_eq!(HfaCompression::RunLength.name(), "run-length");
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(
            HfaDataType::decode(13).unwrap_err(),
            FormatError::UnrecognizedEnumerationValue { enumeration: "HFA data type", value: 13 }
        );
        assert_eq!(
            ShapeType::decode(-1).unwrap_err(),
            FormatError::UnrecognizedEnumerationValue { enumeration: "shape type", value: -1 }
        );
        assert!(HfaLayerType::decode(2).is_err());
        assert!(HfaCompression::decode(7).is_err());
    }

    #[test]
    fn test_read_from_buffer() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&9u16.to_be_bytes());
        buf.extend_from_slice(&5i32.to_le_bytes());

        assert_eq!(HfaDataType::read(&buf, 0, ByteOrder::BigEndian).unwrap(), HfaDataType::F32);
        assert_eq!(ShapeType::read(&buf, 2, ByteOrder::LittleEndian).unwrap(), ShapeType::Polygon);
        assert!(ShapeType::read(&buf, 3, ByteOrder::LittleEndian).is_err());
    }

    #[test]
    fn test_data_type_widths() {
        assert_eq!(HfaDataType::U4.bits_per_pixel(), 4);
        assert_eq!(HfaDataType::C128.bits_per_pixel(), 128);
        for code in 0..=12 {
            let ept = HfaDataType::decode(code).unwrap();
            if let Some(kind) = ept.scalar_kind() {
                assert_eq!(kind.width() as u32 * 8, ept.bits_per_pixel());
            }
        }
    }

    #[test]
    fn test_tables_from_str() {
        let tables = EnumerationTables::from_str("[colors]\n1 = \"red\"\n").unwrap();
        assert_eq!(tables.name("colors", 1), Some("red"));
        assert_eq!(tables.name("colors", 2), None);
        assert_eq!(tables.name("sizes", 1), None);

        assert!(EnumerationTables::from_str("[colors]\nred = \"1\"\n").is_err());
        assert!(EnumerationTables::from_str("colors = 3\n").is_err());
    }

    #[test]
    fn test_shape_dimensions() {
        assert!(ShapeType::PolygonZ.has_z());
        assert!(ShapeType::PolygonZ.has_m());
        assert!(ShapeType::PointM.has_m());
        assert!(!ShapeType::Point.has_m());
    }
}
