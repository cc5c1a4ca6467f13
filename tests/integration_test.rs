//! Integration tests across the codec, schema and raster modules

use std::fs;
use std::io::Write;
use std::sync::Arc;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use geobin::io::ScalarCursor;
use geobin::raster::{OnDiskEnum, ShapeType, SliceStorage};
use geobin::schema::{FieldValue, HostType};
use geobin::{
    ByteOrder, CellRange, Coordinate, DefaultFieldTypeMapper, ErrorKind, FieldCodec, FieldTypeMapper,
    FormatError, FormatSettings, LevelExtent, Logger, PyramidHeader, PyramidReader, Size,
    TableFieldTypeMapper,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 100-byte shapefile main header for a polygon file
fn shapefile_header() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_i32::<BigEndian>(9994).unwrap();
    for _ in 0..5 {
        buf.write_i32::<BigEndian>(0).unwrap();
    }
    buf.write_i32::<BigEndian>(50).unwrap();
    buf.write_i32::<LittleEndian>(1000).unwrap();
    buf.write_i32::<LittleEndian>(5).unwrap();
    for value in [-10.5, 20.0, 30.25, 40.0] {
        buf.write_f64::<LittleEndian>(value).unwrap();
    }
    for _ in 0..4 {
        buf.write_f64::<LittleEndian>(0.0).unwrap();
    }
    buf
}

#[test]
fn test_shapefile_header_workflow() {
    init_logging();
    let header = shapefile_header();
    assert_eq!(header.len(), 100);

    let mut cursor = ScalarCursor::new(&header, ByteOrder::BigEndian);
    assert_eq!(cursor.read_i32().unwrap(), 9994);
    cursor.skip(20).unwrap();
    assert_eq!(cursor.read_i32().unwrap(), 50);

    let mut cursor = ScalarCursor::new(&header, ByteOrder::LittleEndian);
    cursor.seek(28).unwrap();
    assert_eq!(cursor.read_i32().unwrap(), 1000);

    assert_eq!(ShapeType::read(&header, 32, ByteOrder::LittleEndian).unwrap(), ShapeType::Polygon);

    let min = Coordinate::read(&header, 36, ByteOrder::LittleEndian).unwrap();
    let max = Coordinate::read(&header, 52, ByteOrder::LittleEndian).unwrap();
    assert_eq!(min, Coordinate::new(-10.5, 20.0));
    assert_eq!(max, Coordinate::new(30.25, 40.0));

    let extent = Size::new(max.y - min.y, max.x - min.x).unwrap();
    assert_eq!(extent.area(), 20.0 * 40.75);

    // The bounding box cannot be read past the end of the header
    assert_eq!(
        Coordinate::read(&header, 92, ByteOrder::LittleEndian).unwrap_err(),
        FormatError::InsufficientLength { requested: 16, total: 100, offset: 92 }
    );
}

#[test]
fn test_attribute_table_with_default_mapper() {
    init_logging();
    let codec = FieldCodec::new(Arc::new(DefaultFieldTypeMapper), FormatSettings::default());

    let name = codec.describe("NAME", HostType::String, 12, 0).unwrap();
    let area = codec.describe("AREA", HostType::F64, 10, 2).unwrap();
    let flag = codec.describe("ACTIVE", HostType::Bool, 1, 0).unwrap();

    let mut header = Vec::new();
    for field in [&name, &area, &flag] {
        header.extend_from_slice(&codec.encode_descriptor(field));
    }
    let decoded: Vec<_> = (0..3)
        .map(|i| codec.decode_descriptor(&header, i * 32).unwrap())
        .collect();
    assert_eq!(decoded, vec![name.clone(), area.clone(), flag.clone()]);

    let mut row = Vec::new();
    row.extend(codec.encode_value(&name, &FieldValue::Text("Lake".into())).unwrap());
    row.extend(codec.encode_value(&area, &FieldValue::Number(1234.567)).unwrap());
    row.extend(codec.encode_value(&flag, &FieldValue::Logical(true)).unwrap());
    assert_eq!(row, b"Lake           1234.57T".to_vec());

    assert_eq!(codec.decode_value(&name, &row[0..12]).unwrap(), FieldValue::Text("Lake".into()));
    assert_eq!(codec.decode_value(&area, &row[12..22]).unwrap(), FieldValue::Number(1234.57));
    assert_eq!(codec.decode_value(&flag, &row[22..]).unwrap(), FieldValue::Logical(true));
}

#[test]
fn test_injected_mapper_and_settings_from_files() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();

    let mapper_path = dir.path().join("types.toml");
    let mut file = fs::File::create(&mapper_path).unwrap();
    writeln!(file, "[codes]\nN = \"numeric\"\nC = \"character\"\nG = \"character\"").unwrap();
    writeln!(file, "[types]\nf64 = \"N\"\nstring = \"C\"\nguid = \"G\"").unwrap();

    let settings_path = dir.path().join("settings.toml");
    fs::write(
        &settings_path,
        "byte_order = \"big\"\n[number_format]\ndecimal_separator = \",\"\n",
    )
    .unwrap();

    let mapper = TableFieldTypeMapper::from_file(&mapper_path).unwrap();
    let settings = FormatSettings::from_file(&settings_path).unwrap();
    assert_eq!(settings.byte_order, ByteOrder::BigEndian);

    // The default mapper does not know GUID columns; the table mapper does
    assert_eq!(
        DefaultFieldTypeMapper.map_type_to_code(HostType::Guid).unwrap_err().kind(),
        ErrorKind::UnsupportedType
    );
    assert_eq!(mapper.map_type_to_code(HostType::Guid).unwrap().as_char(), 'G');
    assert_eq!(
        mapper.resolve_code_to_type('L').unwrap_err(),
        FormatError::UnrecognizedFieldCode('L')
    );

    let codec = FieldCodec::new(Arc::new(mapper), settings);
    let price = codec.describe("PRICE", HostType::F64, 8, 2).unwrap();
    let cell = codec.encode_value(&price, &FieldValue::Number(3.5)).unwrap();
    assert_eq!(cell, b"    3,50".to_vec());
    assert_eq!(codec.decode_value(&price, &cell).unwrap(), FieldValue::Number(3.5));
}

#[test]
fn test_pyramid_reads_only_validated_regions() {
    init_logging();
    // 4 x 4 base of one-byte cells followed by a 2 x 2 overview
    let mut data: Vec<u8> = (0..16).collect();
    data.extend_from_slice(&[100, 101, 102, 103]);

    let header = PyramidHeader::from_base(LevelExtent::new(4, 4), 2, 1).unwrap();
    let mut reader = PyramidReader::new(header, SliceStorage::new(&data));

    assert_eq!(
        reader.read_region(0, CellRange::new(1, 2), CellRange::new(2, 3)).unwrap(),
        vec![6, 7, 10, 11]
    );
    assert_eq!(
        reader.read_region(1, CellRange::new(0, 1), CellRange::single(1)).unwrap(),
        vec![101, 103]
    );

    let err = reader
        .read_region(1, CellRange::new(0, 2), CellRange::single(0))
        .unwrap_err();
    assert_eq!(
        err,
        FormatError::PyramidOutOfBounds {
            level: 1,
            rows: CellRange::new(0, 2),
            cols: CellRange::single(0),
            extent: LevelExtent::new(2, 2),
        }
    );
    assert_eq!(
        reader.read_region(2, CellRange::single(0), CellRange::single(0)).unwrap_err(),
        FormatError::PyramidHeaderUndefined { level: 2 }
    );
}

#[test]
fn test_errors_reported_to_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geobin.log");
    let logger = Logger::new(&path).unwrap();

    let truncated = [0u8; 3];
    let err = geobin::read_scalar(&truncated, 0, geobin::ScalarKind::U32, ByteOrder::LittleEndian).unwrap_err();
    err.report(&logger);
    FormatError::UnrecognizedEnumerationValue { enumeration: "shape type", value: 2 }.report(&logger);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[InsufficientLength]"));
    assert_eq!(lines[1], "[UnrecognizedEnumerationValue] Unrecognized shape type value: 2");
}
