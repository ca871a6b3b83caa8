//! Footer metadata structures (`FileMetaData` and friends) from
//! `parquet.thrift`, hand-rolled in thrift-codegen style.
//!
//! Each structure implements [`TSerializable`] for the compact
//! protocol. The read side is what the reader uses against real files;
//! the write side mirrors it so fixtures (and tests) can assemble
//! byte-accurate footers through the same definitions. Unknown fields
//! are skipped, so footers from arbitrary producers still decode.

use thrift::protocol::{
    field_id, verify_required_field_exists, TFieldIdentifier, TInputProtocol, TListIdentifier,
    TOutputProtocol, TSerializable, TStructIdentifier, TType,
};

use crate::format::types::{CompressionCodec, Encoding, PhysicalType, Repetition};

/// Complete file metadata stored in the footer.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaData {
    /// Format version (1 for the classic layout read here).
    pub version: i32,
    /// Flattened schema tree in pre-order (root first).
    pub schema: Vec<SchemaElement>,
    /// Total number of rows across all row groups.
    pub num_rows: i64,
    /// Row group descriptors in on-disk order.
    pub row_groups: Vec<RowGroup>,
    /// Optional producer string.
    pub created_by: Option<String>,
}

/// One node of the flattened schema list.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaElement {
    /// Physical type; set only for leaves.
    pub type_: Option<PhysicalType>,
    /// Byte length for FIXED_LEN_BYTE_ARRAY leaves.
    pub type_length: Option<i32>,
    /// Repetition; absent on the root element.
    pub repetition_type: Option<Repetition>,
    pub name: String,
    /// Number of immediately following child elements; absent for leaves.
    pub num_children: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub columns: Vec<ColumnChunk>,
    pub total_byte_size: i64,
    pub num_rows: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunk {
    /// Deprecated in the format; carried for completeness.
    pub file_offset: i64,
    pub meta_data: Option<ColumnMetaData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetaData {
    pub type_: PhysicalType,
    /// All encodings used anywhere in the chunk.
    pub encodings: Vec<Encoding>,
    /// Schema path segments from the root to the leaf.
    pub path_in_schema: Vec<String>,
    pub codec: CompressionCodec,
    pub num_values: i64,
    pub total_uncompressed_size: i64,
    pub total_compressed_size: i64,
    /// Absolute offset of the first data page.
    pub data_page_offset: i64,
    /// Absolute offset of the dictionary page, when the chunk has one.
    pub dictionary_page_offset: Option<i64>,
}

impl TSerializable for FileMetaData {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<FileMetaData> {
        i_prot.read_struct_begin()?;
        let mut version: Option<i32> = None;
        let mut schema: Option<Vec<SchemaElement>> = None;
        let mut num_rows: Option<i64> = None;
        let mut row_groups: Option<Vec<RowGroup>> = None;
        let mut created_by: Option<String> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => version = Some(i_prot.read_i32()?),
                2 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut elements = Vec::new();
                    for _ in 0..list_ident.size {
                        elements.push(SchemaElement::read_from_in_protocol(i_prot)?);
                    }
                    i_prot.read_list_end()?;
                    schema = Some(elements);
                }
                3 => num_rows = Some(i_prot.read_i64()?),
                4 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut groups = Vec::new();
                    for _ in 0..list_ident.size {
                        groups.push(RowGroup::read_from_in_protocol(i_prot)?);
                    }
                    i_prot.read_list_end()?;
                    row_groups = Some(groups);
                }
                6 => created_by = Some(i_prot.read_string()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("FileMetaData.version", &version)?;
        verify_required_field_exists("FileMetaData.schema", &schema)?;
        verify_required_field_exists("FileMetaData.num_rows", &num_rows)?;
        verify_required_field_exists("FileMetaData.row_groups", &row_groups)?;
        Ok(FileMetaData {
            version: version.expect("required field verified above"),
            schema: schema.expect("required field verified above"),
            num_rows: num_rows.expect("required field verified above"),
            row_groups: row_groups.expect("required field verified above"),
            created_by,
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("FileMetaData"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("version", TType::I32, 1))?;
        o_prot.write_i32(self.version)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("schema", TType::List, 2))?;
        o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, self.schema.len() as i32))?;
        for element in &self.schema {
            element.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_rows", TType::I64, 3))?;
        o_prot.write_i64(self.num_rows)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("row_groups", TType::List, 4))?;
        o_prot.write_list_begin(&TListIdentifier::new(
            TType::Struct,
            self.row_groups.len() as i32,
        ))?;
        for group in &self.row_groups {
            group.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        if let Some(created_by) = &self.created_by {
            o_prot.write_field_begin(&TFieldIdentifier::new("created_by", TType::String, 6))?;
            o_prot.write_string(created_by)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

impl TSerializable for SchemaElement {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<SchemaElement> {
        i_prot.read_struct_begin()?;
        let mut type_: Option<PhysicalType> = None;
        let mut type_length: Option<i32> = None;
        let mut repetition_type: Option<Repetition> = None;
        let mut name: Option<String> = None;
        let mut num_children: Option<i32> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => type_ = Some(PhysicalType::read_i32(i_prot.read_i32()?)?),
                2 => type_length = Some(i_prot.read_i32()?),
                3 => repetition_type = Some(Repetition::read_i32(i_prot.read_i32()?)?),
                4 => name = Some(i_prot.read_string()?),
                5 => num_children = Some(i_prot.read_i32()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("SchemaElement.name", &name)?;
        Ok(SchemaElement {
            type_,
            type_length,
            repetition_type,
            name: name.expect("required field verified above"),
            num_children,
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("SchemaElement"))?;
        if let Some(type_) = self.type_ {
            o_prot.write_field_begin(&TFieldIdentifier::new("type", TType::I32, 1))?;
            o_prot.write_i32(type_.as_i32())?;
            o_prot.write_field_end()?;
        }
        if let Some(type_length) = self.type_length {
            o_prot.write_field_begin(&TFieldIdentifier::new("type_length", TType::I32, 2))?;
            o_prot.write_i32(type_length)?;
            o_prot.write_field_end()?;
        }
        if let Some(repetition_type) = self.repetition_type {
            o_prot.write_field_begin(&TFieldIdentifier::new("repetition_type", TType::I32, 3))?;
            o_prot.write_i32(repetition_type.as_i32())?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_begin(&TFieldIdentifier::new("name", TType::String, 4))?;
        o_prot.write_string(&self.name)?;
        o_prot.write_field_end()?;
        if let Some(num_children) = self.num_children {
            o_prot.write_field_begin(&TFieldIdentifier::new("num_children", TType::I32, 5))?;
            o_prot.write_i32(num_children)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

impl TSerializable for RowGroup {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<RowGroup> {
        i_prot.read_struct_begin()?;
        let mut columns: Option<Vec<ColumnChunk>> = None;
        let mut total_byte_size: Option<i64> = None;
        let mut num_rows: Option<i64> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut chunks = Vec::new();
                    for _ in 0..list_ident.size {
                        chunks.push(ColumnChunk::read_from_in_protocol(i_prot)?);
                    }
                    i_prot.read_list_end()?;
                    columns = Some(chunks);
                }
                2 => total_byte_size = Some(i_prot.read_i64()?),
                3 => num_rows = Some(i_prot.read_i64()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("RowGroup.columns", &columns)?;
        verify_required_field_exists("RowGroup.num_rows", &num_rows)?;
        Ok(RowGroup {
            columns: columns.expect("required field verified above"),
            total_byte_size: total_byte_size.unwrap_or(0),
            num_rows: num_rows.expect("required field verified above"),
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("RowGroup"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("columns", TType::List, 1))?;
        o_prot.write_list_begin(&TListIdentifier::new(TType::Struct, self.columns.len() as i32))?;
        for chunk in &self.columns {
            chunk.write_to_out_protocol(o_prot)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("total_byte_size", TType::I64, 2))?;
        o_prot.write_i64(self.total_byte_size)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_rows", TType::I64, 3))?;
        o_prot.write_i64(self.num_rows)?;
        o_prot.write_field_end()?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

impl TSerializable for ColumnChunk {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<ColumnChunk> {
        i_prot.read_struct_begin()?;
        let mut file_offset: Option<i64> = None;
        let mut meta_data: Option<ColumnMetaData> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                2 => file_offset = Some(i_prot.read_i64()?),
                3 => meta_data = Some(ColumnMetaData::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        Ok(ColumnChunk {
            file_offset: file_offset.unwrap_or(0),
            meta_data,
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnChunk"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("file_offset", TType::I64, 2))?;
        o_prot.write_i64(self.file_offset)?;
        o_prot.write_field_end()?;
        if let Some(meta_data) = &self.meta_data {
            o_prot.write_field_begin(&TFieldIdentifier::new("meta_data", TType::Struct, 3))?;
            meta_data.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

impl TSerializable for ColumnMetaData {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<ColumnMetaData> {
        i_prot.read_struct_begin()?;
        let mut type_: Option<PhysicalType> = None;
        let mut encodings: Option<Vec<Encoding>> = None;
        let mut path_in_schema: Option<Vec<String>> = None;
        let mut codec: Option<CompressionCodec> = None;
        let mut num_values: Option<i64> = None;
        let mut total_uncompressed_size: Option<i64> = None;
        let mut total_compressed_size: Option<i64> = None;
        let mut data_page_offset: Option<i64> = None;
        let mut dictionary_page_offset: Option<i64> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => type_ = Some(PhysicalType::read_i32(i_prot.read_i32()?)?),
                2 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut values = Vec::new();
                    for _ in 0..list_ident.size {
                        values.push(Encoding::read_i32(i_prot.read_i32()?)?);
                    }
                    i_prot.read_list_end()?;
                    encodings = Some(values);
                }
                3 => {
                    let list_ident = i_prot.read_list_begin()?;
                    let mut segments = Vec::new();
                    for _ in 0..list_ident.size {
                        segments.push(i_prot.read_string()?);
                    }
                    i_prot.read_list_end()?;
                    path_in_schema = Some(segments);
                }
                4 => codec = Some(CompressionCodec::read_i32(i_prot.read_i32()?)?),
                5 => num_values = Some(i_prot.read_i64()?),
                6 => total_uncompressed_size = Some(i_prot.read_i64()?),
                7 => total_compressed_size = Some(i_prot.read_i64()?),
                9 => data_page_offset = Some(i_prot.read_i64()?),
                11 => dictionary_page_offset = Some(i_prot.read_i64()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnMetaData.type", &type_)?;
        verify_required_field_exists("ColumnMetaData.path_in_schema", &path_in_schema)?;
        verify_required_field_exists("ColumnMetaData.codec", &codec)?;
        verify_required_field_exists("ColumnMetaData.num_values", &num_values)?;
        verify_required_field_exists("ColumnMetaData.data_page_offset", &data_page_offset)?;
        Ok(ColumnMetaData {
            type_: type_.expect("required field verified above"),
            encodings: encodings.unwrap_or_default(),
            path_in_schema: path_in_schema.expect("required field verified above"),
            codec: codec.expect("required field verified above"),
            num_values: num_values.expect("required field verified above"),
            total_uncompressed_size: total_uncompressed_size.unwrap_or(0),
            total_compressed_size: total_compressed_size.unwrap_or(0),
            data_page_offset: data_page_offset.expect("required field verified above"),
            dictionary_page_offset,
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnMetaData"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("type", TType::I32, 1))?;
        o_prot.write_i32(self.type_.as_i32())?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encodings", TType::List, 2))?;
        o_prot.write_list_begin(&TListIdentifier::new(TType::I32, self.encodings.len() as i32))?;
        for encoding in &self.encodings {
            o_prot.write_i32(encoding.as_i32())?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("path_in_schema", TType::List, 3))?;
        o_prot.write_list_begin(&TListIdentifier::new(
            TType::String,
            self.path_in_schema.len() as i32,
        ))?;
        for segment in &self.path_in_schema {
            o_prot.write_string(segment)?;
        }
        o_prot.write_list_end()?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("codec", TType::I32, 4))?;
        o_prot.write_i32(self.codec.as_i32())?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_values", TType::I64, 5))?;
        o_prot.write_i64(self.num_values)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "total_uncompressed_size",
            TType::I64,
            6,
        ))?;
        o_prot.write_i64(self.total_uncompressed_size)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "total_compressed_size",
            TType::I64,
            7,
        ))?;
        o_prot.write_i64(self.total_compressed_size)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("data_page_offset", TType::I64, 9))?;
        o_prot.write_i64(self.data_page_offset)?;
        o_prot.write_field_end()?;
        if let Some(offset) = self.dictionary_page_offset {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "dictionary_page_offset",
                TType::I64,
                11,
            ))?;
            o_prot.write_i64(offset)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[cfg(test)]
mod tests {
    use thrift::protocol::{TCompactInputProtocol, TCompactOutputProtocol};

    use super::*;

    fn roundtrip(meta: &FileMetaData) -> FileMetaData {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut o_prot = TCompactOutputProtocol::new(&mut buf);
            meta.write_to_out_protocol(&mut o_prot).unwrap();
        }
        let mut cursor = std::io::Cursor::new(buf);
        let mut i_prot = TCompactInputProtocol::new(&mut cursor);
        FileMetaData::read_from_in_protocol(&mut i_prot).unwrap()
    }

    fn sample_metadata() -> FileMetaData {
        FileMetaData {
            version: 1,
            schema: vec![
                SchemaElement {
                    type_: None,
                    type_length: None,
                    repetition_type: None,
                    name: "schema".into(),
                    num_children: Some(1),
                },
                SchemaElement {
                    type_: Some(PhysicalType::Int64),
                    type_length: None,
                    repetition_type: Some(Repetition::Required),
                    name: "x".into(),
                    num_children: None,
                },
            ],
            num_rows: 4,
            row_groups: vec![RowGroup {
                columns: vec![ColumnChunk {
                    file_offset: 0,
                    meta_data: Some(ColumnMetaData {
                        type_: PhysicalType::Int64,
                        encodings: vec![Encoding::Plain, Encoding::RleDictionary],
                        path_in_schema: vec!["x".into()],
                        codec: CompressionCodec::Zstd,
                        num_values: 4,
                        total_uncompressed_size: 128,
                        total_compressed_size: 96,
                        data_page_offset: 60,
                        dictionary_page_offset: Some(4),
                    }),
                }],
                total_byte_size: 128,
                num_rows: 4,
            }],
            created_by: Some("pqscan test".into()),
        }
    }

    #[test]
    fn file_metadata_compact_roundtrip() {
        let meta = sample_metadata();
        assert_eq!(roundtrip(&meta), meta);
    }

    #[test]
    fn optional_fields_stay_absent() {
        let mut meta = sample_metadata();
        meta.created_by = None;
        meta.row_groups[0].columns[0]
            .meta_data
            .as_mut()
            .unwrap()
            .dictionary_page_offset = None;
        let decoded = roundtrip(&meta);
        assert_eq!(decoded.created_by, None);
        assert_eq!(
            decoded.row_groups[0].columns[0]
                .meta_data
                .as_ref()
                .unwrap()
                .dictionary_page_offset,
            None
        );
    }

    #[test]
    fn missing_required_field_is_an_error() {
        // A struct with only a name (field 4) is not a FileMetaData.
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut o_prot = TCompactOutputProtocol::new(&mut buf);
            let element = SchemaElement {
                type_: None,
                type_length: None,
                repetition_type: None,
                name: "schema".into(),
                num_children: None,
            };
            element.write_to_out_protocol(&mut o_prot).unwrap();
        }
        let mut cursor = std::io::Cursor::new(buf);
        let mut i_prot = TCompactInputProtocol::new(&mut cursor);
        assert!(FileMetaData::read_from_in_protocol(&mut i_prot).is_err());
    }
}
