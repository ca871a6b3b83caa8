//! Shared fixture builder: assembles byte-accurate parquet files in
//! memory through the crate's own Thrift structures.
#![allow(dead_code)] // each test binary uses a different subset

use pqscan::compression::{compress, Compression};
use pqscan::constants::PARQUET_MAGIC;
use pqscan::format::metadata::{
    ColumnChunk, ColumnMetaData, FileMetaData, RowGroup, SchemaElement,
};
use pqscan::format::page::{DataPageHeader, DictionaryPageHeader, PageHeader};
use pqscan::format::types::{CompressionCodec, Encoding, PageType, PhysicalType, Repetition};
use thrift::protocol::{TCompactOutputProtocol, TOutputProtocol, TSerializable};

pub fn thrift_bytes<T: TSerializable>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut o_prot = TCompactOutputProtocol::new(&mut buf);
        value.write_to_out_protocol(&mut o_prot).unwrap();
        o_prot.flush().unwrap();
    }
    buf
}

// --- schema element helpers -------------------------------------- //

pub fn group_element(name: &str, num_children: i32) -> SchemaElement {
    SchemaElement {
        type_: None,
        type_length: None,
        repetition_type: None,
        name: name.into(),
        num_children: Some(num_children),
    }
}

pub fn leaf_element(name: &str, type_: PhysicalType, repetition: Repetition) -> SchemaElement {
    SchemaElement {
        type_: Some(type_),
        type_length: None,
        repetition_type: Some(repetition),
        name: name.into(),
        num_children: None,
    }
}

// --- page payload helpers ----------------------------------------- //

pub fn uleb128(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// One RLE run: `(repeats << 1)` header plus the little-endian value in
/// `ceil(bit_width / 8)` bytes.
pub fn rle_run(value: u32, repeats: u64, bit_width: u8) -> Vec<u8> {
    let mut out = uleb128(repeats << 1);
    let byte_width = usize::from((bit_width + 7) / 8);
    out.extend_from_slice(&value.to_le_bytes()[..byte_width]);
    out
}

/// One bit-packed run of `groups * 8` values, LSB-first.
pub fn bit_packed_run(values: &[u32], bit_width: u8) -> Vec<u8> {
    assert!(values.len() % 8 == 0, "bit-packed runs hold whole groups");
    let groups = values.len() / 8;
    let mut out = uleb128(((groups as u64) << 1) | 1);
    let mut buffer = 0u64;
    let mut buffered = 0u32;
    for &value in values {
        buffer |= u64::from(value) << buffered;
        buffered += u32::from(bit_width);
        while buffered >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            buffered -= 8;
        }
    }
    if buffered > 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}

/// RLE_DICTIONARY value section: bit width byte + hybrid runs.
pub fn dict_index_section(bit_width: u8, runs: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![bit_width];
    for run in runs {
        out.extend_from_slice(run);
    }
    out
}

/// Length-prefixed level block (contents are opaque to the reader).
pub fn level_block(levels: &[u8]) -> Vec<u8> {
    let mut out = (levels.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(levels);
    out
}

pub fn plain_i64_payload(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn plain_i32_payload(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

// --- file assembly ------------------------------------------------- //

pub struct DataPageSpec {
    pub payload: Vec<u8>,
    pub num_values: i32,
    pub encoding: Encoding,
    pub def_level_encoding: Encoding,
    pub rep_level_encoding: Encoding,
}

impl DataPageSpec {
    pub fn rle_dictionary(payload: Vec<u8>, num_values: i32) -> Self {
        Self {
            payload,
            num_values,
            encoding: Encoding::RleDictionary,
            def_level_encoding: Encoding::Rle,
            rep_level_encoding: Encoding::Rle,
        }
    }
}

pub struct ChunkSpec {
    pub path: Vec<String>,
    pub physical_type: PhysicalType,
    pub codec: CompressionCodec,
    /// Uncompressed PLAIN dictionary payload, if the chunk has one.
    pub dict: Option<(Vec<u8>, i32)>,
    pub data_pages: Vec<DataPageSpec>,
}

impl ChunkSpec {
    pub fn flat_i64(name: &str, codec: CompressionCodec) -> Self {
        Self {
            path: vec![name.to_string()],
            physical_type: PhysicalType::Int64,
            codec,
            dict: None,
            data_pages: Vec::new(),
        }
    }

    pub fn with_dict(mut self, payload: Vec<u8>, num_values: i32) -> Self {
        self.dict = Some((payload, num_values));
        self
    }

    pub fn with_data_page(mut self, payload: Vec<u8>, num_values: i32) -> Self {
        self.data_pages
            .push(DataPageSpec::rle_dictionary(payload, num_values));
        self
    }
}

pub struct FileBuilder {
    bytes: Vec<u8>,
    schema: Vec<SchemaElement>,
    row_groups: Vec<RowGroup>,
    num_rows: i64,
}

impl FileBuilder {
    pub fn new(schema: Vec<SchemaElement>) -> Self {
        Self {
            bytes: PARQUET_MAGIC.to_vec(),
            schema,
            row_groups: Vec::new(),
            num_rows: 0,
        }
    }

    /// Append one row group's chunks to the body and record its
    /// metadata. Offsets and sizes are derived from what is written.
    pub fn add_row_group(&mut self, num_rows: i64, chunks: Vec<ChunkSpec>) -> &mut Self {
        let mut columns = Vec::with_capacity(chunks.len());
        for spec in chunks {
            columns.push(self.write_chunk(spec));
        }
        self.row_groups.push(RowGroup {
            columns,
            total_byte_size: 0,
            num_rows,
        });
        self.num_rows += num_rows;
        self
    }

    fn write_chunk(&mut self, spec: ChunkSpec) -> ColumnChunk {
        let compression = match spec.codec {
            CompressionCodec::Zstd => Compression::Zstd,
            _ => Compression::None,
        };

        let mut dictionary_page_offset = None;
        let mut total_uncompressed = 0i64;
        let mut total_compressed = 0i64;
        let mut num_values = 0i64;

        if let Some((payload, dict_values)) = &spec.dict {
            dictionary_page_offset = Some(self.bytes.len() as i64);
            let on_disk = compress(payload, compression).unwrap();
            let header = PageHeader {
                type_: PageType::DictionaryPage,
                uncompressed_page_size: payload.len() as i32,
                compressed_page_size: on_disk.len() as i32,
                data_page_header: None,
                dictionary_page_header: Some(DictionaryPageHeader {
                    num_values: *dict_values,
                    encoding: Encoding::Plain,
                    is_sorted: None,
                }),
                data_page_header_v2: None,
            };
            let header_bytes = thrift_bytes(&header);
            total_uncompressed += (header_bytes.len() + payload.len()) as i64;
            total_compressed += (header_bytes.len() + on_disk.len()) as i64;
            self.bytes.extend_from_slice(&header_bytes);
            self.bytes.extend_from_slice(&on_disk);
        }

        let mut data_page_offset = self.bytes.len() as i64;
        for (i, page) in spec.data_pages.iter().enumerate() {
            if i == 0 {
                data_page_offset = self.bytes.len() as i64;
            }
            let on_disk = compress(&page.payload, compression).unwrap();
            let header = PageHeader {
                type_: PageType::DataPage,
                uncompressed_page_size: page.payload.len() as i32,
                compressed_page_size: on_disk.len() as i32,
                data_page_header: Some(DataPageHeader {
                    num_values: page.num_values,
                    encoding: page.encoding,
                    definition_level_encoding: page.def_level_encoding,
                    repetition_level_encoding: page.rep_level_encoding,
                }),
                dictionary_page_header: None,
                data_page_header_v2: None,
            };
            let header_bytes = thrift_bytes(&header);
            total_uncompressed += (header_bytes.len() + page.payload.len()) as i64;
            total_compressed += (header_bytes.len() + on_disk.len()) as i64;
            num_values += i64::from(page.num_values);
            self.bytes.extend_from_slice(&header_bytes);
            self.bytes.extend_from_slice(&on_disk);
        }

        ColumnChunk {
            file_offset: 0,
            meta_data: Some(ColumnMetaData {
                type_: spec.physical_type,
                encodings: vec![Encoding::Plain, Encoding::Rle, Encoding::RleDictionary],
                path_in_schema: spec.path,
                codec: spec.codec,
                num_values,
                total_uncompressed_size: total_uncompressed,
                total_compressed_size: total_compressed,
                data_page_offset,
                dictionary_page_offset,
            }),
        }
    }

    /// Append the footer, its length, and the closing magic.
    pub fn finish(&mut self) -> Vec<u8> {
        let footer = FileMetaData {
            version: 1,
            schema: self.schema.clone(),
            num_rows: self.num_rows,
            row_groups: self.row_groups.clone(),
            created_by: Some("pqscan fixture".into()),
        };
        let footer_bytes = thrift_bytes(&footer);
        let mut out = self.bytes.clone();
        out.extend_from_slice(&footer_bytes);
        out.extend_from_slice(&(footer_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(PARQUET_MAGIC);
        out
    }
}

/// The single-column file most scenarios use: one INT64 leaf named
/// `x`, REQUIRED, one row group.
pub fn flat_i64_file(
    codec: CompressionCodec,
    dict: &[i64],
    data_pages: Vec<Vec<u8>>,
    values_per_page: i32,
) -> Vec<u8> {
    let mut chunk = ChunkSpec::flat_i64("x", codec).with_dict(
        plain_i64_payload(dict),
        dict.len() as i32,
    );
    let num_pages = data_pages.len() as i64;
    for payload in data_pages {
        chunk = chunk.with_data_page(payload, values_per_page);
    }
    let mut builder = FileBuilder::new(vec![
        group_element("schema", 1),
        leaf_element("x", PhysicalType::Int64, Repetition::Required),
    ]);
    builder.add_row_group(i64::from(values_per_page) * num_pages, vec![chunk]);
    builder.finish()
}
