//! In-memory description of a parquet file's structure.
//!
//! Produced once per `inspect` call, immutable afterwards. Everything
//! here serializes to the JSON the `inspect` subcommand prints.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::format::page::PageHeader;
use crate::format::types::{CompressionCodec, Encoding, PageType, PhysicalType, Repetition};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaData {
    /// Logical row count for the whole file.
    pub total_rows: i64,
    pub schema_tree: Schema,
    /// Row groups in on-disk order.
    pub row_groups: Vec<RowGroup>,
}

/// One node of the schema tree. Leaves carry a physical type; interior
/// nodes carry children. The synthetic root has neither repetition nor
/// a physical type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<PhysicalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_length: Option<i32>,
    #[serde(rename = "repetition_type")]
    pub repetition: Option<Repetition>,
    /// 0 for the root; child depth = parent depth + 1.
    pub depth: usize,
    /// Number of non-REQUIRED nodes on the path from (not including)
    /// the root down to this node.
    pub max_def_level: i16,
    /// Number of REPEATED nodes on the same path.
    pub max_rep_level: i16,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Schema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGroup {
    pub num_rows: i64,
    pub columns: Vec<ColumnChunk>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnChunk {
    /// Dotted concatenation of the on-disk schema path segments.
    pub path: String,
    pub codec: CompressionCodec,
    /// Total values across all data pages of the chunk.
    pub num_values: i64,
    pub total_uncompressed_size: i64,
    pub total_compressed_size: i64,
    pub data_page_offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dict_page_offset: Option<i64>,
    /// Per-page summaries recorded by the inspect page walk.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PageInfo>,
}

/// Summary of one page, recorded while walking a chunk. The full
/// [`PageHeader`] stays transient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub page_type: PageType,
    /// Absolute offset of the page payload (right after the header).
    pub offset: i64,
    pub uncompressed_size: i32,
    pub compressed_size: i32,
    pub num_values: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
}

impl MetaData {
    /// Walk the schema tree along a dotted path. `None` when any
    /// segment is missing.
    pub fn find_schema(&self, path: &str) -> Option<&Schema> {
        let mut node = &self.schema_tree;
        for segment in path.split('.') {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// All column chunks for a dotted path, in row-group order.
    pub fn find_column_chunks(&self, path: &str) -> Vec<&ColumnChunk> {
        self.row_groups
            .iter()
            .flat_map(|group| group.columns.iter())
            .filter(|chunk| chunk.path == path)
            .collect()
    }
}

impl Schema {
    pub fn is_leaf(&self) -> bool {
        self.physical_type.is_some()
    }

    /// Repetition levels are stored when any node on the path (this
    /// one included) is REPEATED.
    pub fn has_repetition_levels(&self) -> bool {
        self.max_rep_level > 0
    }

    /// Definition levels are stored when any node on the path (this
    /// one included) is not REQUIRED.
    pub fn has_definition_levels(&self) -> bool {
        self.max_def_level > 0
    }
}

impl ColumnChunk {
    pub fn has_dict(&self) -> bool {
        self.dict_page_offset.is_some()
    }

    /// First page offset: the dictionary page when there is one, the
    /// first data page otherwise.
    pub fn page_head_offset(&self) -> i64 {
        self.dict_page_offset.unwrap_or(self.data_page_offset)
    }

    /// One past the last page byte. The on-disk span equals the
    /// uncompressed size only for UNCOMPRESSED chunks.
    pub fn page_tail_offset(&self) -> i64 {
        let span = if self.codec == CompressionCodec::Uncompressed {
            self.total_uncompressed_size
        } else {
            self.total_compressed_size
        };
        self.page_head_offset() + span
    }
}

impl PageInfo {
    pub(crate) fn from_header(header: &PageHeader, payload_offset: i64) -> Self {
        let (num_values, encoding) = match header.type_ {
            PageType::DataPage => header
                .data_page_header
                .as_ref()
                .map(|h| (h.num_values, Some(h.encoding)))
                .unwrap_or((0, None)),
            PageType::DictionaryPage => header
                .dictionary_page_header
                .as_ref()
                .map(|h| (h.num_values, Some(h.encoding)))
                .unwrap_or((0, None)),
            PageType::DataPageV2 => header
                .data_page_header_v2
                .as_ref()
                .map(|h| (h.num_values, Some(h.encoding)))
                .unwrap_or((0, None)),
            PageType::IndexPage => (0, None),
        };
        PageInfo {
            page_type: header.type_,
            offset: payload_offset,
            uncompressed_size: header.uncompressed_page_size,
            compressed_size: header.compressed_page_size,
            num_values,
            encoding,
        }
    }
}
