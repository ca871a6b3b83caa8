//! Footer location and metadata decoding.
//!
//! `inspect` turns the raw footer into the [`MetaData`] tree: it
//! rebuilds the schema from the flattened pre-order element list,
//! converts every row group and column chunk, and walks each chunk's
//! page region to record per-page summaries.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use log::debug;

use crate::cancel::CancelToken;
use crate::constants::{FOOTER_TAIL_LEN, PARQUET_MAGIC};
use crate::error::ReadError;
use crate::format::metadata::{self, FileMetaData, SchemaElement};
use crate::format::types::Repetition;
use crate::models::cursor::ParquetCursor;
use crate::models::metadata::{ColumnChunk, MetaData, PageInfo, RowGroup, Schema};
use crate::models::readers::page_stream::PageStream;

/// Decode a parquet file's structure.
///
/// Pure with respect to the source bytes: repeated calls over the same
/// file produce equal [`MetaData`].
pub fn inspect<R: Read + Seek>(
    cursor: &mut ParquetCursor<R>,
    token: &CancelToken,
) -> Result<MetaData, ReadError> {
    token.check()?;

    cursor
        .seek_from_end(-(FOOTER_TAIL_LEN as i64))
        .map_err(|e| e.context("failed to seek to footer length"))?;
    let tail = cursor
        .read_exact_vec(FOOTER_TAIL_LEN)
        .map_err(|e| e.context("failed to read footer length"))?;
    if &tail[4..] != PARQUET_MAGIC {
        return Err(ReadError::Format("missing PAR1 magic at end of file".into()));
    }
    let footer_len = u32::from_le_bytes(tail[..4].try_into().unwrap());

    cursor
        .seek_from_end(-(i64::from(footer_len) + FOOTER_TAIL_LEN as i64))
        .map_err(|e| {
            ReadError::Format(format!(
                "failed to seek to footer (footer_len={footer_len}): {e}"
            ))
        })?;
    let footer: FileMetaData = cursor
        .read_thrift()
        .map_err(|e| e.context("failed to read footer"))?;
    debug!(
        "footer decoded: {} bytes, version {}, {} schema elements, {} row groups, created by {:?}",
        footer_len,
        footer.version,
        footer.schema.len(),
        footer.row_groups.len(),
        footer.created_by.as_deref().unwrap_or("unknown")
    );

    let schema_tree = build_schema_tree(&footer.schema)?;

    let mut row_groups = Vec::with_capacity(footer.row_groups.len());
    for (i, group) in footer.row_groups.iter().enumerate() {
        let mut columns = Vec::with_capacity(group.columns.len());
        for (j, column) in group.columns.iter().enumerate() {
            let mut chunk = convert_chunk(column)
                .map_err(|e| e.context(format!("invalid column chunk at row={i}, col={j}")))?;
            chunk.pages = inspect_pages(cursor, &chunk, token)
                .map_err(|e| e.context(format!("failed to inspect pages of row={i}, col={j}")))?;
            columns.push(chunk);
        }
        row_groups.push(RowGroup {
            num_rows: group.num_rows,
            columns,
        });
    }

    Ok(MetaData {
        total_rows: footer.num_rows,
        schema_tree,
        row_groups,
    })
}

/// Rebuild the schema tree from the flattened pre-order list.
fn build_schema_tree(elements: &[SchemaElement]) -> Result<Schema, ReadError> {
    if elements.is_empty() {
        return Err(ReadError::Format("schema element list is empty".into()));
    }
    let (root, _) = build_schema_node(elements, 0, 0, 0)?;
    Ok(root)
}

/// Consume the head element as a node; a `num_children` count makes it
/// a group whose children are the following elements, recursively.
/// Returns the node and the unconsumed remainder.
fn build_schema_node<'a>(
    elements: &'a [SchemaElement],
    depth: usize,
    parent_def: i16,
    parent_rep: i16,
) -> Result<(Schema, &'a [SchemaElement]), ReadError> {
    let head = &elements[0];

    // The synthetic root does not contribute to levels even when a
    // writer tags it with a repetition.
    let (max_def_level, max_rep_level) = if depth == 0 {
        (0, 0)
    } else {
        match head.repetition_type {
            Some(Repetition::Required) | None => (parent_def, parent_rep),
            Some(Repetition::Optional) => (parent_def + 1, parent_rep),
            Some(Repetition::Repeated) => (parent_def + 1, parent_rep + 1),
        }
    };

    let mut node = Schema {
        name: head.name.clone(),
        physical_type: head.type_,
        type_length: head.type_length,
        repetition: head.repetition_type,
        depth,
        max_def_level,
        max_rep_level,
        children: BTreeMap::new(),
    };

    let mut rest = &elements[1..];
    if let Some(num_children) = head.num_children {
        if num_children < 0 {
            return Err(ReadError::Format(format!(
                "schema element '{}' declares {num_children} children",
                node.name
            )));
        }
        for _ in 0..num_children {
            if rest.is_empty() {
                return Err(ReadError::Format(format!(
                    "schema element '{}' declares more children than remain in the list",
                    node.name
                )));
            }
            let (child, remainder) =
                build_schema_node(rest, depth + 1, max_def_level, max_rep_level)?;
            rest = remainder;
            let name = child.name.clone();
            if node.children.insert(name.clone(), child).is_some() {
                return Err(ReadError::Format(format!(
                    "duplicate schema field '{name}' under '{}'",
                    node.name
                )));
            }
        }
    }

    Ok((node, rest))
}

fn convert_chunk(column: &metadata::ColumnChunk) -> Result<ColumnChunk, ReadError> {
    let meta = column
        .meta_data
        .as_ref()
        .ok_or_else(|| ReadError::Format("column chunk is missing its metadata".into()))?;
    for (what, value) in [
        ("num_values", meta.num_values),
        ("total_uncompressed_size", meta.total_uncompressed_size),
        ("total_compressed_size", meta.total_compressed_size),
        ("data_page_offset", meta.data_page_offset),
        (
            "dictionary_page_offset",
            meta.dictionary_page_offset.unwrap_or(0),
        ),
    ] {
        if value < 0 {
            return Err(ReadError::Format(format!("negative {what} {value}")));
        }
    }
    Ok(ColumnChunk {
        path: meta.path_in_schema.join("."),
        codec: meta.codec,
        num_values: meta.num_values,
        total_uncompressed_size: meta.total_uncompressed_size,
        total_compressed_size: meta.total_compressed_size,
        data_page_offset: meta.data_page_offset,
        dict_page_offset: meta.dictionary_page_offset,
        pages: Vec::new(),
    })
}

/// Walk a chunk's page region without decompressing anything,
/// recording one summary per page.
fn inspect_pages<R: Read + Seek>(
    cursor: &mut ParquetCursor<R>,
    chunk: &ColumnChunk,
    token: &CancelToken,
) -> Result<Vec<PageInfo>, ReadError> {
    let mut stream = PageStream::new(cursor, chunk)?;
    let mut pages = Vec::new();
    while let Some((header, payload_offset)) = stream.skip_page()? {
        token.check()?;
        pages.push(PageInfo::from_header(&header, payload_offset));
    }
    Ok(pages)
}
