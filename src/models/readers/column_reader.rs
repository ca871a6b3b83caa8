//! Column-oriented reading over an inspected file.

use std::io::{Read, Seek};

use log::debug;

use crate::cancel::CancelToken;
use crate::error::ReadError;
use crate::format::page::PageHeader;
use crate::format::types::{Encoding, PageType};
use crate::models::aggregators::IntSumAggregator;
use crate::models::cursor::ParquetCursor;
use crate::models::decoders::data_page::decode_data_page;
use crate::models::decoders::plain::decode_plain_dictionary;
use crate::models::metadata::{ColumnChunk, MetaData};
use crate::models::readers::metadata_reader::inspect;
use crate::models::readers::page_stream::PageStream;
use crate::traits::aggregator::Aggregator;
use crate::traits::plain_value::PlainValue;

/// A parquet file opened for reading: the byte cursor plus the
/// [`MetaData`] decoded from its footer.
pub struct ParquetReader<R> {
    cursor: ParquetCursor<R>,
    meta: MetaData,
}

impl<R: Read + Seek> ParquetReader<R> {
    /// Inspect the file and keep the source open for column reads.
    pub fn open(source: R, token: &CancelToken) -> Result<Self, ReadError> {
        let mut cursor = ParquetCursor::new(source);
        let meta = inspect(&mut cursor, token)?;
        Ok(Self { cursor, meta })
    }

    pub fn metadata(&self) -> &MetaData {
        &self.meta
    }

    pub fn into_metadata(self) -> MetaData {
        self.meta
    }

    /// Sum every value of the named INT64 leaf across the file.
    /// Overflow wraps (see [`IntSumAggregator`]).
    pub fn sum_int64(&mut self, path: &str, token: &CancelToken) -> Result<i64, ReadError> {
        let mut aggregator = IntSumAggregator::<i64>::new();
        self.aggregate_column(path, &mut aggregator, token)?;
        Ok(aggregator.sum())
    }

    /// INT32 counterpart of [`sum_int64`](Self::sum_int64).
    pub fn sum_int32(&mut self, path: &str, token: &CancelToken) -> Result<i32, ReadError> {
        let mut aggregator = IntSumAggregator::<i32>::new();
        self.aggregate_column(path, &mut aggregator, token)?;
        Ok(aggregator.sum())
    }

    /// Stream one column's values through an aggregator.
    ///
    /// The path must name a leaf whose physical type matches `V`.
    /// Chunks are visited in row-group order; within a chunk the
    /// dictionary page (when present) is decoded first and dropped
    /// when the chunk completes.
    pub fn aggregate_column<V, A>(
        &mut self,
        path: &str,
        aggregator: &mut A,
        token: &CancelToken,
    ) -> Result<(), ReadError>
    where
        V: PlainValue,
        A: Aggregator<V>,
    {
        let schema = self
            .meta
            .find_schema(path)
            .filter(|schema| schema.is_leaf())
            .ok_or_else(|| {
                ReadError::Unsupported(format!("'{path}' column does not exist"))
            })?;
        if schema.physical_type != Some(V::PHYSICAL_TYPE) {
            return Err(ReadError::Unsupported(format!(
                "'{path}' is not an {} column",
                V::PHYSICAL_TYPE
            )));
        }
        let has_rep_levels = schema.has_repetition_levels();
        let has_def_levels = schema.has_definition_levels();

        let chunks: Vec<ColumnChunk> = self
            .meta
            .find_column_chunks(path)
            .into_iter()
            .cloned()
            .collect();
        debug!("aggregating '{path}' across {} column chunks", chunks.len());

        for chunk in &chunks {
            token.check()?;
            self.aggregate_chunk(chunk, has_rep_levels, has_def_levels, aggregator, token)?;
        }
        Ok(())
    }

    fn aggregate_chunk<V, A>(
        &mut self,
        chunk: &ColumnChunk,
        has_rep_levels: bool,
        has_def_levels: bool,
        aggregator: &mut A,
        token: &CancelToken,
    ) -> Result<(), ReadError>
    where
        V: PlainValue,
        A: Aggregator<V>,
    {
        let mut pages = PageStream::new(&mut self.cursor, chunk)?;

        // The dictionary belongs to this chunk's decode pass; it is
        // dropped when the chunk completes, never cached across chunks.
        let dict: Vec<V> = if chunk.has_dict() {
            let (header, payload) = pages.next_page()?.ok_or_else(|| {
                ReadError::Format(
                    "column chunk declares a dictionary page but contains no pages".into(),
                )
            })?;
            read_dictionary(&header, &payload)
                .map_err(|e| e.context("failed to read dictionary page"))?
        } else {
            Vec::new()
        };

        while let Some((header, payload)) = pages.next_page()? {
            token.check()?;
            decode_data_page(
                &header,
                &payload,
                has_rep_levels,
                has_def_levels,
                &dict,
                aggregator,
            )
            .map_err(|e| e.context("failed to read data page"))?;
        }
        Ok(())
    }
}

fn read_dictionary<V: PlainValue>(
    header: &PageHeader,
    payload: &[u8],
) -> Result<Vec<V>, ReadError> {
    if header.type_ != PageType::DictionaryPage {
        return Err(ReadError::Format(format!(
            "expected a dictionary page at the head of the chunk, found {}",
            header.type_
        )));
    }
    let dict_header = header.dictionary_page_header.as_ref().ok_or_else(|| {
        ReadError::Format("dictionary page is missing its dictionary page header".into())
    })?;
    // Dictionary values are PLAIN; old writers tag them with the
    // deprecated PLAIN_DICTIONARY alias.
    if !matches!(dict_header.encoding, Encoding::Plain | Encoding::PlainDictionary) {
        return Err(ReadError::Unsupported(format!(
            "unsupported dictionary page encoding: {}",
            dict_header.encoding
        )));
    }
    let num_values = usize::try_from(dict_header.num_values).map_err(|_| {
        ReadError::Format(format!(
            "negative dictionary num_values {}",
            dict_header.num_values
        ))
    })?;
    debug!("dictionary page holds {num_values} entries");
    decode_plain_dictionary(payload, num_values)
}
