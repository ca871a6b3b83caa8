//! Lazy page iteration over one column chunk.

use std::io::{Read, Seek};

use crate::compression::{decompress, Compression};
use crate::error::ReadError;
use crate::format::page::PageHeader;
use crate::format::types::CompressionCodec;
use crate::models::cursor::ParquetCursor;
use crate::models::metadata::ColumnChunk;

/// Walks the contiguous page region of a column chunk.
///
/// Construction seeks to `page_head_offset`; each call reads one page
/// header at the current position. The walk ends exactly when the
/// cursor reaches `page_tail_offset` — any drift past it means a
/// malformed header and is a fatal decode error.
pub struct PageStream<'a, R> {
    cursor: &'a mut ParquetCursor<R>,
    codec: CompressionCodec,
    tail_offset: i64,
}

impl<'a, R: Read + Seek> PageStream<'a, R> {
    pub fn new(
        cursor: &'a mut ParquetCursor<R>,
        chunk: &ColumnChunk,
    ) -> Result<Self, ReadError> {
        let head = chunk.page_head_offset();
        cursor
            .seek_from_start(head)
            .map_err(|e| e.context(format!("failed to seek to head of pages ({head})")))?;
        Ok(Self {
            cursor,
            codec: chunk.codec,
            tail_offset: chunk.page_tail_offset(),
        })
    }

    /// Read the next page header, or `None` at the chunk tail.
    /// On success the cursor sits at the first payload byte.
    fn next_header(&mut self) -> Result<Option<(PageHeader, i64)>, ReadError> {
        let offset = self.cursor.current_offset()?;
        if offset == self.tail_offset {
            return Ok(None);
        }
        if offset > self.tail_offset {
            return Err(ReadError::Format(format!(
                "page cursor overshot the chunk tail (offset={offset}, tail={})",
                self.tail_offset
            )));
        }
        let header: PageHeader = self
            .cursor
            .read_thrift()
            .map_err(|e| e.context(format!("failed to read page header at {offset}")))?;
        let payload_offset = self.cursor.current_offset()?;
        Ok(Some((header, payload_offset)))
    }

    /// Size the payload occupies on disk for this chunk's codec.
    fn on_disk_size(&self, header: &PageHeader) -> Result<usize, ReadError> {
        let size = if self.codec == CompressionCodec::Uncompressed {
            header.uncompressed_page_size
        } else {
            header.compressed_page_size
        };
        usize::try_from(size)
            .map_err(|_| ReadError::Format(format!("negative page size {size}")))
    }

    /// Yield the next (header, decompressed payload) pair.
    pub fn next_page(&mut self) -> Result<Option<(PageHeader, Vec<u8>)>, ReadError> {
        let Some((header, payload_offset)) = self.next_header()? else {
            return Ok(None);
        };
        let size = self.on_disk_size(&header)?;
        let raw = self
            .cursor
            .read_exact_vec(size)
            .map_err(|e| e.context(format!("failed to read page payload at {payload_offset}")))?;
        let payload = decompress_page(&raw, self.codec, header.uncompressed_page_size)?;
        Ok(Some((header, payload)))
    }

    /// Yield the next header and payload offset, seeking past the
    /// payload without reading it. Works for any codec.
    pub fn skip_page(&mut self) -> Result<Option<(PageHeader, i64)>, ReadError> {
        let Some((header, payload_offset)) = self.next_header()? else {
            return Ok(None);
        };
        let size = self.on_disk_size(&header)?;
        self.cursor.seek_from_start(payload_offset + size as i64)?;
        Ok(Some((header, payload_offset)))
    }
}

fn decompress_page(
    raw: &[u8],
    codec: CompressionCodec,
    uncompressed_size: i32,
) -> Result<Vec<u8>, ReadError> {
    match codec {
        CompressionCodec::Uncompressed => Ok(raw.to_vec()),
        CompressionCodec::Zstd => {
            let payload = decompress(raw, Compression::Zstd)?;
            if payload.len() != uncompressed_size as usize {
                return Err(ReadError::Format(format!(
                    "decompressed page is {} bytes, header declares {}",
                    payload.len(),
                    uncompressed_size
                )));
            }
            Ok(payload)
        }
        other => Err(ReadError::Unsupported(format!(
            "unsupported compression codec {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use thrift::protocol::{TCompactOutputProtocol, TOutputProtocol, TSerializable};

    use super::*;
    use crate::format::page::DataPageHeader;
    use crate::format::types::{Encoding, PageType};

    fn data_page_bytes(payload: &[u8]) -> Vec<u8> {
        let header = PageHeader {
            type_: PageType::DataPage,
            uncompressed_page_size: payload.len() as i32,
            compressed_page_size: payload.len() as i32,
            data_page_header: Some(DataPageHeader {
                num_values: 1,
                encoding: Encoding::RleDictionary,
                definition_level_encoding: Encoding::Rle,
                repetition_level_encoding: Encoding::Rle,
            }),
            dictionary_page_header: None,
            data_page_header_v2: None,
        };
        let mut bytes = Vec::new();
        {
            let mut o_prot = TCompactOutputProtocol::new(&mut bytes);
            header.write_to_out_protocol(&mut o_prot).unwrap();
            o_prot.flush().unwrap();
        }
        bytes.extend_from_slice(payload);
        bytes
    }

    fn chunk_for(region: &[u8], head: i64) -> ColumnChunk {
        ColumnChunk {
            path: "x".into(),
            codec: CompressionCodec::Uncompressed,
            num_values: 1,
            total_uncompressed_size: region.len() as i64,
            total_compressed_size: region.len() as i64,
            data_page_offset: head,
            dict_page_offset: None,
            pages: Vec::new(),
        }
    }

    #[test]
    fn yields_pages_until_the_tail() {
        let mut region = data_page_bytes(b"abc");
        region.extend_from_slice(&data_page_bytes(b"defgh"));
        let chunk = chunk_for(&region, 0);

        let mut cursor = ParquetCursor::new(Cursor::new(region));
        let mut stream = PageStream::new(&mut cursor, &chunk).unwrap();
        let (_, first) = stream.next_page().unwrap().unwrap();
        assert_eq!(first, b"abc");
        let (_, second) = stream.next_page().unwrap().unwrap();
        assert_eq!(second, b"defgh");
        assert!(stream.next_page().unwrap().is_none());
    }

    #[test]
    fn skip_page_reports_payload_offsets_that_tile_the_region() {
        let first = data_page_bytes(b"abc");
        let mut region = first.clone();
        region.extend_from_slice(&data_page_bytes(b"defgh"));
        let chunk = chunk_for(&region, 0);

        let mut cursor = ParquetCursor::new(Cursor::new(region.clone()));
        let mut stream = PageStream::new(&mut cursor, &chunk).unwrap();
        let (header_a, offset_a) = stream.skip_page().unwrap().unwrap();
        let (header_b, offset_b) = stream.skip_page().unwrap().unwrap();
        assert!(stream.skip_page().unwrap().is_none());

        assert_eq!(offset_a + header_a.uncompressed_page_size as i64, first.len() as i64);
        assert_eq!(
            offset_b + header_b.uncompressed_page_size as i64,
            region.len() as i64
        );
    }

    #[test]
    fn a_tail_inside_a_page_is_an_overshoot_error() {
        let region = data_page_bytes(b"abcdef");
        let mut chunk = chunk_for(&region, 0);
        chunk.total_uncompressed_size -= 2; // tail now lands mid-page

        let mut cursor = ParquetCursor::new(Cursor::new(region));
        let mut stream = PageStream::new(&mut cursor, &chunk).unwrap();
        stream.skip_page().unwrap();
        let err = stream.skip_page().unwrap_err();
        assert!(matches!(err, ReadError::Format(msg) if msg.contains("overshot")));
    }

    #[test]
    fn unsupported_codec_fails_next_page_but_not_skip_page() {
        let region = data_page_bytes(b"abc");
        let mut chunk = chunk_for(&region, 0);
        chunk.codec = CompressionCodec::Snappy;
        // compressed == uncompressed in the fixture, so sizes line up.
        let mut cursor = ParquetCursor::new(Cursor::new(region.clone()));
        let mut stream = PageStream::new(&mut cursor, &chunk).unwrap();
        let err = stream.next_page().unwrap_err();
        assert!(matches!(err, ReadError::Unsupported(msg) if msg.contains("SNAPPY")));

        let mut cursor = ParquetCursor::new(Cursor::new(region));
        let mut stream = PageStream::new(&mut cursor, &chunk).unwrap();
        assert!(stream.skip_page().unwrap().is_some());
        assert!(stream.skip_page().unwrap().is_none());
    }

    #[test]
    fn zstd_payload_is_decompressed_and_length_checked() {
        let payload = b"zstd page payload zstd page payload";
        let packed = crate::compression::compress(payload, Compression::Zstd).unwrap();
        let header = PageHeader {
            type_: PageType::DataPage,
            uncompressed_page_size: payload.len() as i32,
            compressed_page_size: packed.len() as i32,
            data_page_header: Some(DataPageHeader {
                num_values: 1,
                encoding: Encoding::RleDictionary,
                definition_level_encoding: Encoding::Rle,
                repetition_level_encoding: Encoding::Rle,
            }),
            dictionary_page_header: None,
            data_page_header_v2: None,
        };
        let mut region = Vec::new();
        {
            let mut o_prot = TCompactOutputProtocol::new(&mut region);
            header.write_to_out_protocol(&mut o_prot).unwrap();
            o_prot.flush().unwrap();
        }
        region.extend_from_slice(&packed);

        let mut chunk = chunk_for(&region, 0);
        chunk.codec = CompressionCodec::Zstd;
        chunk.total_compressed_size = region.len() as i64;

        let mut cursor = ParquetCursor::new(Cursor::new(region));
        let mut stream = PageStream::new(&mut cursor, &chunk).unwrap();
        let (_, decoded) = stream.next_page().unwrap().unwrap();
        assert_eq!(decoded, payload);
        assert!(stream.next_page().unwrap().is_none());
    }
}
