//! Positioned byte cursor over a seekable source.

use std::io::{Read, Seek, SeekFrom};

use thrift::protocol::{TCompactInputProtocol, TSerializable};

use crate::error::ReadError;

/// Thin wrapper over a random-access byte source.
///
/// The Thrift protocol is constructed directly over the inner reader
/// for every [`read_thrift`](Self::read_thrift) call, with no
/// read-ahead buffering, so `current_offset` is always the position
/// the next Thrift field would be decoded from. The page iteration
/// termination check (`offset == page_tail_offset`) depends on this.
#[derive(Debug)]
pub struct ParquetCursor<R> {
    inner: R,
}

impl<R: Read + Seek> ParquetCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn seek_from_start(&mut self, offset: i64) -> Result<(), ReadError> {
        if offset < 0 {
            return Err(ReadError::Format(format!(
                "cannot seek to negative offset {offset}"
            )));
        }
        self.inner.seek(SeekFrom::Start(offset as u64))?;
        Ok(())
    }

    /// Seek relative to the end of the source; `delta` is normally
    /// negative.
    pub fn seek_from_end(&mut self, delta: i64) -> Result<(), ReadError> {
        self.inner.seek(SeekFrom::End(delta))?;
        Ok(())
    }

    pub fn current_offset(&mut self) -> Result<i64, ReadError> {
        Ok(self.inner.stream_position()? as i64)
    }

    /// Read exactly `n` bytes; a short read is an I/O error.
    pub fn read_exact_vec(&mut self, n: usize) -> Result<Vec<u8>, ReadError> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Deserialize a Thrift-compact structure at the current position,
    /// advancing the cursor past it.
    pub fn read_thrift<T: TSerializable>(&mut self) -> Result<T, ReadError> {
        let mut protocol = TCompactInputProtocol::new(&mut self.inner);
        T::read_from_in_protocol(&mut protocol).map_err(ReadError::from)
    }
}
